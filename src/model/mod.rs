//! Domain model for template groups and business rules
//!
//! These are plain records decoded from external definitions. String-typed fields such as
//! `instanceCount` and `type` are kept as written so the validator can report exactly what
//! was wrong with them; the tagged kinds below are what the rest of the crate works with.

mod business_rule;
mod group;

pub use business_rule::{
    BusinessRuleFromScratch, BusinessRuleFromTemplate, RuleComponents, ScratchProperties,
};
pub use group::{RuleTemplate, RuleTemplateProperty, Template, TemplateGroup};

use std::fmt;

/// How many business rules may be created from one rule template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceCount {
    One,
    Many,
}

impl InstanceCount {
    /// Parse an instance count, ignoring case (`ONE`, `Many`, `one` are all accepted)
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "one" => Some(Self::One),
            "many" => Some(Self::Many),
            _ => None,
        }
    }
}

impl fmt::Display for InstanceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Many => write!(f, "many"),
        }
    }
}

/// The stage of a business rule a rule template describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTemplateType {
    Template,
    Input,
    Output,
}

impl RuleTemplateType {
    /// Parse a rule template type, ignoring case
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "template" => Some(Self::Template),
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            _ => None,
        }
    }

    /// Input and output rule templates expose a stream to the rule built from scratch
    pub fn exposes_stream(self) -> bool {
        matches!(self, Self::Input | Self::Output)
    }
}

impl fmt::Display for RuleTemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Kind of artifact a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    SiddhiApp,
    Gadget,
    Dashboard,
}

impl TemplateType {
    /// Parse a template type. Unlike rule template types this is case-sensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "siddhiApp" => Some(Self::SiddhiApp),
            "gadget" => Some(Self::Gadget),
            "dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SiddhiApp => "siddhiApp",
            Self::Gadget => "gadget",
            Self::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
