//! Error types for template group validation

use thiserror::Error;

use crate::model::{RuleTemplateType, TemplateType};
use crate::template::PlaceholderError;

/// A template group definition violates a structural or completeness rule
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid template group: name is missing")]
    MissingGroupName,

    #[error("invalid template group: name cannot be empty")]
    EmptyGroupName,

    #[error("invalid template group '{group}': uuid is missing")]
    MissingGroupUuid { group: String },

    #[error("invalid template group '{group}': uuid cannot be empty")]
    EmptyGroupUuid { group: String },

    #[error("invalid template group '{group}': no rule templates found")]
    NoRuleTemplates { group: String },

    #[error("invalid rule template: name is missing")]
    MissingRuleTemplateName,

    #[error("invalid rule template: name cannot be empty")]
    EmptyRuleTemplateName,

    #[error("invalid rule template '{rule_template}': uuid is missing")]
    MissingRuleTemplateUuid { rule_template: String },

    #[error("invalid rule template '{rule_template}': uuid cannot be empty")]
    EmptyRuleTemplateUuid { rule_template: String },

    #[error("invalid rule template '{rule_template}': instance count is missing")]
    MissingInstanceCount { rule_template: String },

    #[error(
        "invalid rule template '{rule_template}': instance count should be either 'one' or 'many', found '{found}'"
    )]
    InvalidInstanceCount { rule_template: String, found: String },

    #[error("invalid rule template '{rule_template}': type is missing")]
    MissingRuleTemplateType { rule_template: String },

    #[error(
        "invalid rule template '{uuid}': type should be one of 'template', 'input' or 'output', found '{found}'"
    )]
    InvalidRuleTemplateType { uuid: String, found: String },

    #[error("invalid rule template '{rule_template}': there should be at least one template")]
    MissingTemplates { rule_template: String },

    #[error(
        "invalid rule template '{uuid}': there should be exactly one template for a {kind} type rule template, found {count}"
    )]
    ExactlyOneTemplate {
        uuid: String,
        kind: RuleTemplateType,
        count: usize,
    },

    #[error("invalid rule template '{uuid}': no templates found in {kind} type rule template")]
    NoTemplates { uuid: String, kind: RuleTemplateType },

    #[error("invalid template in rule template '{rule_template}': template type not found")]
    MissingTemplateType { rule_template: String },

    #[error(
        "invalid template in rule template '{rule_template}': '{found}' is not a valid template type"
    )]
    InvalidTemplateType { rule_template: String, found: String },

    #[error("invalid template in rule template '{rule_template}': content not found")]
    MissingContent { rule_template: String },

    #[error("invalid template in rule template '{rule_template}': content cannot be empty")]
    EmptyContent { rule_template: String },

    #[error(
        "invalid template in rule template '{rule_template}': exposed stream definition not found for a template within a {kind} type rule template"
    )]
    MissingExposedStreamDefinition {
        rule_template: String,
        kind: RuleTemplateType,
    },

    #[error(
        "invalid template in rule template '{rule_template}': exposed stream definition should not exist for a template within a {kind} type rule template"
    )]
    UnexpectedExposedStreamDefinition {
        rule_template: String,
        kind: RuleTemplateType,
    },

    #[error(
        "invalid template in rule template '{rule_template}': {found} is not a valid template type within a {kind} type rule template, expected one of: {allowed}"
    )]
    TemplateTypeNotAllowed {
        rule_template: String,
        kind: RuleTemplateType,
        found: TemplateType,
        allowed: String,
    },

    #[error(
        "invalid rule template '{rule_template}': property values cannot be substituted into the script: {source}"
    )]
    ScriptSubstitution {
        rule_template: String,
        source: PlaceholderError,
    },

    #[error(
        "invalid template in rule template '{rule_template}': not all templated elements have replacements: {source}"
    )]
    UnresolvedPlaceholder {
        rule_template: String,
        source: PlaceholderError,
    },

    #[error("a required value can not be found in the template group definition: {field}")]
    RequiredValueMissing { field: &'static str },
}

impl ValidationError {
    /// Name of the placeholder that had no replacement, for completeness failures
    pub fn unresolved_placeholder(&self) -> Option<&str> {
        match self {
            ValidationError::ScriptSubstitution {
                source: PlaceholderError::NoReplacement { name },
                ..
            }
            | ValidationError::UnresolvedPlaceholder {
                source: PlaceholderError::NoReplacement { name },
                ..
            } => Some(name.as_str()),
            _ => None,
        }
    }
}
