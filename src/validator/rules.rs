//! Per-type requirements a rule template places on its templates
//!
//! Input and output rule templates expose a stream to rules built from scratch, so they are
//! held to a stricter shape than processing templates. Keeping both shapes in one table makes
//! the asymmetry explicit and lets the compiler check that every rule template type has one.

use crate::model::{RuleTemplateType, TemplateType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TemplateCount {
    ExactlyOne,
    AtLeastOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExposedStream {
    Required,
    Forbidden,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TemplateRules {
    pub count: TemplateCount,
    pub exposed_stream: ExposedStream,
    pub allowed_types: &'static [TemplateType],
}

impl TemplateRules {
    pub fn allows(&self, template_type: TemplateType) -> bool {
        self.allowed_types.contains(&template_type)
    }

    pub fn allowed_list(&self) -> String {
        self.allowed_types
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const STREAM_RULES: TemplateRules = TemplateRules {
    count: TemplateCount::ExactlyOne,
    exposed_stream: ExposedStream::Required,
    allowed_types: &[TemplateType::SiddhiApp],
};

const PROCESSING_RULES: TemplateRules = TemplateRules {
    count: TemplateCount::AtLeastOne,
    exposed_stream: ExposedStream::Forbidden,
    allowed_types: &[
        TemplateType::SiddhiApp,
        TemplateType::Gadget,
        TemplateType::Dashboard,
    ],
};

pub(crate) fn template_rules(kind: RuleTemplateType) -> TemplateRules {
    match kind {
        RuleTemplateType::Input | RuleTemplateType::Output => STREAM_RULES,
        RuleTemplateType::Template => PROCESSING_RULES,
    }
}
