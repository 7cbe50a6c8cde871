//! Template group, rule template and template records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{InstanceCount, RuleTemplateType, TemplateType};

/// A named collection of rule templates distributed as one definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absent in a malformed definition, which validation reports as a missing value
    #[serde(default)]
    pub rule_templates: Option<Vec<RuleTemplate>>,
}

impl TemplateGroup {
    /// Find a rule template by uuid
    pub fn rule_template(&self, uuid: &str) -> Option<&RuleTemplate> {
        self.rule_templates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|rt| rt.uuid.as_deref() == Some(uuid))
    }

    /// Name for messages, even when the definition lacks one
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// One stage (input, output or processing) of a business rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub instance_count: Option<String>,
    #[serde(default, rename = "type")]
    pub rule_template_type: Option<String>,
    /// Script computing derived values; may itself contain placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, RuleTemplateProperty>,
    #[serde(default)]
    pub templates: Option<Vec<Template>>,
}

impl RuleTemplate {
    pub fn instance_count(&self) -> Option<InstanceCount> {
        self.instance_count.as_deref().and_then(InstanceCount::parse)
    }

    pub fn kind(&self) -> Option<RuleTemplateType> {
        self.rule_template_type
            .as_deref()
            .and_then(RuleTemplateType::parse)
    }

    pub fn templates(&self) -> &[Template] {
        self.templates.as_deref().unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    pub fn display_uuid(&self) -> &str {
        self.uuid.as_deref().unwrap_or("<no uuid>")
    }
}

/// A configurable value of a rule template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTemplateProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl RuleTemplateProperty {
    pub fn with_default(value: impl Into<String>) -> Self {
        Self {
            default_value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// A templated artifact body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, rename = "type")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposed_stream_definition: Option<String>,
}

impl Template {
    pub fn kind(&self) -> Option<TemplateType> {
        self.template_type.as_deref().and_then(TemplateType::parse)
    }
}
