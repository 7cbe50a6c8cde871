//! User-authored business rules
//!
//! The core treats these as opaque records: they are decoded, encoded and used as a source of
//! property values when deriving artifacts, but never validated on their own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A business rule that fills in the properties of one rule template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRuleFromTemplate {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "templateGroupUUID")]
    pub template_group_uuid: String,
    #[serde(rename = "ruleTemplateUUID")]
    pub rule_template_uuid: String,
    #[serde(rename = "type", default)]
    pub rule_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A business rule assembled from an input and an output rule template plus raw rule logic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRuleFromScratch {
    pub uuid: String,
    pub name: String,
    #[serde(rename = "templateGroupUUID")]
    pub template_group_uuid: String,
    #[serde(rename = "inputRuleTemplateUUID")]
    pub input_rule_template_uuid: String,
    #[serde(rename = "outputRuleTemplateUUID")]
    pub output_rule_template_uuid: String,
    #[serde(rename = "type", default)]
    pub rule_type: String,
    #[serde(default)]
    pub properties: ScratchProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScratchProperties {
    #[serde(default)]
    pub input_data: BTreeMap<String, String>,
    #[serde(default)]
    pub rule_components: RuleComponents,
    #[serde(default)]
    pub output_data: BTreeMap<String, String>,
    /// Output stream attribute -> input stream attribute
    #[serde(default)]
    pub output_mappings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleComponents {
    #[serde(default)]
    pub filter_rules: Vec<String>,
    #[serde(default)]
    pub rule_logic: Vec<String>,
}
