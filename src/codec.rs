//! JSON encoding and decoding of template groups and business rules
//!
//! Template group files wrap the definition in a top-level `"templateGroup"` key. Business
//! rules are plain objects.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::model::{BusinessRuleFromScratch, BusinessRuleFromTemplate, TemplateGroup};

const TEMPLATE_GROUP_KEY: &str = "templateGroup";

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("file '{path}' not found")]
    FileNotFound { path: String },

    #[error("failed to read '{path}': {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no 'templateGroup' entry found in the template group definition")]
    MissingTemplateGroup,
}

/// Stateless JSON codec. Construct once and share.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        JsonCodec
    }

    /// Load a template group definition from a file
    pub fn template_group_from_file(&self, path: impl AsRef<Path>) -> Result<TemplateGroup, CodecError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CodecError::FileNotFound { path: shown.clone() }
            } else {
                CodecError::IoError {
                    path: shown.clone(),
                    source,
                }
            }
        })?;
        debug!(path = %shown, bytes = text.len(), "read template group file");
        self.template_group_from_str(&text)
    }

    pub fn template_group_from_str(&self, text: &str) -> Result<TemplateGroup, CodecError> {
        let value: Value = serde_json::from_str(text)?;
        self.template_group_from_value(value)
    }

    /// Decode a template group from a `{"templateGroup": {...}}` document
    pub fn template_group_from_value(&self, mut value: Value) -> Result<TemplateGroup, CodecError> {
        let group = value
            .get_mut(TEMPLATE_GROUP_KEY)
            .map(Value::take)
            .ok_or(CodecError::MissingTemplateGroup)?;
        Ok(serde_json::from_value(group)?)
    }

    /// Encode a template group in the same wrapped form it is read from
    pub fn template_group_to_json(&self, group: &TemplateGroup) -> Result<String, CodecError> {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(TEMPLATE_GROUP_KEY.to_string(), serde_json::to_value(group)?);
        self.encode(&wrapper)
    }

    pub fn business_rule_from_template(&self, text: &str) -> Result<BusinessRuleFromTemplate, CodecError> {
        self.decode(text)
    }

    pub fn business_rule_from_scratch(&self, text: &str) -> Result<BusinessRuleFromScratch, CodecError> {
        self.decode(text)
    }

    pub fn business_rule_from_template_to_json(
        &self,
        rule: &BusinessRuleFromTemplate,
    ) -> Result<String, CodecError> {
        self.encode(rule)
    }

    pub fn business_rule_from_scratch_to_json(
        &self,
        rule: &BusinessRuleFromScratch,
    ) -> Result<String, CodecError> {
        self.encode(rule)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}
