//! Artifact derivation - turns a rule template plus a business rule into concrete content

use thiserror::Error;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::model::{BusinessRuleFromTemplate, RuleTemplate, TemplateType};
use crate::script::ScriptEngine;
use crate::validator::completeness::resolve_values;

use super::app_name::{AppNameError, AppNameExtractor};
use super::placeholder::{PlaceholderError, Placeholders};

/// Errors raised while deriving artifacts
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("business rule targets rule template '{found}', but rule template '{expected}' was given")]
    RuleTemplateMismatch { expected: String, found: String },

    #[error(transparent)]
    Values(#[from] Error),

    #[error("template {index} of rule template '{rule_template}' has an invalid type '{found}'")]
    InvalidTemplateType {
        rule_template: String,
        index: usize,
        found: String,
    },

    #[error("template {index} of rule template '{rule_template}': {source}")]
    Substitution {
        rule_template: String,
        index: usize,
        source: PlaceholderError,
    },

    #[error("template {index} of rule template '{rule_template}': {source}")]
    AppName {
        rule_template: String,
        index: usize,
        source: AppNameError,
    },
}

/// One fully substituted template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    pub template_type: TemplateType,
    pub content: String,
    /// Declared app name, for Siddhi apps only
    pub app_name: Option<String>,
}

/// Substitutes business rule values into the templates of a rule template
#[derive(Debug, Clone, Default)]
pub struct TemplateResolver {
    placeholders: Placeholders,
    app_names: AppNameExtractor,
    scripts: ScriptEngine,
}

impl TemplateResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            placeholders: Placeholders::new(),
            app_names: AppNameExtractor::new(),
            scripts: ScriptEngine::new(config.script.clone()),
        }
    }

    /// Derive one artifact per template of `rule_template`.
    ///
    /// The business rule's properties override property defaults. The script runs with those
    /// values and its variables take precedence over properties of the same name.
    pub fn derive_artifacts(
        &self,
        rule_template: &RuleTemplate,
        business_rule: &BusinessRuleFromTemplate,
    ) -> Result<Vec<DerivedArtifact>, ResolveError> {
        let uuid = rule_template.display_uuid();
        if business_rule.rule_template_uuid != uuid {
            return Err(ResolveError::RuleTemplateMismatch {
                expected: uuid.to_string(),
                found: business_rule.rule_template_uuid.clone(),
            });
        }

        let name = rule_template.display_name();
        info!(
            rule_template = name,
            business_rule = %business_rule.name,
            "deriving artifacts"
        );
        let values = resolve_values(
            rule_template,
            &business_rule.properties,
            &self.placeholders,
            &self.scripts,
        )?;

        rule_template
            .templates()
            .iter()
            .enumerate()
            .map(|(index, template)| -> Result<DerivedArtifact, ResolveError> {
                let raw_type = template.template_type.as_deref().unwrap_or_default();
                let template_type = TemplateType::parse(raw_type).ok_or_else(|| {
                    ResolveError::InvalidTemplateType {
                        rule_template: name.to_string(),
                        index,
                        found: raw_type.to_string(),
                    }
                })?;

                let content = self
                    .placeholders
                    .substitute(template.content.as_deref().unwrap_or_default(), &values)
                    .map_err(|source| ResolveError::Substitution {
                        rule_template: name.to_string(),
                        index,
                        source,
                    })?;

                let app_name = match template_type {
                    TemplateType::SiddhiApp => Some(
                        self.app_names
                            .extract(&content)
                            .map_err(|source| ResolveError::AppName {
                                rule_template: name.to_string(),
                                index,
                                source,
                            })?
                            .to_string(),
                    ),
                    TemplateType::Gadget | TemplateType::Dashboard => None,
                };
                debug!(rule_template = name, index, %template_type, ?app_name, "derived artifact");

                Ok(DerivedArtifact {
                    template_type,
                    content,
                    app_name,
                })
            })
            .collect()
    }
}
