//! Structural validation of template groups
//!
//! Validation walks the group depth-first and stops at the first violation. After a rule
//! template's templates pass the structural checks, its placeholders are checked for
//! completeness: each `${name}` in a template must be supplied by a property or by the
//! rule template's script.
//!
//! # Example
//!
//! ```rust
//! use rule_templates::{validate_template_group, JsonCodec};
//!
//! let group = JsonCodec::new()
//!     .template_group_from_str(r#"{"templateGroup": {
//!         "name": "G", "uuid": "u1",
//!         "ruleTemplates": [{
//!             "name": "R", "uuid": "u2", "instanceCount": "one", "type": "template",
//!             "templates": [{"type": "siddhiApp", "content": "define stream S (a string);"}]
//!         }]
//!     }}"#)
//!     .unwrap();
//! assert!(validate_template_group(&group).is_ok());
//! ```

pub(crate) mod completeness;
mod error;
mod rules;

pub use error::ValidationError;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::model::{RuleTemplate, RuleTemplateType, Template, TemplateGroup, TemplateType};
use crate::script::ScriptEngine;
use crate::template::Placeholders;

use rules::{template_rules, ExposedStream, TemplateCount, TemplateRules};

/// Validates template groups. Holds only immutable, compiled state and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct TemplateGroupValidator {
    placeholders: Placeholders,
    scripts: ScriptEngine,
}

impl TemplateGroupValidator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            placeholders: Placeholders::new(),
            scripts: ScriptEngine::new(config.script.clone()),
        }
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn scripts(&self) -> &ScriptEngine {
        &self.scripts
    }

    /// Validate a whole template group, reporting the first violation found
    pub fn validate(&self, group: &TemplateGroup) -> Result<(), Error> {
        info!(group = group.display_name(), "validating template group");
        let result = self.validate_group(group);
        if let Err(e) = &result {
            warn!(group = group.display_name(), error = %e, "template group is invalid");
        }
        result
    }

    fn validate_group(&self, group: &TemplateGroup) -> Result<(), Error> {
        let name = match group.name.as_deref() {
            None => return Err(ValidationError::MissingGroupName.into()),
            Some("") => return Err(ValidationError::EmptyGroupName.into()),
            Some(name) => name,
        };
        match group.uuid.as_deref() {
            None => {
                return Err(ValidationError::MissingGroupUuid {
                    group: name.to_string(),
                }
                .into())
            }
            Some("") => {
                return Err(ValidationError::EmptyGroupUuid {
                    group: name.to_string(),
                }
                .into())
            }
            Some(_) => {}
        }
        let rule_templates =
            group
                .rule_templates
                .as_deref()
                .ok_or(ValidationError::RequiredValueMissing {
                    field: "ruleTemplates",
                })?;
        if rule_templates.is_empty() {
            return Err(ValidationError::NoRuleTemplates {
                group: name.to_string(),
            }
            .into());
        }
        for rule_template in rule_templates {
            self.validate_rule_template(rule_template)?;
        }
        Ok(())
    }

    /// Validate one rule template: its own fields, each template, then placeholder completeness
    pub fn validate_rule_template(&self, rule_template: &RuleTemplate) -> Result<(), Error> {
        let name = match rule_template.name.as_deref() {
            None => return Err(ValidationError::MissingRuleTemplateName.into()),
            Some("") => return Err(ValidationError::EmptyRuleTemplateName.into()),
            Some(name) => name.to_string(),
        };
        debug!(rule_template = %name, "validating rule template");

        let uuid = match rule_template.uuid.as_deref() {
            None => {
                return Err(ValidationError::MissingRuleTemplateUuid {
                    rule_template: name,
                }
                .into())
            }
            Some("") => {
                return Err(ValidationError::EmptyRuleTemplateUuid {
                    rule_template: name,
                }
                .into())
            }
            Some(uuid) => uuid.to_string(),
        };

        let instance_count = rule_template.instance_count.as_deref().ok_or_else(|| {
            ValidationError::MissingInstanceCount {
                rule_template: name.clone(),
            }
        })?;
        if rule_template.instance_count().is_none() {
            return Err(ValidationError::InvalidInstanceCount {
                rule_template: name,
                found: instance_count.to_string(),
            }
            .into());
        }

        let raw_type = rule_template
            .rule_template_type
            .as_deref()
            .ok_or_else(|| ValidationError::MissingRuleTemplateType {
                rule_template: name.clone(),
            })?;
        let kind = rule_template
            .kind()
            .ok_or_else(|| ValidationError::InvalidRuleTemplateType {
                uuid: uuid.clone(),
                found: raw_type.to_string(),
            })?;

        let templates =
            rule_template
                .templates
                .as_deref()
                .ok_or_else(|| ValidationError::MissingTemplates {
                    rule_template: name.clone(),
                })?;

        let rules = template_rules(kind);
        match rules.count {
            TemplateCount::ExactlyOne if templates.len() != 1 => {
                return Err(ValidationError::ExactlyOneTemplate {
                    uuid,
                    kind,
                    count: templates.len(),
                }
                .into());
            }
            TemplateCount::AtLeastOne if templates.is_empty() => {
                return Err(ValidationError::NoTemplates { uuid, kind }.into());
            }
            _ => {}
        }

        for template in templates {
            validate_template(template, &name, kind, &rules)?;
        }

        completeness::check(rule_template, &self.placeholders, &self.scripts)
    }

    /// Prove that every placeholder in the rule template's templates has a value
    pub fn check_placeholder_completeness(&self, rule_template: &RuleTemplate) -> Result<(), Error> {
        completeness::check(rule_template, &self.placeholders, &self.scripts)
    }
}

fn validate_template(
    template: &Template,
    rule_template: &str,
    kind: RuleTemplateType,
    rules: &TemplateRules,
) -> Result<(), ValidationError> {
    let raw_type =
        template
            .template_type
            .as_deref()
            .ok_or_else(|| ValidationError::MissingTemplateType {
                rule_template: rule_template.to_string(),
            })?;
    let template_type =
        TemplateType::parse(raw_type).ok_or_else(|| ValidationError::InvalidTemplateType {
            rule_template: rule_template.to_string(),
            found: raw_type.to_string(),
        })?;

    match template.content.as_deref() {
        None => {
            return Err(ValidationError::MissingContent {
                rule_template: rule_template.to_string(),
            })
        }
        Some("") => {
            return Err(ValidationError::EmptyContent {
                rule_template: rule_template.to_string(),
            })
        }
        Some(_) => {}
    }

    match (rules.exposed_stream, &template.exposed_stream_definition) {
        (ExposedStream::Required, None) => {
            return Err(ValidationError::MissingExposedStreamDefinition {
                rule_template: rule_template.to_string(),
                kind,
            })
        }
        (ExposedStream::Forbidden, Some(_)) => {
            return Err(ValidationError::UnexpectedExposedStreamDefinition {
                rule_template: rule_template.to_string(),
                kind,
            })
        }
        _ => {}
    }

    if !rules.allows(template_type) {
        return Err(ValidationError::TemplateTypeNotAllowed {
            rule_template: rule_template.to_string(),
            kind,
            found: template_type,
            allowed: rules.allowed_list(),
        });
    }
    Ok(())
}

/// Validate a template group with the default configuration
pub fn validate_template_group(group: &TemplateGroup) -> Result<(), Error> {
    TemplateGroupValidator::default().validate(group)
}
