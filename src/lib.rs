//! Rule Templates - validation and resolution of business rule templates
//!
//! A template group bundles rule templates; each rule template holds one or more templates whose
//! content contains `${name}` placeholders. This library checks that a group is well formed and
//! that every placeholder can be given a value, either by a property default or by the rule
//! template's script, and derives concrete artifacts once a business rule supplies values.
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
//!             "name": "R", "uuid": "u2", "instanceCount": "one", "type": "input",
//!             "templates": [
//!                 {"type": "siddhiApp", "content": "a", "exposedStreamDefinition": "s"},
//!                 {"type": "siddhiApp", "content": "b", "exposedStreamDefinition": "s"}
//!             ]
//!         }]
//!     }}"#)
//!     .unwrap();
//! let err = validate_template_group(&group).unwrap_err();
//! assert!(err.to_string().contains("exactly one template"));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod script;
pub mod template;
pub mod validator;

pub use codec::{CodecError, JsonCodec};
pub use config::{ConfigError, EngineConfig, ScriptLimits};
pub use error::{Error, ScriptError};
pub use model::{
    BusinessRuleFromScratch, BusinessRuleFromTemplate, InstanceCount, RuleTemplate,
    RuleTemplateProperty, RuleTemplateType, Template, TemplateGroup, TemplateType,
};
pub use script::{resolve_variables, ScriptEngine, ScriptVariables};
pub use template::{
    AppNameError, AppNameExtractor, DerivedArtifact, PlaceholderError, Placeholders,
    Replacements, ResolveError, TemplateResolver, SIDDHI_APP_NAME_PATTERN,
    TEMPLATED_ELEMENT_PATTERN,
};
pub use validator::{validate_template_group, TemplateGroupValidator, ValidationError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn group(kind: &str, templates: usize) -> TemplateGroup {
        let template = Template {
            template_type: Some("siddhiApp".into()),
            content: Some("define stream S (a string);".into()),
            exposed_stream_definition: (kind != "template")
                .then(|| "define stream S (a string);".to_string()),
        };
        TemplateGroup {
            name: Some("G".into()),
            uuid: Some("u1".into()),
            description: None,
            rule_templates: Some(vec![RuleTemplate {
                name: Some("R".into()),
                uuid: Some("u2".into()),
                instance_count: Some("one".into()),
                rule_template_type: Some(kind.into()),
                templates: Some(vec![template; templates]),
                ..RuleTemplate::default()
            }]),
        }
    }

    #[test]
    fn test_single_template_group_is_valid() {
        assert!(validate_template_group(&group("template", 1)).is_ok());
        assert!(validate_template_group(&group("input", 1)).is_ok());
        assert!(validate_template_group(&group("output", 1)).is_ok());
    }

    #[test]
    fn test_input_with_two_templates_fails() {
        let err = validate_template_group(&group("input", 2)).unwrap_err();
        assert!(!err.is_script());
        assert!(err.to_string().contains("exactly one template"));
    }

    #[test]
    fn test_app_name_after_substitution() {
        let values = BTreeMap::from([("appName".to_string(), "Demo".to_string())]);
        let body = Placeholders::new()
            .substitute("@App:name('${appName}')", &values)
            .unwrap();
        assert_eq!(body, "@App:name('Demo')");
        assert_eq!(AppNameExtractor::new().extract(&body), Ok("Demo"));
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let text = "from S\n  select *;\n\t-- ${ not a placeholder";
        let out = Placeholders::new()
            .substitute(text, &BTreeMap::<String, String>::new())
            .unwrap();
        assert_eq!(out, text);
    }
}
