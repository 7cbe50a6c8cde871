//! Proof that every templated element of a rule template has a value

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Error;
use crate::model::RuleTemplate;
use crate::script::{ScriptEngine, ScriptVariables};
use crate::template::Placeholders;

use super::ValidationError;

/// Values available to a rule template's templates.
///
/// Starts from the property defaults, lets `overrides` replace them, substitutes the result
/// into the script and runs it. Script variables win over properties of the same name.
pub(crate) fn resolve_values(
    rule_template: &RuleTemplate,
    overrides: &BTreeMap<String, String>,
    placeholders: &Placeholders,
    scripts: &ScriptEngine,
) -> Result<ScriptVariables, Error> {
    let name = rule_template.display_name();

    let mut values: ScriptVariables = rule_template
        .properties
        .iter()
        .map(|(key, property)| (key.clone(), property.default_value.clone()))
        .collect();
    values.extend(
        overrides
            .iter()
            .map(|(key, value)| (key.clone(), Some(value.clone()))),
    );

    let script = rule_template.script.as_deref().unwrap_or_default();
    let runnable = placeholders.substitute(script, &values).map_err(|source| {
        ValidationError::ScriptSubstitution {
            rule_template: name.to_string(),
            source,
        }
    })?;

    let generated = scripts
        .resolve_variables(&runnable)
        .map_err(|source| Error::Script {
            rule_template: name.to_string(),
            script: runnable.clone(),
            source,
        })?;
    debug!(
        rule_template = name,
        properties = values.len(),
        script_variables = generated.len(),
        "resolved templated element values"
    );
    values.extend(generated);
    Ok(values)
}

/// Check every template's content against the values the rule template can supply
pub(crate) fn check(
    rule_template: &RuleTemplate,
    placeholders: &Placeholders,
    scripts: &ScriptEngine,
) -> Result<(), Error> {
    let values = resolve_values(rule_template, &BTreeMap::new(), placeholders, scripts)?;
    for template in rule_template.templates() {
        let content = template.content.as_deref().unwrap_or_default();
        placeholders
            .check(content, &values)
            .map_err(|source| ValidationError::UnresolvedPlaceholder {
                rule_template: rule_template.display_name().to_string(),
                source,
            })?;
    }
    Ok(())
}
