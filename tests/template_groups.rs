//! Integration tests for template group validation and artifact derivation

use std::fs;
use std::path::PathBuf;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use rule_templates::{
    validate_template_group, CodecError, EngineConfig, Error, JsonCodec, ResolveError,
    ScriptError, TemplateGroup, TemplateGroupValidator, TemplateResolver, TemplateType,
    ValidationError,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(name: &str) -> TemplateGroup {
    JsonCodec::new()
        .template_group_from_file(fixture(name))
        .expect("Should decode fixture")
}

fn from_json(json: &str) -> TemplateGroup {
    JsonCodec::new()
        .template_group_from_str(json)
        .expect("Should decode")
}

#[test]
fn test_concrete_valid_group() {
    let group = from_json(
        r#"{"templateGroup": {
            "name": "G", "uuid": "u1",
            "ruleTemplates": [{
                "name": "R", "uuid": "u2", "instanceCount": "one", "type": "template",
                "templates": [{"type": "siddhiApp", "content": "define stream S (a string);"}]
            }]
        }}"#,
    );
    validate_template_group(&group).expect("Should be valid");
}

#[test]
fn test_concrete_input_with_two_templates() {
    let group = from_json(
        r#"{"templateGroup": {
            "name": "G", "uuid": "u1",
            "ruleTemplates": [{
                "name": "R", "uuid": "u2", "instanceCount": "one", "type": "input",
                "templates": [
                    {"type": "siddhiApp", "content": "define stream S (a string);",
                     "exposedStreamDefinition": "define stream S (a string);"},
                    {"type": "siddhiApp", "content": "define stream T (a string);",
                     "exposedStreamDefinition": "define stream T (a string);"}
                ]
            }]
        }}"#,
    );
    let err = validate_template_group(&group).unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @"invalid rule template 'u2': there should be exactly one template for a input type rule template, found 2"
    );
}

#[test]
fn test_fixture_group_is_valid() {
    let group = load("sensor_analytics.json");
    assert_eq!(group.display_name(), "Sensor Analytics");
    TemplateGroupValidator::default()
        .validate(&group)
        .expect("Should be valid");
}

#[test]
fn test_fixture_with_unresolved_placeholder() {
    let group = load("unresolved_placeholder.json");
    match validate_template_group(&group) {
        Err(Error::Validation(e)) => {
            assert_eq!(e.unresolved_placeholder(), Some("limit"));
            assert_snapshot!(
                e.to_string(),
                @"invalid template in rule template 'Missing Value': not all templated elements have replacements: no replacement found for 'limit'"
            );
        }
        other => panic!("Expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_script_defines_the_missing_placeholder() {
    let mut group = load("unresolved_placeholder.json");
    let rule_templates = group.rule_templates.as_mut().expect("Should have rule templates");
    rule_templates[0].script = Some("var limit = 100;".into());
    validate_template_group(&group).expect("Should be valid once the script defines it");
}

#[test]
fn test_null_script_variable_counts_as_defined() {
    let mut group = load("unresolved_placeholder.json");
    let rule_templates = group.rule_templates.as_mut().expect("Should have rule templates");
    rule_templates[0].script = Some("var limit = null;".into());
    validate_template_group(&group).expect("Should be valid");
}

#[test]
fn test_script_errors_are_reported_apart() {
    let mut group = load("unresolved_placeholder.json");
    let rule_templates = group.rule_templates.as_mut().expect("Should have rule templates");
    rule_templates[0].script = Some("var limit = (1 + ;".into());
    let err = validate_template_group(&group).unwrap_err();
    assert!(err.is_script());
    match &err {
        Error::Script { source, .. } => assert!(matches!(source, ScriptError::Syntax { .. })),
        other => panic!("Expected a script error, got {:?}", other),
    }
    let rendered = err.render("missing-value");
    assert!(rendered.contains("Missing Value"));
    assert!(rendered.contains("var limit = (1 + ;"));
    assert!(!rendered.contains('\x1b'));
}

#[test]
fn test_step_limit_from_config() {
    let config = EngineConfig::from_str("[script]\nmax_steps = 3\n").expect("Should parse config");
    let group = load("sensor_analytics.json");
    let err = TemplateGroupValidator::new(&config)
        .validate(&group)
        .unwrap_err();
    match err {
        Error::Script { source, .. } => assert_eq!(
            source,
            ScriptError::LimitExceeded {
                limit: "step",
                max: 3
            }
        ),
        other => panic!("Expected a script error, got {:?}", other),
    }
}

#[test]
fn test_instance_count_case_variants() {
    for count in ["one", "ONE", "Many", "mAnY"] {
        let group = from_json(&format!(
            r#"{{"templateGroup": {{
                "name": "G", "uuid": "u1",
                "ruleTemplates": [{{
                    "name": "R", "uuid": "u2", "instanceCount": "{}", "type": "TEMPLATE",
                    "templates": [{{"type": "dashboard", "content": "{{}}"}}]
                }}]
            }}}}"#,
            count
        ));
        assert!(validate_template_group(&group).is_ok(), "{}", count);
    }
}

#[test]
fn test_missing_rule_templates_is_a_required_value() {
    let group = from_json(r#"{"templateGroup": {"name": "G", "uuid": "u1"}}"#);
    match validate_template_group(&group) {
        Err(Error::Validation(e)) => assert_eq!(
            e,
            ValidationError::RequiredValueMissing {
                field: "ruleTemplates"
            }
        ),
        other => panic!("Expected a validation error, got {:?}", other),
    }
}

#[test]
fn test_missing_group_file() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("absent.json");
    let err = JsonCodec::new().template_group_from_file(&path).unwrap_err();
    assert!(matches!(err, CodecError::FileNotFound { .. }));
}

#[test]
fn test_group_written_and_read_back() {
    let codec = JsonCodec::new();
    let group = load("sensor_analytics.json");
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("group.json");
    fs::write(&path, codec.template_group_to_json(&group).expect("Should encode"))
        .expect("Should write");
    assert_eq!(codec.template_group_from_file(&path).expect("Should decode"), group);
}

#[test]
fn test_derive_fixture_business_rule() {
    let group = load("sensor_analytics.json");
    let rule = JsonCodec::new()
        .business_rule_from_template(
            &fs::read_to_string(fixture("temperature_rule.json")).expect("Should read fixture"),
        )
        .expect("Should decode business rule");
    let rule_template = group
        .rule_template(&rule.rule_template_uuid)
        .expect("Should find rule template");

    let artifacts = TemplateResolver::default()
        .derive_artifacts(rule_template, &rule)
        .expect("Should derive");
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].template_type, TemplateType::SiddhiApp);
    assert_eq!(artifacts[0].app_name.as_deref(), Some("BoilerRoom"));
    assert_snapshot!(&artifacts[0].content, @r###"
    @App:name('BoilerRoom')
    define stream SensorStream (id string, temperature double);
    from SensorStream#window.time(60000 milliseconds)
    select id, avg(temperature) as avgTemp
    having avgTemp > 85
    insert into criticalAlertStream;
    "###);
    assert_eq!(artifacts[1].template_type, TemplateType::Gadget);
    assert_eq!(artifacts[1].content, r#"{"title": "BoilerRoom alerts"}"#);
}

#[test]
fn test_derive_for_wrong_rule_template() {
    let group = load("sensor_analytics.json");
    let rule = JsonCodec::new()
        .business_rule_from_template(
            &fs::read_to_string(fixture("temperature_rule.json")).expect("Should read fixture"),
        )
        .expect("Should decode business rule");
    let input = group
        .rule_template("sensor-input")
        .expect("Should find rule template");
    let err = TemplateResolver::default()
        .derive_artifacts(input, &rule)
        .unwrap_err();
    assert!(matches!(err, ResolveError::RuleTemplateMismatch { .. }));
}
