//! Templated element scanning and substitution
//!
//! A templated element is `${name}`: the name is any run of characters other than braces and
//! whitespace, captured exactly as written. The same compiled pattern drives substitution,
//! completeness checks and listing, so all three agree on what counts as a placeholder.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use regex::Regex;
use thiserror::Error;

/// The templated element grammar. Group 1 is the element name.
pub const TEMPLATED_ELEMENT_PATTERN: &str = r"\$\{([^{}\s]+)\}";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("no replacement found for '{name}'")]
    NoReplacement { name: String },

    #[error("invalid placeholder pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// A name -> value source for placeholder replacement
pub trait Replacements {
    /// Concrete value to substitute for `name`
    fn replacement(&self, name: &str) -> Option<&str>;

    /// Whether `name` is defined at all. Sources that can hold a defined-but-null value
    /// override this to report key presence.
    fn defines(&self, name: &str) -> bool {
        self.replacement(name).is_some()
    }
}

impl<S: BuildHasher> Replacements for HashMap<String, String, S> {
    fn replacement(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Replacements for BTreeMap<String, String> {
    fn replacement(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Replacements for BTreeMap<String, Option<String>> {
    fn replacement(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_deref())
    }

    fn defines(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

/// Compiled placeholder grammar
#[derive(Debug, Clone)]
pub struct Placeholders {
    pattern: Regex,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::new()
    }
}

impl Placeholders {
    /// Placeholders using [`TEMPLATED_ELEMENT_PATTERN`]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(TEMPLATED_ELEMENT_PATTERN)
                .expect("templated element pattern is a valid regex"),
        }
    }

    /// Placeholders using a custom pattern, which must have a capture group for the name
    pub fn with_pattern(pattern: &str) -> Result<Self, PlaceholderError> {
        let regex = Regex::new(pattern).map_err(|e| PlaceholderError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        if regex.captures_len() < 2 {
            return Err(PlaceholderError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern must capture the element name in group 1".to_string(),
            });
        }
        Ok(Self { pattern: regex })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Element names in order of appearance, repeats included
    pub fn names<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Replace every element in `text` with its value.
    ///
    /// Fails on the first element without a value. Text outside elements is kept verbatim,
    /// and values are inserted literally (no `$` expansion).
    pub fn substitute(
        &self,
        text: &str,
        values: &impl Replacements,
    ) -> Result<String, PlaceholderError> {
        let mut resolved = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.pattern.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value =
                values
                    .replacement(name.as_str())
                    .ok_or_else(|| PlaceholderError::NoReplacement {
                        name: name.as_str().to_string(),
                    })?;
            resolved.push_str(&text[last..whole.start()]);
            resolved.push_str(value);
            last = whole.end();
        }
        resolved.push_str(&text[last..]);
        Ok(resolved)
    }

    /// Check that every element in `text` is defined by `values`, without substituting
    pub fn check(&self, text: &str, values: &impl Replacements) -> Result<(), PlaceholderError> {
        match self.names(text).find(|name| !values.defines(name)) {
            Some(name) => Err(PlaceholderError::NoReplacement {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let p = Placeholders::new();
        let text = "define stream S (a string);\n\n  from S select a insert into T;\t";
        assert_eq!(p.substitute(text, &values(&[])).unwrap(), text);
    }

    #[test]
    fn test_substitutes_every_occurrence() {
        let p = Placeholders::new();
        let resolved = p
            .substitute(
                "@App:name('${appName}')\nfrom ${in} select * insert into ${out};\n-- ${appName}",
                &values(&[("appName", "Demo"), ("in", "A"), ("out", "B")]),
            )
            .unwrap();
        assert_eq!(
            resolved,
            "@App:name('Demo')\nfrom A select * insert into B;\n-- Demo"
        );
    }

    #[test]
    fn test_adjacent_placeholders_do_not_merge() {
        let p = Placeholders::new();
        assert_eq!(
            p.names("${a}${b} ${c}").collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        let resolved = p
            .substitute("${a}${b}", &values(&[("a", "1"), ("b", "2")]))
            .unwrap();
        assert_eq!(resolved, "12");
    }

    #[test]
    fn test_values_are_inserted_literally() {
        let p = Placeholders::new();
        let resolved = p
            .substitute("x = ${v}", &values(&[("v", "$1 \\n ${w}")]))
            .unwrap();
        assert_eq!(resolved, "x = $1 \\n ${w}");
    }

    #[test]
    fn test_missing_value_names_first_unresolved() {
        let p = Placeholders::new();
        let err = p
            .substitute("${known} ${first} ${second}", &values(&[("known", "k")]))
            .unwrap_err();
        assert_eq!(
            err,
            PlaceholderError::NoReplacement {
                name: "first".to_string()
            }
        );
        assert_eq!(err.to_string(), "no replacement found for 'first'");
    }

    #[test]
    fn test_check_uses_key_presence_for_nullable_values() {
        let p = Placeholders::new();
        let mut vars: BTreeMap<String, Option<String>> = BTreeMap::new();
        vars.insert("nothing".to_string(), None);
        assert!(p.check("value: ${nothing}", &vars).is_ok());
        assert!(p.substitute("value: ${nothing}", &vars).is_err());
        assert!(matches!(
            p.check("${other}", &vars),
            Err(PlaceholderError::NoReplacement { name }) if name == "other"
        ));
    }

    #[test]
    fn test_non_identifier_braces_are_not_placeholders() {
        let p = Placeholders::new();
        assert_eq!(p.names("${} ${ spaced } $name {x}").count(), 0);
    }

    #[test]
    fn test_custom_pattern_requires_capture_group() {
        assert!(Placeholders::with_pattern(r"\{\{(\w+)\}\}").is_ok());
        assert!(matches!(
            Placeholders::with_pattern(r"\{\{\w+\}\}"),
            Err(PlaceholderError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Placeholders::with_pattern(r"(unclosed"),
            Err(PlaceholderError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_custom_pattern_substitution() {
        let p = Placeholders::with_pattern(r"\{\{(\w+)\}\}").unwrap();
        assert_eq!(
            p.substitute("hi {{who}}", &values(&[("who", "there")])).unwrap(),
            "hi there"
        );
    }
}
