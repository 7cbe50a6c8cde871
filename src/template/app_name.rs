//! Extraction of the declared Siddhi application name

use regex::Regex;
use thiserror::Error;

use crate::model::Template;

/// Matches `@App:name('X')` or `@App:name("X")`. Group 1 is the name.
pub const SIDDHI_APP_NAME_PATTERN: &str = r#"@App:name\(\s*['"]([^'"]+)['"]\s*\)"#;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppNameError {
    #[error("invalid or missing Siddhi app name")]
    NotFound,

    #[error("template has no content to read an app name from")]
    NoContent,
}

#[derive(Debug, Clone)]
pub struct AppNameExtractor {
    pattern: Regex,
}

impl Default for AppNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AppNameExtractor {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(SIDDHI_APP_NAME_PATTERN)
                .expect("siddhi app name pattern is a valid regex"),
        }
    }

    /// First declared app name anywhere in `body`
    pub fn extract<'t>(&self, body: &'t str) -> Result<&'t str, AppNameError> {
        self.pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or(AppNameError::NotFound)
    }

    pub fn extract_from_template<'t>(&self, template: &'t Template) -> Result<&'t str, AppNameError> {
        let content = template.content.as_deref().ok_or(AppNameError::NoContent)?;
        self.extract(content)
    }
}
