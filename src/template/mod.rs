//! Templated text handling
//!
//! Placeholder scanning and substitution, Siddhi app name extraction, and derivation of
//! concrete artifacts from a rule template and a business rule.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use rule_templates::{AppNameExtractor, Placeholders};
//!
//! let values = BTreeMap::from([("appName".to_string(), "Demo".to_string())]);
//! let body = Placeholders::new()
//!     .substitute("@App:name('${appName}')", &values)
//!     .unwrap();
//! assert_eq!(body, "@App:name('Demo')");
//! assert_eq!(AppNameExtractor::new().extract(&body).unwrap(), "Demo");
//! ```

mod app_name;
mod placeholder;
mod resolver;

pub use app_name::{AppNameError, AppNameExtractor, SIDDHI_APP_NAME_PATTERN};
pub use placeholder::{PlaceholderError, Placeholders, Replacements, TEMPLATED_ELEMENT_PATTERN};
pub use resolver::{DerivedArtifact, ResolveError, TemplateResolver};
