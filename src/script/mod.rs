//! Script variable resolution
//!
//! A rule template may carry a small script that derives extra values from its properties.
//! Scripts are written in a restricted JavaScript-like language: declarations, assignments,
//! arithmetic, comparisons, string methods and a handful of builtins. There are no loops,
//! user functions or host bindings.
//!
//! # Example
//!
//! ```rust
//! use rule_templates::script::resolve_variables;
//!
//! let vars = resolve_variables("var windowMs = 5 * 1000; var unit = 'ms';").unwrap();
//! assert_eq!(vars["windowMs"].as_deref(), Some("5000"));
//! assert_eq!(vars["unit"].as_deref(), Some("ms"));
//! ```

pub mod ast;
mod eval;
mod grammar;
pub mod lexer;

pub use eval::{format_number, Interpreter, ScriptVariables, Value};
pub use grammar::{parse, parse_with_limits};

use tracing::debug;

use crate::config::ScriptLimits;
use crate::error::ScriptError;

/// Runs scripts under a fixed set of limits.
///
/// The engine holds no bindings itself: every call gets a fresh interpreter, so concurrent
/// or consecutive runs never observe each other's variables.
#[derive(Debug, Clone, Default)]
pub struct ScriptEngine {
    limits: ScriptLimits,
}

impl ScriptEngine {
    pub fn new(limits: ScriptLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ScriptLimits {
        &self.limits
    }

    /// Run `script` once and return every top-level binding it leaves, stringified
    pub fn resolve_variables(&self, script: &str) -> Result<ScriptVariables, ScriptError> {
        if script.len() > self.limits.max_source_bytes {
            return Err(ScriptError::LimitExceeded {
                limit: "source size",
                max: self.limits.max_source_bytes,
            });
        }
        let program = parse_with_limits(script, &self.limits)?;
        let variables = Interpreter::new(&self.limits).run(&program)?;
        debug!(
            statements = program.statements.len(),
            variables = variables.len(),
            "script resolved"
        );
        Ok(variables)
    }
}

/// Resolve script variables with the default limits
pub fn resolve_variables(script: &str) -> Result<ScriptVariables, ScriptError> {
    ScriptEngine::default().resolve_variables(script)
}
