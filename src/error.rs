//! Error types for script execution and template group validation

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::validator::ValidationError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A rule template script failed to run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("unexpected character '{found}' at {span:?}")]
    UnexpectedCharacter { span: Span, found: String },

    #[error("syntax error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("runtime error at {span:?}: {message}")]
    Runtime { span: Span, message: String },

    #[error("script exceeds the {limit} limit of {max}")]
    LimitExceeded { limit: &'static str, max: usize },
}

impl ScriptError {
    pub(crate) fn runtime(span: Span, message: impl Into<String>) -> Self {
        Self::Runtime {
            span,
            message: message.into(),
        }
    }

    /// Location in the script, when the failure has one
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::Syntax { span, .. }
            | Self::Runtime { span, .. } => Some(span),
            Self::LimitExceeded { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message, note) = match self {
            ScriptError::Syntax {
                span,
                message,
                expected,
            } => {
                let note = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (span.clone(), message.clone(), note)
            }
            ScriptError::UnexpectedCharacter { span, found } => (
                span.clone(),
                format!("Unexpected character '{}'", found),
                String::new(),
            ),
            ScriptError::Runtime { span, message } => {
                (span.clone(), message.clone(), String::new())
            }
            ScriptError::LimitExceeded { .. } => (0..0, self.to_string(), String::new()),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_config(Config::default().with_color(false))
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(format!("{}{}", message, note))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::script::lexer::Token>> for ScriptError {
    fn from(err: chumsky::error::Rich<'a, crate::script::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        // Format expected tokens nicely
        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ScriptError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::script::lexer::Token) -> String {
    use crate::script::lexer::Token;
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Str(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::Var => "keyword 'var'".to_string(),
        Token::Let => "keyword 'let'".to_string(),
        Token::Const => "keyword 'const'".to_string(),
        Token::True => "'true'".to_string(),
        Token::False => "'false'".to_string(),
        Token::Null => "'null'".to_string(),
        Token::Undefined => "'undefined'".to_string(),
        Token::Assign => "'='".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Question => "'?'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        // Other
        _ => format!("{:?}", tok),
    }
}

/// Errors reported while validating a template group
///
/// Structural problems and scripts that fail to run are kept apart so callers can tell a
/// badly shaped definition from broken embedded logic.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("error occurred while running the script of rule template '{rule_template}': {source}")]
    Script {
        rule_template: String,
        /// The script after property defaults were substituted into it
        script: String,
        source: ScriptError,
    },
}

impl Error {
    pub fn is_script(&self) -> bool {
        matches!(self, Error::Script { .. })
    }

    /// Render the error; script failures are annotated against the script that ran
    pub fn render(&self, filename: &str) -> String {
        match self {
            Error::Script {
                rule_template,
                script,
                source,
            } => format!(
                "error occurred while running the script of rule template '{}'\n{}",
                rule_template,
                source.format(script, filename)
            ),
            Error::Validation(e) => e.to_string(),
        }
    }
}
