//! Lexer for rule template scripts using logos

use logos::Logos;

use crate::error::ScriptError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Declaration keywords
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,

    // Literal keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    // Assignment operators
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,

    // Comparison operators (longer first)
    #[token("===")]
    StrictEq,
    #[token("!==")]
    StrictNotEq,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LessOrEqual,
    #[token(">=")]
    GreaterOrEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    // Logical operators
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Bang,

    // Arithmetic operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| unescape(lex.slice()))]
    Str(String),

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,
}

/// Strip the quotes from a string literal and resolve its escapes
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Lex a script into tokens with spans, failing on the first unrecognised input
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ScriptError> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(ScriptError::UnexpectedCharacter {
                found: input[span.clone()].to_string(),
                span,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            tokens("var x = 10;"),
            vec![
                Token::Var,
                Token::Ident("x".to_string()),
                Token::Assign,
                Token::Number(10.0),
                Token::Semicolon
            ]
        );
    }

    #[test]
    fn test_operators_prefer_longest_match() {
        assert_eq!(
            tokens("=== == = !== != ! <= < += + /= /"),
            vec![
                Token::StrictEq,
                Token::Eq,
                Token::Assign,
                Token::StrictNotEq,
                Token::NotEq,
                Token::Bang,
                Token::LessOrEqual,
                Token::Less,
                Token::PlusAssign,
                Token::Plus,
                Token::SlashAssign,
                Token::Slash
            ]
        );
    }

    #[test]
    fn test_strings_in_both_quote_styles() {
        assert_eq!(
            tokens(r#"'it\'s' "say \"hi\"\n""#),
            vec![
                Token::Str("it's".to_string()),
                Token::Str("say \"hi\"\n".to_string())
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_identifier_prefixes() {
        assert_eq!(
            tokens("variable nullable"),
            vec![
                Token::Ident("variable".to_string()),
                Token::Ident("nullable".to_string())
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("a // line\n/* block */ b"),
            vec![Token::Ident("a".to_string()), Token::Ident("b".to_string())]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("42 3.5 1e3"),
            vec![Token::Number(42.0), Token::Number(3.5), Token::Number(1000.0)]
        );
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let err = lex("var x = #;").unwrap_err();
        assert_eq!(
            err,
            ScriptError::UnexpectedCharacter {
                span: 8..9,
                found: "#".to_string()
            }
        );
    }
}
