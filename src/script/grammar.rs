//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::config::ScriptLimits;
use crate::error::ScriptError;
use crate::script::ast::*;
use crate::script::lexer::{self, Token};

/// Suffix applied to a primary expression
#[derive(Debug, Clone)]
enum Postfix {
    Member(Spanned<String>),
    Call(Vec<Spanned<Expr>>),
}

/// Parse script source into an AST under the default limits, reporting the first error
pub fn parse(input: &str) -> Result<Script, ScriptError> {
    parse_with_limits(input, &ScriptLimits::default())
}

/// Parse script source, rejecting statements nested deeper than `limits.max_depth`
pub fn parse_with_limits(input: &str, limits: &ScriptLimits) -> Result<Script, ScriptError> {
    let len = input.len();
    let tokens = lexer::lex(input)?;
    check_nesting(&tokens, limits.max_depth)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    script_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(ScriptError::from)
                .unwrap_or_else(|| ScriptError::Syntax {
                    span: 0..len,
                    message: "Invalid script".to_string(),
                    expected: vec![],
                })
        })
}

/// Bound the tree depth of every statement before any tree is built.
///
/// Each node that nests another expression comes from an operator, a `?`, a `.` or a `(`, so
/// their count within one statement is an upper bound on its depth.
fn check_nesting(tokens: &[(Token, lexer::Span)], max_depth: usize) -> Result<(), ScriptError> {
    let mut depth = 0usize;
    for (token, _) in tokens {
        match token {
            Token::Semicolon
            | Token::Var
            | Token::Let
            | Token::Const
            | Token::Assign
            | Token::PlusAssign
            | Token::MinusAssign
            | Token::StarAssign
            | Token::SlashAssign => depth = 0,
            Token::Ident(_)
            | Token::Str(_)
            | Token::Number(_)
            | Token::True
            | Token::False
            | Token::Null
            | Token::Undefined
            | Token::ParenClose
            | Token::Comma
            | Token::Colon => {}
            _ => {
                depth += 1;
                if depth > max_depth {
                    return Err(ScriptError::LimitExceeded {
                        limit: "depth",
                        max: max_depth,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Left-fold a chain of binary operations into a tree
fn fold_binary(first: Spanned<Expr>, rest: Vec<(BinaryOp, Spanned<Expr>)>) -> Spanned<Expr> {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        let span = lhs.span.start..rhs.span.end;
        Spanned::new(
            Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        )
    })
}

fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let expr = recursive(|expr| {
        let literal = select! {
            Token::Number(n) => Literal::Number(n),
            Token::Str(s) => Literal::Str(s),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            Token::Null => Literal::Null,
            Token::Undefined => Literal::Undefined,
        }
        .map(Expr::Literal);

        let variable = select! {
            Token::Ident(s) => Expr::Ident(s),
        };

        let parenthesized = expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .map(|inner: Spanned<Expr>| inner.node);

        let atom = choice((literal, variable, parenthesized))
            .map_with(|node, e| Spanned::new(node, span_range(&e.span())));

        let arguments = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        // Member access and calls: a.b, f(x), s.trim().length
        let postfix = choice((
            just(Token::Dot)
                .ignore_then(identifier.clone())
                .map(Postfix::Member),
            arguments.map(Postfix::Call),
        ))
        .map_with(|p, e| (p, span_range(&e.span())));

        let call = atom
            .then(postfix.repeated().collect::<Vec<_>>())
            .map(|(base, suffixes)| {
                suffixes.into_iter().fold(base, |target, (suffix, span)| {
                    let span = target.span.start..span.end;
                    let node = match suffix {
                        Postfix::Member(name) => Expr::Member {
                            target: Box::new(target),
                            name,
                        },
                        Postfix::Call(args) => Expr::Call {
                            callee: Box::new(target),
                            args,
                        },
                    };
                    Spanned::new(node, span)
                })
            })
            .boxed();

        // Prefix operators bind tighter than any binary operator
        let unary_op = choice((
            just(Token::Minus).to(UnaryOp::Neg),
            just(Token::Plus).to(UnaryOp::Plus),
            just(Token::Bang).to(UnaryOp::Not),
        ))
        .map_with(|op, e| (op, span_range(&e.span())));

        let unary = unary_op
            .repeated()
            .collect::<Vec<_>>()
            .then(call)
            .map(|(ops, operand)| {
                ops.into_iter().rev().fold(operand, |operand, (op, span)| {
                    let span = span.start..operand.span.end;
                    Spanned::new(
                        Expr::Unary {
                            op,
                            operand: Box::new(operand),
                        },
                        span,
                    )
                })
            })
            .boxed();

        let product = unary
            .clone()
            .then(
                choice((
                    just(Token::Star).to(BinaryOp::Mul),
                    just(Token::Slash).to(BinaryOp::Div),
                    just(Token::Percent).to(BinaryOp::Rem),
                ))
                .then(unary)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let sum = product
            .clone()
            .then(
                choice((
                    just(Token::Plus).to(BinaryOp::Add),
                    just(Token::Minus).to(BinaryOp::Sub),
                ))
                .then(product)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let comparison = sum
            .clone()
            .then(
                choice((
                    just(Token::LessOrEqual).to(BinaryOp::LessOrEqual),
                    just(Token::GreaterOrEqual).to(BinaryOp::GreaterOrEqual),
                    just(Token::Less).to(BinaryOp::Less),
                    just(Token::Greater).to(BinaryOp::Greater),
                ))
                .then(sum)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let equality = comparison
            .clone()
            .then(
                choice((
                    just(Token::StrictEq).to(BinaryOp::StrictEq),
                    just(Token::StrictNotEq).to(BinaryOp::StrictNotEq),
                    just(Token::Eq).to(BinaryOp::Eq),
                    just(Token::NotEq).to(BinaryOp::NotEq),
                ))
                .then(comparison)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let and = equality
            .clone()
            .then(
                just(Token::And)
                    .to(BinaryOp::And)
                    .then(equality)
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let or = and
            .clone()
            .then(
                just(Token::Or)
                    .to(BinaryOp::Or)
                    .then(and)
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        // Ternary is right-associative: the branches are full expressions
        or.then(
            just(Token::Question)
                .ignore_then(expr.clone())
                .then_ignore(just(Token::Colon))
                .then(expr.clone())
                .or_not(),
        )
        .map(|(cond, branches)| match branches {
            Some((then, otherwise)) => {
                let span = cond.span.start..otherwise.span.end;
                Spanned::new(
                    Expr::Conditional {
                        cond: Box::new(cond),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    },
                    span,
                )
            }
            None => cond,
        })
    });

    let decl_kind = choice((
        just(Token::Var).to(DeclKind::Var),
        just(Token::Let).to(DeclKind::Let),
        just(Token::Const).to(DeclKind::Const),
    ));

    let declaration = decl_kind
        .then(identifier.clone())
        .then(just(Token::Assign).ignore_then(expr.clone()).or_not())
        .map(|((kind, name), init)| Statement::Declare { kind, name, init });

    let assign_op = choice((
        just(Token::Assign).to(AssignOp::Set),
        just(Token::PlusAssign).to(AssignOp::Add),
        just(Token::MinusAssign).to(AssignOp::Sub),
        just(Token::StarAssign).to(AssignOp::Mul),
        just(Token::SlashAssign).to(AssignOp::Div),
    ));

    let assignment = identifier
        .then(assign_op)
        .then(expr.clone())
        .map(|((name, op), value)| Statement::Assign { name, op, value });

    let separators = just(Token::Semicolon).repeated().collect::<Vec<_>>();

    // Note: Order matters! Declarations start with a keyword, and an assignment
    // must be tried before a bare expression since both start with an identifier.
    let statement = choice((declaration, assignment, expr.map(Statement::Expr)))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .then_ignore(separators.clone())
        .boxed();

    separators
        .ignore_then(statement.repeated().collect())
        .then_ignore(end())
        .map(|statements| Script { statements })
}
