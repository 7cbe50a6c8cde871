//! Syntax tree for rule template scripts

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A parsed script: statements run once, top to bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub statements: Vec<Spanned<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `var x = 1`, `let y`, `const z = "a"`
    Declare {
        kind: DeclKind,
        name: Spanned<String>,
        init: Option<Spanned<Expr>>,
    },
    /// `x = 1`, `x += 1`
    Assign {
        name: Spanned<String>,
        op: AssignOp,
        value: Spanned<Expr>,
    },
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    /// `cond ? then : otherwise`
    Conditional {
        cond: Box<Spanned<Expr>>,
        then: Box<Spanned<Expr>>,
        otherwise: Box<Spanned<Expr>>,
    },
    /// `target.name`
    Member {
        target: Box<Spanned<Expr>>,
        name: Spanned<String>,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    And,
    Or,
}
