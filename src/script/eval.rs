//! Sandboxed evaluation of parsed scripts
//!
//! Each [`Interpreter`] owns its bindings and is discarded after one run. There is no global
//! object, no host access and no way to define functions or loops; the only callables are
//! the fixed builtins below.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ScriptLimits;
use crate::error::ScriptError;
use crate::script::ast::*;

/// Variables a script leaves behind. `None` marks a binding whose value is null or undefined.
pub type ScriptVariables = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::Str(s) => string_to_number(s.trim()),
        }
    }

    /// The string stored for a binding; null and undefined have none
    pub fn into_binding(self) -> Option<String> {
        match self {
            Value::Undefined | Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Render a number the way scripts expect: integral values have no fraction
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form, with an explicit sign on positive exponents: 1e+21, 1.5e-7
        let s = format!("{:e}", n);
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => s,
        }
    } else {
        format!("{}", n)
    }
}

const RADIX_PREFIXES: [(&str, u32); 6] = [
    ("0x", 16),
    ("0X", 16),
    ("0o", 8),
    ("0O", 8),
    ("0b", 2),
    ("0B", 2),
];

/// Numeric value of trimmed string text, NaN when it is not a number literal
fn string_to_number(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in RADIX_PREFIXES {
        if let Some(digits) = s.strip_prefix(prefix) {
            return digits_to_number(digits, radix).unwrap_or(f64::NAN);
        }
    }
    match s {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust would accept "inf" and "NaN"; script numbers never do
        _ if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => s.parse().unwrap_or(f64::NAN),
    }
}

/// All of `digits` read in `radix`; `None` if empty or any character is not a digit
fn digits_to_number(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
}

#[derive(Debug)]
struct Binding {
    value: Value,
    constant: bool,
}

/// Runs one script against a fresh set of bindings
pub struct Interpreter<'l> {
    limits: &'l ScriptLimits,
    bindings: BTreeMap<String, Binding>,
    steps: usize,
    depth: usize,
}

impl<'l> Interpreter<'l> {
    pub fn new(limits: &'l ScriptLimits) -> Self {
        Self {
            limits,
            bindings: BTreeMap::new(),
            steps: 0,
            depth: 0,
        }
    }

    /// Execute every statement and return the resulting top-level bindings
    pub fn run(mut self, script: &Script) -> Result<ScriptVariables, ScriptError> {
        for stmt in &script.statements {
            self.exec(stmt)?;
        }
        Ok(self
            .bindings
            .into_iter()
            .map(|(name, binding)| (name, binding.value.into_binding()))
            .collect())
    }

    fn exec(&mut self, stmt: &Spanned<Statement>) -> Result<(), ScriptError> {
        match &stmt.node {
            Statement::Declare { kind, name, init } => {
                if let Some(existing) = self.bindings.get(&name.node) {
                    if existing.constant || *kind != DeclKind::Var {
                        return Err(ScriptError::runtime(
                            name.span.clone(),
                            format!("Identifier '{}' has already been declared", name.node),
                        ));
                    }
                }
                let value = match init {
                    Some(expr) => Some(self.eval(expr)?),
                    None if *kind == DeclKind::Const => {
                        return Err(ScriptError::runtime(
                            stmt.span.clone(),
                            format!("Missing initializer in const declaration '{}'", name.node),
                        ));
                    }
                    None => None,
                };
                match (value, self.bindings.get_mut(&name.node)) {
                    // `var x;` keeps an existing value
                    (None, Some(_)) => {}
                    (Some(value), Some(existing)) => existing.value = value,
                    (value, None) => {
                        self.bindings.insert(
                            name.node.clone(),
                            Binding {
                                value: value.unwrap_or(Value::Undefined),
                                constant: *kind == DeclKind::Const,
                            },
                        );
                    }
                }
                Ok(())
            }
            Statement::Assign { name, op, value } => {
                let rhs = self.eval(value)?;
                let current = match self.bindings.get(&name.node) {
                    Some(b) if b.constant => {
                        return Err(ScriptError::runtime(
                            name.span.clone(),
                            format!("Assignment to constant variable '{}'", name.node),
                        ));
                    }
                    Some(b) => Some(b.value.clone()),
                    None => None,
                };
                let new_value = match (op, current) {
                    (AssignOp::Set, _) => rhs,
                    (_, None) => {
                        return Err(ScriptError::runtime(
                            name.span.clone(),
                            format!("{} is not defined", name.node),
                        ));
                    }
                    (AssignOp::Add, Some(lhs)) => self.add(lhs, rhs)?,
                    (AssignOp::Sub, Some(lhs)) => Value::Number(lhs.to_number() - rhs.to_number()),
                    (AssignOp::Mul, Some(lhs)) => Value::Number(lhs.to_number() * rhs.to_number()),
                    (AssignOp::Div, Some(lhs)) => Value::Number(lhs.to_number() / rhs.to_number()),
                };
                // Plain assignment to an undeclared name creates a binding, as in sloppy JavaScript
                self.bindings.insert(
                    name.node.clone(),
                    Binding {
                        value: new_value,
                        constant: false,
                    },
                );
                Ok(())
            }
            Statement::Expr(expr) => self.eval(expr).map(|_| ()),
        }
    }

    fn tick(&mut self) -> Result<(), ScriptError> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            return Err(ScriptError::LimitExceeded {
                limit: "step",
                max: self.limits.max_steps,
            });
        }
        Ok(())
    }

    fn string(&self, s: String) -> Result<Value, ScriptError> {
        if s.len() > self.limits.max_string_bytes {
            return Err(ScriptError::LimitExceeded {
                limit: "string size",
                max: self.limits.max_string_bytes,
            });
        }
        Ok(Value::Str(s))
    }

    fn eval(&mut self, expr: &Spanned<Expr>) -> Result<Value, ScriptError> {
        self.tick()?;
        if self.depth >= self.limits.max_depth {
            return Err(ScriptError::LimitExceeded {
                limit: "depth",
                max: self.limits.max_depth,
            });
        }
        self.depth += 1;
        let result = self.eval_node(expr);
        self.depth -= 1;
        result
    }

    fn eval_node(&mut self, expr: &Spanned<Expr>) -> Result<Value, ScriptError> {
        match &expr.node {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
                Literal::Undefined => Value::Undefined,
            }),
            Expr::Ident(name) => self
                .bindings
                .get(name)
                .map(|b| b.value.clone())
                .ok_or_else(|| ScriptError::runtime(expr.span.clone(), format!("{} is not defined", name))),
            Expr::Unary { op, operand } => {
                let v = self.eval(operand)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Number(-v.to_number()),
                    UnaryOp::Plus => Value::Number(v.to_number()),
                    UnaryOp::Not => Value::Bool(!v.truthy()),
                })
            }
            Expr::Binary { op, lhs, rhs } => self.binary(*op, lhs, rhs),
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Member { target, name } => {
                let v = self.eval(target)?;
                match (&v, name.node.as_str()) {
                    (Value::Str(s), "length") => Ok(Value::Number(s.chars().count() as f64)),
                    _ => Err(ScriptError::runtime(
                        name.span.clone(),
                        format!("Cannot read property '{}' of {}", name.node, v.type_name()),
                    )),
                }
            }
            Expr::Call { callee, args } => self.call(callee, args, &expr.span),
        }
    }

    fn binary(
        &mut self,
        op: BinaryOp,
        lhs: &Spanned<Expr>,
        rhs: &Spanned<Expr>,
    ) -> Result<Value, ScriptError> {
        let left = self.eval(lhs)?;
        // Logical operators short-circuit and yield an operand, not a boolean
        match op {
            BinaryOp::And if !left.truthy() => return Ok(left),
            BinaryOp::Or if left.truthy() => return Ok(left),
            BinaryOp::And | BinaryOp::Or => return self.eval(rhs),
            _ => {}
        }
        let right = self.eval(rhs)?;
        if op == BinaryOp::Add {
            return self.add(left, right);
        }
        Ok(match op {
            BinaryOp::Sub => Value::Number(left.to_number() - right.to_number()),
            BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
            BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
            BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
            BinaryOp::Less => Value::Bool(compare(&left, &right, |o| o.is_lt())),
            BinaryOp::LessOrEqual => Value::Bool(compare(&left, &right, |o| o.is_le())),
            BinaryOp::Greater => Value::Bool(compare(&left, &right, |o| o.is_gt())),
            BinaryOp::GreaterOrEqual => Value::Bool(compare(&left, &right, |o| o.is_ge())),
            BinaryOp::StrictEq => Value::Bool(strict_equals(&left, &right)),
            BinaryOp::StrictNotEq => Value::Bool(!strict_equals(&left, &right)),
            BinaryOp::Eq => Value::Bool(loose_equals(&left, &right)),
            BinaryOp::NotEq => Value::Bool(!loose_equals(&left, &right)),
            BinaryOp::Add | BinaryOp::And | BinaryOp::Or => right,
        })
    }

    fn add(&self, left: Value, right: Value) -> Result<Value, ScriptError> {
        match (&left, &right) {
            (Value::Str(_), _) | (_, Value::Str(_)) => self.string(format!("{}{}", left, right)),
            _ => Ok(Value::Number(left.to_number() + right.to_number())),
        }
    }

    fn call(
        &mut self,
        callee: &Spanned<Expr>,
        args: &[Spanned<Expr>],
        span: &Span,
    ) -> Result<Value, ScriptError> {
        match &callee.node {
            // `Math` is a namespace unless the script shadows it
            Expr::Member { target, name }
                if matches!(&target.node, Expr::Ident(ns) if ns == "Math")
                    && !self.bindings.contains_key("Math") =>
            {
                let values = self.eval_args(args)?;
                math(&name.node, &values)
                    .ok_or_else(|| ScriptError::runtime(name.span.clone(), format!("Math.{} is not a function", name.node)))
            }
            Expr::Member { target, name } => {
                let receiver = self.eval(target)?;
                let values = self.eval_args(args)?;
                let result = method(&receiver, &name.node, &values).ok_or_else(|| {
                    ScriptError::runtime(
                        name.span.clone(),
                        format!("{}.{} is not a function", receiver.type_name(), name.node),
                    )
                })?;
                match result {
                    Value::Str(s) => self.string(s),
                    other => Ok(other),
                }
            }
            Expr::Ident(name) if !self.bindings.contains_key(name) => {
                let values = self.eval_args(args)?;
                global(name, &values).ok_or_else(|| {
                    ScriptError::runtime(callee.span.clone(), format!("{} is not defined", name))
                })
            }
            _ => Err(ScriptError::runtime(span.clone(), "expression is not a function")),
        }
    }

    fn eval_args(&mut self, args: &[Spanned<Expr>]) -> Result<Vec<Value>, ScriptError> {
        args.iter().map(|a| self.eval(a)).collect()
    }
}

fn compare(left: &Value, right: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => test(a.cmp(b)),
        _ => left
            .to_number()
            .partial_cmp(&right.to_number())
            .is_some_and(test),
    }
}

fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        _ => left == right,
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null | Value::Undefined, Value::Null | Value::Undefined) => true,
        (Value::Null | Value::Undefined, _) | (_, Value::Null | Value::Undefined) => false,
        (Value::Str(a), Value::Str(b)) => a == b,
        _ => left.to_number() == right.to_number(),
    }
}

fn arg(values: &[Value], index: usize) -> Value {
    values.get(index).cloned().unwrap_or(Value::Undefined)
}

fn math(name: &str, values: &[Value]) -> Option<Value> {
    let n = |i: usize| arg(values, i).to_number();
    let result = match name {
        "floor" => n(0).floor(),
        "ceil" => n(0).ceil(),
        "round" => (n(0) + 0.5).floor(),
        "abs" => n(0).abs(),
        "sqrt" => n(0).sqrt(),
        "pow" => n(0).powf(n(1)),
        "min" => values
            .iter()
            .map(Value::to_number)
            .fold(f64::INFINITY, |acc, v| if v.is_nan() || acc.is_nan() { f64::NAN } else { acc.min(v) }),
        "max" => values
            .iter()
            .map(Value::to_number)
            .fold(f64::NEG_INFINITY, |acc, v| if v.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(v) }),
        _ => return None,
    };
    Some(Value::Number(result))
}

fn global(name: &str, values: &[Value]) -> Option<Value> {
    let first = arg(values, 0);
    Some(match name {
        "String" => Value::Str(first.to_string()),
        "Number" => Value::Number(first.to_number()),
        "isNaN" => Value::Bool(first.to_number().is_nan()),
        "parseFloat" => Value::Number(parse_float(&first.to_string())),
        "parseInt" => {
            // A missing, zero or non-numeric radix means "detect"
            let radix = values
                .get(1)
                .map(Value::to_number)
                .filter(|r| r.is_finite())
                .map_or(0, |r| r.trunc() as i64);
            Value::Number(parse_int(&first.to_string(), radix))
        }
        _ => return None,
    })
}

fn method(receiver: &Value, name: &str, values: &[Value]) -> Option<Value> {
    match (receiver, name) {
        (Value::Str(s), "toUpperCase") => Some(Value::Str(s.to_uppercase())),
        (Value::Str(s), "toLowerCase") => Some(Value::Str(s.to_lowercase())),
        (Value::Str(s), "trim") => Some(Value::Str(s.trim().to_string())),
        (Value::Str(s), "concat") => {
            let mut out = s.clone();
            for v in values {
                out.push_str(&v.to_string());
            }
            Some(Value::Str(out))
        }
        (Value::Str(s), "indexOf") => {
            let needle = arg(values, 0).to_string();
            Some(Value::Number(match s.find(&needle) {
                Some(byte) => s[..byte].chars().count() as f64,
                None => -1.0,
            }))
        }
        (Value::Str(s), "includes") => Some(Value::Bool(s.contains(&arg(values, 0).to_string()))),
        (Value::Str(s), "startsWith") => {
            Some(Value::Bool(s.starts_with(&arg(values, 0).to_string())))
        }
        (Value::Str(s), "endsWith") => Some(Value::Bool(s.ends_with(&arg(values, 0).to_string()))),
        (Value::Str(s), "replace") => {
            let from = arg(values, 0).to_string();
            let to = arg(values, 1).to_string();
            Some(Value::Str(s.replacen(&from, &to, 1)))
        }
        (Value::Str(s), "substring") => {
            let chars: Vec<char> = s.chars().collect();
            let clamp = |v: Value, default: usize| match v {
                Value::Undefined => default,
                other => {
                    let n = other.to_number();
                    if n.is_nan() || n < 0.0 {
                        0
                    } else {
                        (n as usize).min(chars.len())
                    }
                }
            };
            let start = clamp(arg(values, 0), 0);
            let end = clamp(arg(values, 1), chars.len());
            let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
            Some(Value::Str(chars[lo..hi].iter().collect()))
        }
        (Value::Number(n), "toFixed") => {
            let digits = arg(values, 0).to_number();
            let digits = if digits.is_nan() { 0 } else { digits.clamp(0.0, 20.0) as usize };
            Some(Value::Str(format!("{:.*}", digits, n)))
        }
        (_, "toString") => Some(Value::Str(receiver.to_string())),
        _ => None,
    }
}

fn parse_int(text: &str, radix: i64) -> f64 {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let hex = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X"));
    let (radix, digits) = match (radix, hex) {
        (0 | 16, Some(hex)) => (16, hex),
        (0, None) => (10, rest),
        (r @ 2..=36, _) => (r as u32, rest),
        _ => return f64::NAN,
    };
    let mut result: Option<f64> = None;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => result = Some(result.unwrap_or(0.0) * radix as f64 + d as f64),
            None => break,
        }
    }
    result.map_or(f64::NAN, |v| sign * v)
}

fn parse_float(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let candidate: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .collect();
    // Longest prefix that is a valid number
    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::grammar::parse;
    use pretty_assertions::assert_eq;

    fn run(source: &str) -> Result<ScriptVariables, ScriptError> {
        let limits = ScriptLimits::default();
        Interpreter::new(&limits).run(&parse(source).expect("Should parse"))
    }

    fn var(vars: &ScriptVariables, name: &str) -> Option<String> {
        vars.get(name).cloned().flatten()
    }

    #[test]
    fn test_arithmetic_and_number_formatting() {
        let vars = run("var ms = 5 * 1000; var half = 7 / 2; var neg = -(3 - 10) % 4;").unwrap();
        assert_eq!(var(&vars, "ms").as_deref(), Some("5000"));
        assert_eq!(var(&vars, "half").as_deref(), Some("3.5"));
        assert_eq!(var(&vars, "neg").as_deref(), Some("3"));
    }

    #[test]
    fn test_string_concatenation_coerces() {
        let vars = run("var q = 'select * from ' + 'S' + ' limit ' + 10;").unwrap();
        assert_eq!(var(&vars, "q").as_deref(), Some("select * from S limit 10"));
    }

    #[test]
    fn test_numeric_strings_multiply() {
        let vars = run("var t = '60' * 1000; var bad = 'abc' * 2;").unwrap();
        assert_eq!(var(&vars, "t").as_deref(), Some("60000"));
        assert_eq!(var(&vars, "bad").as_deref(), Some("NaN"));
    }

    #[test]
    fn test_null_bindings_are_present_without_value() {
        let vars = run("var a = null; var b; let c = undefined;").unwrap();
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get("a"), Some(&None));
        assert_eq!(vars.get("b"), Some(&None));
        assert_eq!(vars.get("c"), Some(&None));
    }

    #[test]
    fn test_assignment_and_compound_assignment() {
        let vars = run("var n = 1; n += 2; n *= 10; s = 'a'; s += 'b';").unwrap();
        assert_eq!(var(&vars, "n").as_deref(), Some("30"));
        assert_eq!(var(&vars, "s").as_deref(), Some("ab"));
    }

    #[test]
    fn test_logic_and_ternary() {
        let vars = run(
            "var level = 7; var label = level > 5 ? 'high' : 'low'; \
             var fallback = '' || 'default'; var both = 1 && 'yes'; var eq = '5' == 5; var seq = '5' === 5;",
        )
        .unwrap();
        assert_eq!(var(&vars, "label").as_deref(), Some("high"));
        assert_eq!(var(&vars, "fallback").as_deref(), Some("default"));
        assert_eq!(var(&vars, "both").as_deref(), Some("yes"));
        assert_eq!(var(&vars, "eq").as_deref(), Some("true"));
        assert_eq!(var(&vars, "seq").as_deref(), Some("false"));
    }

    #[test]
    fn test_builtins() {
        let vars = run(
            "var a = Math.round(2.5); var b = Math.max(3, 9, 4); var c = parseInt('42px'); \
             var d = parseFloat('3.25kg'); var e = ' Mixed '.trim().toLowerCase(); \
             var f = 'stream'.length; var g = (1.005).toFixed(1); var h = 'abcdef'.substring(4, 1);",
        )
        .unwrap();
        assert_eq!(var(&vars, "a").as_deref(), Some("3"));
        assert_eq!(var(&vars, "b").as_deref(), Some("9"));
        assert_eq!(var(&vars, "c").as_deref(), Some("42"));
        assert_eq!(var(&vars, "d").as_deref(), Some("3.25"));
        assert_eq!(var(&vars, "e").as_deref(), Some("mixed"));
        assert_eq!(var(&vars, "f").as_deref(), Some("6"));
        assert_eq!(var(&vars, "g").as_deref(), Some("1.0"));
        assert_eq!(var(&vars, "h").as_deref(), Some("bcd"));
    }

    #[test]
    fn test_undefined_variable_is_runtime_error() {
        let err = run("var x = y + 1;").unwrap_err();
        assert_eq!(
            err,
            ScriptError::Runtime {
                span: 8..9,
                message: "y is not defined".to_string()
            }
        );
    }

    #[test]
    fn test_const_cannot_be_reassigned() {
        assert!(matches!(
            run("const k = 1; k = 2;"),
            Err(ScriptError::Runtime { message, .. }) if message.contains("constant")
        ));
        assert!(matches!(
            run("let k = 1; let k = 2;"),
            Err(ScriptError::Runtime { message, .. }) if message.contains("already been declared")
        ));
        assert!(run("var k = 1; var k = 2;").is_ok());
    }

    #[test]
    fn test_unknown_functions_are_rejected() {
        assert!(run("var x = eval('1');").is_err());
        assert!(run("var x = Math.random();").is_err());
        assert!(run("var x = 'a'.repeat(3);").is_err());
        assert!(run("var x = (1)(2);").is_err());
    }

    #[test]
    fn test_step_limit() {
        let limits = ScriptLimits {
            max_steps: 3,
            ..ScriptLimits::default()
        };
        let script = parse("var a = 1 + 2 + 3;").unwrap();
        assert_eq!(
            Interpreter::new(&limits).run(&script).unwrap_err(),
            ScriptError::LimitExceeded {
                limit: "step",
                max: 3
            }
        );
    }

    #[test]
    fn test_string_limit() {
        let limits = ScriptLimits {
            max_string_bytes: 8,
            ..ScriptLimits::default()
        };
        let script = parse("var s = 'abcd'; s = s + s; s = s + s;").unwrap();
        assert!(matches!(
            Interpreter::new(&limits).run(&script),
            Err(ScriptError::LimitExceeded { limit: "string size", .. })
        ));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5000.0), "5000");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e22), "1.5e+22");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e-8), "-2.5e-8");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_depth_limit_while_evaluating() {
        let limits = ScriptLimits {
            max_depth: 3,
            ..ScriptLimits::default()
        };
        let script = parse("var a = -(-(-(-1)));").unwrap();
        assert_eq!(
            Interpreter::new(&limits).run(&script).unwrap_err(),
            ScriptError::LimitExceeded {
                limit: "depth",
                max: 3
            }
        );

        // Depth unwinds between statements
        let script = parse("var a = -1; var b = -a; var c = -b;").unwrap();
        let vars = Interpreter::new(&limits).run(&script).unwrap();
        assert_eq!(vars["c"].as_deref(), Some("-1"));
    }

    #[test]
    fn test_radix_prefixes_and_parse_int_radix() {
        let vars = run(
            "var hex = '0x10' * 1; var bin = Number('0b101'); var bad = Number('0xZZ'); \
             var inf = Number('-Infinity'); var p0 = parseInt('42', 0); var p16 = parseInt('0x1f'); \
             var pr = parseInt('ff', 16); var p1 = parseInt('7', 1); var p36 = parseInt('z', 36);",
        )
        .unwrap();
        assert_eq!(var(&vars, "hex").as_deref(), Some("16"));
        assert_eq!(var(&vars, "bin").as_deref(), Some("5"));
        assert_eq!(var(&vars, "bad").as_deref(), Some("NaN"));
        assert_eq!(var(&vars, "inf").as_deref(), Some("-Infinity"));
        assert_eq!(var(&vars, "p0").as_deref(), Some("42"));
        assert_eq!(var(&vars, "p16").as_deref(), Some("31"));
        assert_eq!(var(&vars, "pr").as_deref(), Some("255"));
        assert_eq!(var(&vars, "p1").as_deref(), Some("NaN"));
        assert_eq!(var(&vars, "p36").as_deref(), Some("35"));
    }
}
