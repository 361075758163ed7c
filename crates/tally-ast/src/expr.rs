//! Expression nodes.

use std::{fmt, mem};

use serde::{Deserialize, Serialize};

/// Operators that appear between two operands: `a + b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfixOperator {
    /// Addition: `a + b`.
    Plus,
    /// Subtraction: `a - b`.
    Minus,
    /// Multiplication: `a * b`.
    Asterisk,
    /// Division: `a / b`.
    Slash,
    /// Less than: `a < b`.
    Lt,
    /// Greater than: `a > b`.
    Gt,
    /// Equality: `a == b`.
    Eq,
    /// Inequality: `a != b`.
    NotEq,
}

impl InfixOperator {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operators that precede a single operand: `-a`, `!a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrefixOperator {
    /// Logical negation: `!a`.
    Bang,
    /// Arithmetic negation: `-a`.
    Minus,
}

impl PrefixOperator {
    /// Source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An expression node.
///
/// The tree is owned: child expressions are boxed, so a parser can build it
/// bottom-up and hand the root over by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression {
    /// Integer literal: `42`.
    IntegerLiteral(i64),
    /// Boolean literal: `true`, `false`.
    Boolean(bool),
    /// Name reference: `x`.
    Identifier(String),
    /// Prefix operation: `-a`.
    Prefix {
        /// The operator to apply.
        operator: PrefixOperator,
        /// The operand.
        right: Box<Expression>,
    },
    /// Infix operation: `a + b`.
    Infix {
        /// The left operand.
        left: Box<Expression>,
        /// The operator to apply.
        operator: InfixOperator,
        /// The right operand.
        right: Box<Expression>,
    },
}

impl Expression {
    /// Integer literal node.
    pub fn integer(value: i64) -> Self {
        Expression::IntegerLiteral(value)
    }

    /// Boolean literal node.
    pub fn boolean(value: bool) -> Self {
        Expression::Boolean(value)
    }

    /// Identifier node.
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    /// Prefix node.
    pub fn prefix(operator: PrefixOperator, right: Expression) -> Self {
        Expression::Prefix {
            operator,
            right: Box::new(right),
        }
    }

    /// Infix node.
    pub fn infix(left: Expression, operator: InfixOperator, right: Expression) -> Self {
        Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// `left + right`.
    pub fn add(left: Expression, right: Expression) -> Self {
        Self::infix(left, InfixOperator::Plus, right)
    }

    /// Left-associated sum of integer literals: `((a + b) + c)`.
    ///
    /// Returns `None` for an empty slice.
    pub fn sum_of(values: &[i64]) -> Option<Self> {
        let (first, rest) = values.split_first()?;
        Some(
            rest.iter()
                .fold(Self::integer(*first), |acc, v| Self::add(acc, Self::integer(*v))),
        )
    }

    /// Short name of the node kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::IntegerLiteral(_) => "integer literal",
            Expression::Boolean(_) => "boolean literal",
            Expression::Identifier(_) => "identifier",
            Expression::Prefix { .. } => "prefix expression",
            Expression::Infix { .. } => "infix expression",
        }
    }
}

/// Tears the tree down on the heap so deep chains do not exhaust the stack.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut child) = pending.pop() {
            detach_children(&mut child, &mut pending);
        }
    }
}

fn detach_children(expr: &mut Expression, pending: &mut Vec<Box<Expression>>) {
    match expr {
        Expression::Prefix { right, .. } => pending.push(take(right)),
        Expression::Infix { left, right, .. } => {
            pending.push(take(left));
            pending.push(take(right));
        }
        Expression::IntegerLiteral(_) | Expression::Boolean(_) | Expression::Identifier(_) => {}
    }
}

fn take(child: &mut Box<Expression>) -> Box<Expression> {
    mem::replace(child, Box::new(Expression::Boolean(false)))
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::IntegerLiteral(v) => write!(f, "{v}"),
            Expression::Boolean(v) => write!(f, "{v}"),
            Expression::Identifier(name) => f.write_str(name),
            Expression::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({left} {operator} {right})"),
        }
    }
}
