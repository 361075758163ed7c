//! Program root and statements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::Expression;

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    /// An expression evaluated for its value: `1 + 2`.
    Expression(Expression),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Expression(expr) => write!(f, "{expr}"),
        }
    }
}

/// Root of a parsed compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Program {
    /// Create a program from statements.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Program holding a single expression statement.
    pub fn from_expression(expr: Expression) -> Self {
        Self::new(vec![Statement::Expression(expr)])
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
