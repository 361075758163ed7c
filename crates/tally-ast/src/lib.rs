// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Syntax tree for the tally expression language
//!
//! The lexer and parser live outside this workspace; this crate only defines
//! the tree they hand over to the bytecode compiler. Every node renders back
//! to a parenthesized, source-like form through `Display`, which is what
//! compiler diagnostics quote when a node is rejected.

pub mod expr;
pub mod program;

pub use expr::{Expression, InfixOperator, PrefixOperator};
pub use program::{Program, Statement};
