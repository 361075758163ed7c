//! Tally Foundation
//!
//! Runtime value model shared by the compiler (constant pools) and the
//! virtual machine (operand stack).

pub mod value;

pub use value::Value;
