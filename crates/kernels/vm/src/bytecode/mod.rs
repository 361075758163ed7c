//! Instruction set for the tally bytecode VM.
//!
//! This module is the only place that knows how an instruction's bytes are
//! laid out. The compiler encodes through it and the VM decodes through it.
//!
//! # Architecture
//!
//! - [`opcode`] - Opcode enum and instruction definitions
//! - [`registry`] - Immutable opcode → definition table
//! - [`encoding`] - Big-endian operand encode/decode
//! - [`instructions`] - Instruction stream, decoding iterator, disassembly
//! - [`program`] - Compiler output ([`Bytecode`])
//!
//! # Wire Format
//!
//! ```text
//! OpConstant  0x00 [u16 index]   push constants[index]
//! OpAdd       0x01               pop r, pop l, push l + r
//! ```
//!
//! Multi-byte operands are big-endian.

pub mod encoding;
pub mod instructions;
pub mod opcode;
pub mod program;
pub mod registry;

pub use encoding::{make, read_operands, read_u16};
pub use instructions::{DecodedInstruction, Instructions};
pub use opcode::{Definition, Opcode};
pub use program::Bytecode;
pub use registry::lookup;
