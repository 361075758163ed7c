//! Tally VM - Stack-based bytecode compiler and virtual machine
//!
//! Compiles arithmetic expression trees to a flat bytecode stream plus a
//! constant pool, and executes that stream on an operand stack.
//!
//! ```text
//! Program ──compile──▶ Bytecode { instructions, constants } ──run──▶ stack_top()
//! ```

pub mod bytecode;
pub mod compiler;
pub mod config;
pub mod error;
pub mod executor;

pub use bytecode::{make, read_operands, read_u16, Bytecode, Definition, Instructions, Opcode};
pub use compiler::{compile_program, Compiler};
pub use config::{VmConfig, STACK_SIZE};
pub use error::{CompileError, ConfigError, DecodeError, EncodeError, ExecutionError};
pub use executor::{execute, Vm};
