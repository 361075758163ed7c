//! Compiler output handed to the VM.

use serde::{Deserialize, Serialize};
use tally_foundation::Value;

use super::instructions::Instructions;

/// An instruction stream paired with the constant pool it indexes.
///
/// This is the only interface between the compiler and the VM. The VM never
/// mutates either half.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bytecode {
    /// The encoded instructions.
    pub instructions: Instructions,
    /// Constant pool, referenced by zero-based index.
    pub constants: Vec<Value>,
}

impl Bytecode {
    /// Pair an instruction stream with its constant pool.
    pub fn new(instructions: Instructions, constants: Vec<Value>) -> Self {
        Self {
            instructions,
            constants,
        }
    }

    /// Whether the stream holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Disassembly of the instruction stream.
    pub fn disassemble(&self) -> String {
        self.instructions.to_string()
    }
}
