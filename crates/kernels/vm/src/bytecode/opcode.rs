//! Opcode definitions for the tally bytecode VM.
//!
//! An opcode is a single byte. Its [`Definition`] (name and operand widths)
//! lives in the [registry](super::registry) and nowhere else, so the encoder,
//! the decoder, the disassembler and the VM all agree on instruction layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::registry::{definition_for, lookup};
use crate::error::DecodeError;

/// Bytecode operation identifier.
///
/// Discriminants are the wire bytes and must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd)]
#[repr(u8)]
pub enum Opcode {
    /// Pushes the constant pool entry at operand[0] (u16 index).
    ///
    /// # Stack
    /// - [ ] → [Value]
    Constant = 0x00,
    /// Pops the right operand, then the left operand, and pushes their sum.
    ///
    /// # Stack
    /// - [left, right] → [left + right]
    Add = 0x01,
}

impl Opcode {
    /// Every opcode, in byte order.
    pub const ALL: [Opcode; 2] = [Opcode::Constant, Opcode::Add];

    /// The wire byte for this opcode.
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Get the definition for this opcode.
    ///
    /// # Panics
    ///
    /// Panics if the opcode has no registry entry, which is a bug in the registry.
    pub fn definition(self) -> &'static Definition {
        definition_for(self)
    }

    /// Human-readable name (`OpConstant`, `OpAdd`).
    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        lookup(byte).map(|definition| definition.opcode)
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.byte()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout of one instruction kind: its name and ordered operand widths in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// The opcode this definition describes.
    pub opcode: Opcode,
    /// Name used in disassembly.
    pub name: &'static str,
    /// Width in bytes of each operand, in encoding order.
    pub operand_widths: &'static [usize],
}

impl Definition {
    /// Number of operands.
    pub fn operand_count(&self) -> usize {
        self.operand_widths.len()
    }

    /// Total operand bytes following the opcode byte.
    pub fn operand_bytes(&self) -> usize {
        self.operand_widths.iter().sum()
    }

    /// Encoded length of a full instruction, opcode byte included.
    pub fn instruction_len(&self) -> usize {
        1 + self.operand_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions() {
        let constant = Opcode::Constant.definition();
        assert_eq!(constant.name, "OpConstant");
        assert_eq!(constant.operand_widths, &[2]);
        assert_eq!(constant.instruction_len(), 3);

        let add = Opcode::Add.definition();
        assert_eq!(add.name, "OpAdd");
        assert_eq!(add.operand_count(), 0);
        assert_eq!(add.instruction_len(), 1);
    }

    #[test]
    fn test_byte_round_trip() {
        for opcode in Opcode::ALL {
            assert_eq!(Opcode::try_from(opcode.byte()), Ok(opcode));
        }
        assert_eq!(
            Opcode::try_from(0x7f),
            Err(DecodeError::UndefinedOpcode { opcode: 0x7f })
        );
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Opcode::Add.to_string(), "OpAdd");
        assert_eq!(u8::from(Opcode::Add), 1);
    }
}
