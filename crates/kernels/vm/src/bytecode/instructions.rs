//! Instruction stream and disassembly.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::encoding::read_operands;
use super::opcode::Opcode;
use super::registry::lookup;
use crate::error::DecodeError;

/// Densely packed instruction bytes.
///
/// A stream built by the compiler is always a concatenation of complete
/// instructions. Streams built from raw bytes may not be; every decode is
/// therefore checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instructions(Vec<u8>);

/// One instruction decoded from a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Byte offset of the opcode within the stream.
    pub offset: usize,
    /// The decoded opcode.
    pub opcode: Opcode,
    /// Operand values, one per declared width.
    pub operands: Vec<usize>,
    /// Encoded length, opcode byte included.
    pub len: usize,
}

impl Instructions {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes in the stream.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the stream holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Append one encoded instruction, returning the offset it starts at.
    pub fn push(&mut self, instruction: &[u8]) -> usize {
        let offset = self.0.len();
        self.0.extend_from_slice(instruction);
        offset
    }

    /// Decode the instruction starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UndefinedOpcode`] if the byte at `offset` is not registered
    /// - [`DecodeError::TruncatedOperand`] if the stream ends inside an operand
    /// - [`DecodeError::OffsetOutOfRange`] if `offset` is not inside the stream
    pub fn decode_at(&self, offset: usize) -> Result<DecodedInstruction, DecodeError> {
        let byte = *self.0.get(offset).ok_or(DecodeError::OffsetOutOfRange {
            offset,
            len: self.0.len(),
        })?;
        let definition = lookup(byte)?;
        let (operands, read) = read_operands(definition, &self.0[offset + 1..])?;
        Ok(DecodedInstruction {
            offset,
            opcode: definition.opcode,
            operands,
            len: 1 + read,
        })
    }

    /// Iterate over decoded instructions from offset 0.
    ///
    /// Yields at most one error, after which iteration ends: offsets can no
    /// longer be trusted once a decode fails.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            instructions: self,
            offset: 0,
            failed: false,
        }
    }
}

impl From<Vec<u8>> for Instructions {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl FromIterator<Vec<u8>> for Instructions {
    fn from_iter<T: IntoIterator<Item = Vec<u8>>>(iter: T) -> Self {
        Self(iter.into_iter().flatten().collect())
    }
}

/// Iterator returned by [`Instructions::iter`].
pub struct Iter<'a> {
    instructions: &'a Instructions,
    offset: usize,
    failed: bool,
}

impl Iterator for Iter<'_> {
    type Item = Result<DecodedInstruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.instructions.len() {
            return None;
        }
        match self.instructions.decode_at(self.offset) {
            Ok(decoded) => {
                self.offset += decoded.len;
                Some(Ok(decoded))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl fmt::Display for Instructions {
    /// Disassembly: one `"{offset:04} {name}{operands}"` line per instruction,
    /// ending with an `ERROR:` line if a decode fails.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decoded in self.iter() {
            match decoded {
                Ok(instruction) => writeln!(f, "{instruction}")?,
                Err(err) => writeln!(f, "ERROR: {err}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} {}", self.offset, self.opcode)?;
        match (self.opcode, self.operands.as_slice()) {
            (Opcode::Constant, [index]) => write!(f, " {index}"),
            (Opcode::Add, []) => Ok(()),
            (opcode, operands) => write!(
                f,
                " ERROR: operand len {} does not match defined {}",
                operands.len(),
                opcode.definition().operand_count()
            ),
        }
    }
}
