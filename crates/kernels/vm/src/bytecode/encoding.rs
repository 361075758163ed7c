//! Byte-level instruction encoding.
//!
//! An instruction is one opcode byte followed by its operands. Each operand is
//! written big-endian using the width its [`Definition`] declares for that
//! position. Operand values travel as `usize` on both sides of the codec.

use super::opcode::{Definition, Opcode};
use crate::error::{DecodeError, EncodeError};

/// Encode a single instruction.
///
/// # Errors
///
/// - [`EncodeError::OperandArityMismatch`] if `operands.len()` differs from the
///   definition's operand count
/// - [`EncodeError::OperandOverflow`] if a value does not fit its width
pub fn make(opcode: Opcode, operands: &[usize]) -> Result<Vec<u8>, EncodeError> {
    let definition = opcode.definition();
    if operands.len() != definition.operand_count() {
        return Err(EncodeError::OperandArityMismatch {
            opcode,
            expected: definition.operand_count(),
            found: operands.len(),
        });
    }

    let mut instruction = Vec::with_capacity(definition.instruction_len());
    instruction.push(opcode.byte());
    for (position, (&value, &width)) in operands
        .iter()
        .zip(definition.operand_widths)
        .enumerate()
    {
        if !fits(value, width) {
            return Err(EncodeError::OperandOverflow {
                opcode,
                position,
                value,
                width,
            });
        }
        for shift in (0..width).rev() {
            instruction.push(byte_at(value, shift));
        }
    }
    Ok(instruction)
}

/// Read the operands of one instruction.
///
/// `bytes` starts immediately after the opcode byte and may extend past the
/// instruction. Returns the operand values and the number of bytes consumed,
/// which always equals [`Definition::operand_bytes`].
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedOperand`] if `bytes` ends inside an operand.
pub fn read_operands(
    definition: &Definition,
    bytes: &[u8],
) -> Result<(Vec<usize>, usize), DecodeError> {
    let mut operands = Vec::with_capacity(definition.operand_count());
    let mut offset = 0;

    for (position, &width) in definition.operand_widths.iter().enumerate() {
        let field = bytes
            .get(offset..offset + width)
            .ok_or(DecodeError::TruncatedOperand {
                name: definition.name,
                position,
                width,
                available: bytes.len().saturating_sub(offset),
            })?;
        let value = match width {
            2 => usize::from(read_u16(field)),
            _ => field
                .iter()
                .fold(0usize, |acc, &byte| (acc << 8) | usize::from(byte)),
        };
        operands.push(value);
        offset += width;
    }

    Ok((operands, offset))
}

/// Read a big-endian `u16` from the first two bytes of `bytes`.
///
/// # Panics
///
/// Panics if `bytes` is shorter than two bytes; callers bound-check first.
pub fn read_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

fn fits(value: usize, width: usize) -> bool {
    width >= std::mem::size_of::<usize>() || value >> (8 * width) == 0
}

fn byte_at(value: usize, shift: usize) -> u8 {
    if shift >= std::mem::size_of::<usize>() {
        0
    } else {
        (value >> (8 * shift)) as u8
    }
}
