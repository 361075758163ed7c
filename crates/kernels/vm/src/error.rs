//! Errors for encoding, decoding, compilation and execution.
//!
//! # Error Categories
//!
//! - **Encoding**: [`EncodeError`] - a caller asked for an instruction the
//!   instruction set cannot represent
//! - **Decoding**: [`DecodeError`] - bytes that are not a well-formed instruction
//! - **Compilation**: [`CompileError`] - input outside the supported language
//!   subset; recoverable at the boundary
//! - **Execution**: [`ExecutionError`] - corrupted or foreign bytecode, or a
//!   compiler/VM contract violation; fatal for the current run
//! - **Configuration**: [`ConfigError`]
//!
//! Nothing in this crate skips or repairs a bad instruction. Once a decode
//! fails the instruction pointer can no longer be trusted, so the error is
//! surfaced and execution stops.

use thiserror::Error;

use crate::bytecode::Opcode;

/// Failure to encode a single instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The number of operand values differs from the opcode's definition.
    #[error("{opcode} expects {expected} operand(s), got {found}")]
    OperandArityMismatch {
        /// The opcode being encoded.
        opcode: Opcode,
        /// Operand count declared by the definition.
        expected: usize,
        /// Operand count supplied by the caller.
        found: usize,
    },

    /// An operand value does not fit in its declared width.
    #[error("operand {position} of {opcode} ({value}) does not fit in {width} byte(s)")]
    OperandOverflow {
        /// The opcode being encoded.
        opcode: Opcode,
        /// Zero-based operand position.
        position: usize,
        /// The offending value.
        value: usize,
        /// Declared width in bytes.
        width: usize,
    },
}

/// Failure to decode an instruction from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The byte is not a registered opcode.
    #[error("opcode {opcode} undefined")]
    UndefinedOpcode {
        /// The unrecognized byte.
        opcode: u8,
    },

    /// The stream ends inside an operand.
    #[error("operand {position} of {name} needs {width} byte(s), {available} available")]
    TruncatedOperand {
        /// Name of the instruction being decoded.
        name: &'static str,
        /// Zero-based operand position.
        position: usize,
        /// Declared width in bytes.
        width: usize,
        /// Bytes left in the stream at that position.
        available: usize,
    },

    /// The requested offset lies past the end of the stream.
    #[error("offset {offset} outside stream of {len} byte(s)")]
    OffsetOutOfRange {
        /// The requested offset.
        offset: usize,
        /// Stream length in bytes.
        len: usize,
    },
}

/// Compilation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The syntax tree contains a node the compiler does not lower yet.
    #[error("unsupported node: {node}")]
    UnsupportedNode {
        /// Source-like rendering of the rejected node.
        node: String,
    },

    /// The constant pool is full; another index would not fit its operand.
    #[error("constant pool overflow: {len} constants already defined")]
    ConstantPoolOverflow {
        /// Pool length when the overflow occurred.
        len: usize,
    },

    /// An instruction could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Bytecode execution error.
///
/// Every variant is fatal: the VM stops at the failing instruction and leaves
/// the operand stack as it was before that instruction began.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// The byte at `offset` is not a registered opcode.
    #[error("opcode {opcode} undefined at offset {offset}")]
    UndefinedOpcode {
        /// The unrecognized byte.
        opcode: u8,
        /// Byte offset of the instruction.
        offset: usize,
    },

    /// The instruction at `offset` runs past the end of the stream.
    #[error("truncated operand at offset {offset}: {source}")]
    TruncatedOperand {
        /// Byte offset of the instruction.
        offset: usize,
        /// Decoder detail.
        source: DecodeError,
    },

    /// A load-constant index points outside the constant pool.
    #[error("constant index {index} out of range (pool holds {len})")]
    ConstantIndexOutOfRange {
        /// The decoded index.
        index: usize,
        /// Constant pool length.
        len: usize,
    },

    /// An operation received a value of the wrong kind.
    #[error("type mismatch: unsupported types for {operation}: {left} and {right}")]
    TypeMismatch {
        /// The operation attempted.
        operation: &'static str,
        /// Kind of the left operand.
        left: &'static str,
        /// Kind of the right operand.
        right: &'static str,
    },

    /// Integer addition overflowed.
    #[error("integer overflow: {left} + {right}")]
    IntegerOverflow {
        /// The left operand.
        left: i64,
        /// The right operand.
        right: i64,
    },

    /// Push on a full operand stack.
    #[error("stack overflow: capacity {capacity} exceeded")]
    StackOverflow {
        /// Configured stack capacity.
        capacity: usize,
    },

    /// Pop from an empty operand stack.
    #[error("stack underflow: tried to pop from empty stack")]
    StackUnderflow,

    /// The instruction pointer left the stream without reaching its end.
    #[error("instruction pointer {offset} outside stream of {len} byte(s)")]
    InstructionPointerOutOfRange {
        /// The instruction pointer.
        offset: usize,
        /// Stream length in bytes.
        len: usize,
    },
}

impl ExecutionError {
    /// Attach the instruction offset to a decoder failure.
    pub fn from_decode(error: DecodeError, offset: usize) -> Self {
        match error {
            DecodeError::UndefinedOpcode { opcode } => Self::UndefinedOpcode { opcode, offset },
            source @ DecodeError::TruncatedOperand { .. } => {
                Self::TruncatedOperand { offset, source }
            }
            DecodeError::OffsetOutOfRange { offset, len } => {
                Self::InstructionPointerOutOfRange { offset, len }
            }
        }
    }
}

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The operand stack must hold at least one value.
    #[error("invalid stack capacity {capacity}: must be > 0")]
    InvalidStackCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}
