//! Opcode registry: the single source of truth for instruction layout.
//!
//! The table is built once on first use and is read-only afterwards, so it can
//! be shared across threads without synchronization beyond the `OnceLock`.

use std::sync::OnceLock;

use super::opcode::{Definition, Opcode};
use crate::error::DecodeError;

/// Retrieves the list of all registered opcode definitions.
///
/// The list is lazily initialized on the first call.
pub fn definitions() -> &'static [Definition] {
    static DEFINITIONS: OnceLock<Vec<Definition>> = OnceLock::new();
    DEFINITIONS.get_or_init(build_definitions)
}

/// Byte-indexed lookup table over [`definitions`].
fn table() -> &'static [Option<&'static Definition>; 256] {
    static TABLE: OnceLock<[Option<&'static Definition>; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: [Option<&'static Definition>; 256] = [None; 256];
        for definition in definitions() {
            let slot = &mut table[definition.opcode.byte() as usize];
            assert!(
                slot.is_none(),
                "duplicate opcode definition for byte {:#04x}",
                definition.opcode.byte()
            );
            *slot = Some(definition);
        }
        table
    })
}

/// Looks up the definition for a raw opcode byte in O(1) time.
///
/// # Errors
///
/// Returns [`DecodeError::UndefinedOpcode`] if the byte is not registered.
pub fn lookup(byte: u8) -> Result<&'static Definition, DecodeError> {
    table()[byte as usize].ok_or(DecodeError::UndefinedOpcode { opcode: byte })
}

/// Retrieves the definition for a typed opcode in O(1) time.
///
/// # Panics
///
/// Panics if the opcode kind has not been registered.
pub fn definition_for(opcode: Opcode) -> &'static Definition {
    table()[opcode.byte() as usize]
        .unwrap_or_else(|| panic!("missing opcode definition for {:?}", opcode))
}

/// Master list of opcode definitions.
fn build_definitions() -> Vec<Definition> {
    macro_rules! op {
        ($opcode:ident, $name:literal, [$($width:expr),*]) => {
            Definition {
                opcode: Opcode::$opcode,
                name: $name,
                operand_widths: &[$($width),*],
            }
        };
    }

    vec![
        op!(Constant, "OpConstant", [2]),
        op!(Add, "OpAdd", []),
    ]
}
