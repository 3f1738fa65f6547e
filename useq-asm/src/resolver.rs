//! Pass 2: walks the ROM image once, looks up every deferred label or
//! symbol reference, and substitutes the resolved value into the
//! instruction that deferred it (`spec.md` §4.4).

use crate::encoder::resolve_jump_nibble;
use crate::error::AssembleError;
use crate::format::Format;
use crate::rom::{PendingRef, RomImage};
use crate::symbols::SymbolTable;

pub fn resolve(rom: &mut RomImage, symbols: &SymbolTable) -> Result<(), AssembleError> {
    let pending: Vec<(u32, PendingRef)> = rom
        .iter()
        .filter_map(|(pc, slot)| slot.pending.clone().map(|p| (pc, p)))
        .collect();

    for (pc, reference) in pending {
        let raw = lookup(rom, symbols, &reference)?;
        let value = reference.half.apply(raw);
        apply(rom, pc, &reference, value)?;
    }
    Ok(())
}

/// `spec.md` §4.4: "look up the target name in this order: (a) slot
/// labels, (b) symbol table, (c) a trailing hex literal."
fn lookup(
    rom: &RomImage,
    symbols: &SymbolTable,
    reference: &PendingRef,
) -> Result<u32, AssembleError> {
    if let Some(address) = rom.label_address(&reference.target) {
        return Ok(address);
    }
    if let Some(value) = symbols.get(&reference.target) {
        return Ok(value as u32);
    }
    if let Ok(value) = u32::from_str_radix(&reference.target, 16) {
        return Ok(value);
    }
    Err(AssembleError::UnresolvedLabel {
        line: reference.line,
        name: reference.target.clone(),
    })
}

fn apply(
    rom: &mut RomImage,
    pc: u32,
    reference: &PendingRef,
    value: u32,
) -> Result<(), AssembleError> {
    let range_error = |detail: String| AssembleError::OperandOutOfRange {
        line: reference.line,
        detail,
    };

    match reference.format {
        Format::R => {
            if value > 0xF {
                return Err(range_error(format!("0x{:X} does not fit in 4 bits", value)));
            }
            rom.slot_mut(pc).byte |= (value & 0xF) as u8;
        }
        Format::Imm | Format::I | Format::Ri => {
            if value > 0xFF {
                return Err(range_error(format!(
                    "0x{:X} does not fit in a byte",
                    value
                )));
            }
            rom.slot_mut(pc + 1).byte = value as u8;
        }
        Format::Imm12 => {
            if value > 0xFFF {
                return Err(range_error(format!(
                    "0x{:X} does not fit in 12 bits",
                    value
                )));
            }
            rom.slot_mut(pc).byte |= ((value >> 8) & 0xF) as u8;
            rom.slot_mut(pc + 1).byte = (value & 0xFF) as u8;
        }
        Format::Imms => {
            if value & 0xF != 0 {
                return Err(range_error(format!("0x{:X} is not 16-byte aligned", value)));
            }
            rom.slot_mut(pc + 1).byte = ((value >> 4) & 0xFF) as u8;
        }
        Format::Jmp | Format::Jnz | Format::Jsr => {
            let nibble = resolve_jump_nibble(pc, reference.line, reference.format, value)?;
            rom.slot_mut(pc).byte |= nibble;
        }
        Format::Sb | Format::Rs | Format::R2 | Format::Full | Format::No => {
            unreachable!("these formats never accept an operand, so never defer")
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    #[cfg(feature = "variant-256")]
    fn half_selector_resolves_against_symbol() {
        let mut encoder = Encoder::new();
        encoder.process_source(".EQU X 42\nLDIB <X").unwrap();
        resolve(&mut encoder.rom, &encoder.symbols).unwrap();
        // 0x42's high nibble is 4; LDIB is format R (opcode 0xB0).
        assert_eq!(encoder.rom.slot(0).byte, 0xB4);
    }

    #[test]
    #[cfg(feature = "variant-256")]
    fn unresolved_label_is_fatal() {
        let mut encoder = Encoder::new();
        encoder.process_source("LD missing").unwrap();
        let err = resolve(&mut encoder.rom, &encoder.symbols).unwrap_err();
        match err {
            AssembleError::UnresolvedLabel { name, .. } => assert_eq!(name, "missing"),
            other => panic!("expected UnresolvedLabel, got {:?}", other),
        }
    }

    #[test]
    #[cfg(feature = "variant-256")]
    fn trailing_hex_literal_fallback() {
        let mut encoder = Encoder::new();
        encoder.process_source("LDIB <2A").unwrap();
        resolve(&mut encoder.rom, &encoder.symbols).unwrap();
        assert_eq!(encoder.rom.slot(0).byte, 0xB0 | 0x2);
    }
}
