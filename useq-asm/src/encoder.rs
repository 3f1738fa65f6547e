//! Pass 1: walks the source line by line, allocating ROM bytes at the
//! current program counter and recording opcode bytes, immediately-known
//! operand bits, and any deferred label/symbol reference.

use crate::error::AssembleError;
use crate::format::Format;
use crate::mnemonics::{Exec1Mnemonic, Exec2Mnemonic, InstructionDescriptor};
use crate::numeric::{parse_dec, parse_hex};
use crate::parser::{LineParser, Rule};
use crate::rom::{Half, Mode, PendingRef, RomImage};
use crate::symbols::SymbolTable;
use crate::variant;
use matches::debug_assert_matches;
use pest::iterators::Pair;
use pest::Parser;
use std::str::FromStr;

pub struct Encoder {
    pub pc: u32,
    pub mode: Mode,
    pub rom: RomImage,
    pub symbols: SymbolTable,
}

impl Encoder {
    pub fn new() -> Encoder {
        Encoder {
            pc: 0,
            mode: Mode::Exec1,
            rom: RomImage::new(),
            symbols: SymbolTable::new(),
        }
    }

    pub fn process_source(&mut self, source: &str) -> Result<(), AssembleError> {
        for (i, raw_line) in source.lines().enumerate() {
            let line = (i + 1) as u32;
            self.process_line(line, raw_line)?;
        }
        Ok(())
    }

    fn process_line(&mut self, line: u32, raw_line: &str) -> Result<(), AssembleError> {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            return Ok(());
        }

        let pair = LineParser::parse(Rule::line, trimmed)
            .map_err(|_| AssembleError::from_parse_failure(line, trimmed))?
            .next()
            .unwrap();

        let inner = match pair.into_inner().next() {
            Some(inner) => inner,
            None => return Ok(()),
        };

        match inner.as_rule() {
            Rule::directive => self.process_directive(line, inner),
            Rule::label => self.process_label(line, inner),
            Rule::instruction => self.process_instruction(line, inner),
            Rule::EOI => Ok(()),
            _ => unreachable!(),
        }
    }

    fn process_directive(&mut self, line: u32, pair: Pair<Rule>) -> Result<(), AssembleError> {
        debug_assert_matches!(pair.as_rule(), Rule::directive);
        let directive = pair.into_inner().next().unwrap();

        match directive.as_rule() {
            Rule::directive_org => {
                let value = parse_hex(line, directive.into_inner().next().unwrap().as_str())?;
                self.set_pc(value);
            }
            Rule::directive_equ => {
                let mut inner = directive.into_inner();
                let name = inner.next().unwrap().as_str();
                let value = parse_hex(line, inner.next().unwrap().as_str())?;
                self.symbols.define(name, value as u8);
            }
            Rule::directive_align => {
                let value = parse_hex(line, directive.into_inner().next().unwrap().as_str())?;
                if value == 0 {
                    return Err(AssembleError::InvalidAlignment { line });
                }
                while self.pc % value != 0 {
                    self.pc = (self.pc + 1) % variant::ROM_SIZE;
                }
            }
            Rule::directive_db => {
                let value = parse_hex(line, directive.into_inner().next().unwrap().as_str())?;
                if value > 0xFF {
                    return Err(AssembleError::OperandOutOfRange {
                        line,
                        detail: format!(".DB value 0x{:X} does not fit in a byte", value),
                    });
                }
                self.claim_slot(line, self.pc)?;
                self.rom.slot_mut(self.pc).byte = value as u8;
                self.advance_pc(line, 1);
            }
            // spec.md §6's grammar scopes `.MODE` to "(256-byte variant
            // only)"; the extended variant has no EXEC2 table to switch
            // into, so the directive itself is rejected there rather than
            // silently accepted and left without effect.
            #[cfg(feature = "variant-256")]
            Rule::directive_mode => {
                let text = directive.into_inner().next().unwrap().as_str();
                let value = parse_dec(line, text)?;
                self.mode = match value {
                    1 => Mode::Exec1,
                    2 => Mode::Exec2,
                    _ => {
                        return Err(AssembleError::InvalidMode {
                            line,
                            value: text.to_owned(),
                        })
                    }
                };
            }
            #[cfg(feature = "variant-4096")]
            Rule::directive_mode => {
                return Err(AssembleError::MalformedDirective {
                    line,
                    detail: ".MODE is only supported in the 256-byte variant".to_owned(),
                });
            }
            _ => unreachable!(),
        }
        Ok(())
    }

    fn process_label(&mut self, _line: u32, pair: Pair<Rule>) -> Result<(), AssembleError> {
        debug_assert_matches!(pair.as_rule(), Rule::label);
        let name = pair.into_inner().next().unwrap().as_str();
        self.rom.slot_mut(self.pc).label = Some(name.to_owned());
        Ok(())
    }

    fn process_instruction(&mut self, line: u32, pair: Pair<Rule>) -> Result<(), AssembleError> {
        debug_assert_matches!(pair.as_rule(), Rule::instruction);
        let mut inner = pair.into_inner();
        let mnemonic = inner.next().unwrap().as_str();
        let operands: Vec<&str> = inner
            .next()
            .map(|list| list.into_inner().map(|p| p.as_str()).collect())
            .unwrap_or_default();

        let descriptor = self.lookup(line, mnemonic)?;
        let mode = self.mode;

        self.claim_slot(line, self.pc)?;
        self.rom.slot_mut(self.pc).byte = descriptor.opcode;
        self.rom.slot_mut(self.pc).mode = mode;

        self.encode_operands(line, descriptor.format, &operands)?;
        self.advance_pc(line, descriptor.format.encoded_bytes());
        Ok(())
    }

    fn lookup(&self, line: u32, mnemonic: &str) -> Result<InstructionDescriptor, AssembleError> {
        let not_found = || AssembleError::MalformedInstruction {
            line,
            mnemonic: mnemonic.to_owned(),
        };
        match self.mode {
            Mode::Exec1 => Exec1Mnemonic::from_str(mnemonic)
                .map(Exec1Mnemonic::describe)
                .map_err(|_| not_found()),
            Mode::Exec2 => Exec2Mnemonic::from_str(mnemonic)
                .map(Exec2Mnemonic::describe)
                .map_err(|_| not_found()),
        }
    }

    fn encode_operands(
        &mut self,
        line: u32,
        format: Format,
        operands: &[&str],
    ) -> Result<(), AssembleError> {
        if !format.has_operand() {
            if !operands.is_empty() {
                return Err(AssembleError::MalformedInstruction {
                    line,
                    mnemonic: format!("unexpected operand for no-operand instruction"),
                });
            }
            return Ok(());
        }

        match format {
            Format::R => self.encode_nibble_field(line, format, operands, 16),
            Format::Jmp | Format::Jnz | Format::Jsr => {
                self.encode_jump(line, format, operands)
            }
            Format::Sb => self.encode_sb(line, operands),
            Format::Imm => self.encode_byte_field(line, format, operands, self.pc + 1),
            Format::Imm12 => self.encode_imm12(line, operands),
            Format::Imms => self.encode_imms(line, operands),
            Format::Rs => self.encode_rs(line, operands),
            Format::R2 => self.encode_r2(line, operands),
            Format::Ri => self.encode_ri(line, operands),
            Format::I => self.encode_byte_field(line, format, operands, self.pc + 1),
            Format::Full | Format::No => unreachable!(),
        }
    }

    fn one_operand<'a>(&self, line: u32, operands: &[&'a str]) -> Result<&'a str, AssembleError> {
        operands.first().copied().ok_or_else(|| AssembleError::MalformedInstruction {
            line,
            mnemonic: "missing operand".to_owned(),
        })
    }

    /// `R` format: a 4-bit immediate/label nibble OR'd into the opcode's
    /// low nibble.
    fn encode_nibble_field(
        &mut self,
        line: u32,
        format: Format,
        operands: &[&str],
        radix: u32,
    ) -> Result<(), AssembleError> {
        let token = self.one_operand(line, operands)?;
        match classify(token, radix) {
            Operand::Known(value) => {
                if value > 0xF {
                    return Err(AssembleError::OperandOutOfRange {
                        line,
                        detail: format!("0x{:X} does not fit in 4 bits", value),
                    });
                }
                self.rom.slot_mut(self.pc).byte |= (value & 0xF) as u8;
            }
            Operand::Deferred { target, half } => {
                self.defer(line, format, target, half);
            }
        }
        Ok(())
    }

    /// `Imm`/`I` format and the second byte of `Ri`: a full byte written
    /// at `address`, known now or deferred on the opcode slot.
    fn encode_byte_field(
        &mut self,
        line: u32,
        format: Format,
        operands: &[&str],
        address: u32,
    ) -> Result<(), AssembleError> {
        let token = self.one_operand(line, operands)?;
        self.claim_slot(line, address)?;
        match classify(token, 16) {
            Operand::Known(value) => {
                if value > 0xFF {
                    return Err(AssembleError::OperandOutOfRange {
                        line,
                        detail: format!("0x{:X} does not fit in a byte", value),
                    });
                }
                self.rom.slot_mut(address).byte = value as u8;
            }
            Operand::Deferred { target, half } => {
                self.defer(line, format, target, half);
            }
        }
        Ok(())
    }

    fn encode_imm12(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        let token = self.one_operand(line, operands)?;
        self.claim_slot(line, self.pc + 1)?;
        match classify(token, 16) {
            Operand::Known(value) => {
                if value > 0xFFF {
                    return Err(AssembleError::OperandOutOfRange {
                        line,
                        detail: format!("0x{:X} does not fit in 12 bits", value),
                    });
                }
                self.rom.slot_mut(self.pc).byte |= ((value >> 8) & 0xF) as u8;
                self.rom.slot_mut(self.pc + 1).byte = (value & 0xFF) as u8;
            }
            Operand::Deferred { target, half } => {
                self.defer(line, Format::Imm12, target, half);
            }
        }
        Ok(())
    }

    fn encode_imms(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        let token = self.one_operand(line, operands)?;
        self.claim_slot(line, self.pc + 1)?;
        match classify(token, 16) {
            Operand::Known(value) => {
                if value & 0xF != 0 {
                    return Err(AssembleError::OperandOutOfRange {
                        line,
                        detail: format!("0x{:X} is not 16-byte aligned", value),
                    });
                }
                self.rom.slot_mut(self.pc + 1).byte = ((value >> 4) & 0xFF) as u8;
            }
            Operand::Deferred { target, half } => {
                self.defer(line, Format::Imms, target, half);
            }
        }
        Ok(())
    }

    fn encode_sb(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        if operands.len() != 2 {
            return Err(AssembleError::MalformedInstruction {
                line,
                mnemonic: "expected 's, b' operands".to_owned(),
            });
        }
        let s = parse_dec(line, operands[0])?;
        let b = parse_dec(line, operands[1])?;
        self.rom.slot_mut(self.pc).byte |= (((s & 0x7) << 1) | (b & 0x1)) as u8;
        Ok(())
    }

    fn encode_rs(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        if operands.len() != 2 {
            return Err(AssembleError::MalformedInstruction {
                line,
                mnemonic: "expected 'r, s' operands".to_owned(),
            });
        }
        let r = self.register_index(line, operands[0])?;
        let s = self.register_index(line, operands[1])?;
        self.rom.slot_mut(self.pc).byte |= (r << 2) | s;
        Ok(())
    }

    fn encode_r2(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        let r = self.register_index(line, self.one_operand(line, operands)?)?;
        self.rom.slot_mut(self.pc).byte |= r;
        Ok(())
    }

    fn encode_ri(&mut self, line: u32, operands: &[&str]) -> Result<(), AssembleError> {
        if operands.len() != 2 {
            return Err(AssembleError::MalformedInstruction {
                line,
                mnemonic: "expected 'r, value' operands".to_owned(),
            });
        }
        let r = self.register_index(line, operands[0])?;
        self.rom.slot_mut(self.pc).byte |= r;
        self.encode_byte_field(line, Format::Ri, &operands[1..], self.pc + 1)
    }

    fn register_index(&self, line: u32, token: &str) -> Result<u8, AssembleError> {
        let value = parse_dec(line, token)?;
        if value > 3 {
            return Err(AssembleError::OperandOutOfRange {
                line,
                detail: format!("register index {} exceeds the 2-bit register file", value),
            });
        }
        Ok(value as u8)
    }

    fn encode_jump(
        &mut self,
        line: u32,
        format: Format,
        operands: &[&str],
    ) -> Result<(), AssembleError> {
        let token = self.one_operand(line, operands)?;
        match classify(token, 16) {
            Operand::Known(value) => self.encode_jump_target(line, format, value),
            Operand::Deferred { target, half } => self.defer(line, format, target, half),
        }
    }

    /// Used by pass 1 for a literal jump target known at encode time; the
    /// resolver (pass 2) calls the shared [`resolve_jump_nibble`] directly
    /// once a deferred target's value is known.
    pub fn encode_jump_target(
        &mut self,
        line: u32,
        format: Format,
        target: u32,
    ) -> Result<(), AssembleError> {
        let nibble = resolve_jump_nibble(self.pc, line, format, target)?;
        self.rom.slot_mut(self.pc).byte |= nibble;
        Ok(())
    }

    fn defer(&mut self, line: u32, format: Format, target: String, half: Half) {
        self.rom.slot_mut(self.pc).pending = Some(PendingRef {
            target,
            half,
            format,
            line,
        });
    }

    fn claim_slot(&mut self, line: u32, address: u32) -> Result<(), AssembleError> {
        let address = address % variant::ROM_SIZE;
        let slot = self.rom.slot_mut(address);
        if let Some(first_line) = slot.origin_line {
            return Err(AssembleError::SlotConflict {
                address,
                first_line,
                second_line: line,
            });
        }
        slot.origin_line = Some(line);
        Ok(())
    }

    fn set_pc(&mut self, value: u32) {
        if value >= variant::ROM_SIZE {
            eprintln!(
                "warning: .ORG 0x{:X} wraps within a {}-byte ROM",
                value,
                variant::ROM_SIZE
            );
        }
        self.pc = value % variant::ROM_SIZE;
    }

    fn advance_pc(&mut self, line: u32, by: u32) {
        let next = self.pc + by;
        if next >= variant::ROM_SIZE {
            eprintln!("warning: line {}: PC wrapped past the end of ROM", line);
        }
        self.pc = next % variant::ROM_SIZE;
    }
}

/// Shared by pass 1 (literal jump target) and the resolver (deferred
/// target, once resolved): `spec.md` §4.2/§4.4's range/alignment rules
/// for the three short-range EXEC1 jump formats. Returns the nibble to
/// OR into the instruction's opcode byte.
pub fn resolve_jump_nibble(
    pc: u32,
    line: u32,
    format: Format,
    target: u32,
) -> Result<u8, AssembleError> {
    let pc = pc as i64;
    let target = target as i64;
    let mnemonic = match format {
        Format::Jmp => "JMP",
        Format::Jnz => "JNZ",
        Format::Jsr => "JSR",
        _ => unreachable!(),
    };
    let out_of_range = |detail: String| AssembleError::JumpOutOfRange {
        line,
        mnemonic: mnemonic.to_owned(),
        target: format!("0x{:X}", target),
        detail,
    };

    let nibble = match format {
        Format::Jmp => {
            if target < pc + 1 || target > pc + 16 {
                return Err(out_of_range("must lie in [PC+1, PC+16]".to_owned()));
            }
            (target - (pc + 1)) & 0xF
        }
        Format::Jnz => {
            if target > pc - 1 || target < pc - 16 {
                return Err(out_of_range("must lie in [PC-16, PC-1]".to_owned()));
            }
            ((pc - 1) - target) & 0xF
        }
        Format::Jsr => {
            if target & 0xF != 0 {
                return Err(out_of_range("must be 16-byte aligned".to_owned()));
            }
            (target >> 4) & 0xF
        }
        _ => unreachable!(),
    };
    Ok(nibble as u8)
}

enum Operand {
    Known(u32),
    Deferred { target: String, half: Half },
}

fn split_half(token: &str) -> (Half, &str) {
    if let Some(rest) = token.strip_prefix('<') {
        (Half::High, rest)
    } else if let Some(rest) = token.strip_prefix('>') {
        (Half::Low, rest)
    } else {
        (Half::None, token)
    }
}

/// A token with a half-selector is always deferred (even if the
/// remainder reads as a number) because the half can only be taken once
/// the full value is known — see SPEC_FULL.md §4.4. A bare token is
/// resolved immediately when it parses in the given radix.
fn classify(token: &str, radix: u32) -> Operand {
    let (half, rest) = split_half(token);
    if half == Half::None {
        if let Ok(value) = u32::from_str_radix(rest, radix) {
            return Operand::Known(value);
        }
    }
    Operand::Deferred {
        target: rest.to_owned(),
        half,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_clr_program() {
        #[cfg(feature = "variant-256")]
        {
            let mut encoder = Encoder::new();
            encoder.process_source("CLR").unwrap();
            assert_eq!(encoder.rom.slot(0).byte, 0xAB);
            assert_eq!(encoder.rom.slot(1).byte, variant::FILL_BYTE);
        }
    }

    #[test]
    fn slot_conflict_reports_both_lines() {
        #[cfg(feature = "variant-256")]
        {
            let mut encoder = Encoder::new();
            let err = encoder
                .process_source(".ORG 5\n.DB AA\n.ORG 5\nLD 0")
                .unwrap_err();
            match err {
                AssembleError::SlotConflict {
                    first_line,
                    second_line,
                    ..
                } => {
                    assert_eq!(first_line, 2);
                    assert_eq!(second_line, 4);
                }
                other => panic!("expected SlotConflict, got {:?}", other),
            }
        }
    }

    #[test]
    fn forward_jmp_encodes_relative_distance() {
        #[cfg(feature = "variant-256")]
        {
            let mut encoder = Encoder::new();
            encoder.process_source(":a\nJMP b\nLD 0\n:b").unwrap();
            assert_eq!(encoder.rom.slot(0).byte, 0x81);
        }
    }

    #[test]
    fn exec2_ldi_two_byte_encoding() {
        #[cfg(feature = "variant-256")]
        {
            let mut encoder = Encoder::new();
            encoder.process_source(".MODE 2\nLDI 1, AB").unwrap();
            assert_eq!(encoder.rom.slot(0).byte, 0x69);
            assert_eq!(encoder.rom.slot(1).byte, 0xAB);
        }
    }
}
