//! The usage report and ROM listing `spec.md` §4.4 asks the assembler to
//! print after resolution: bytes used/free, the free-slot list once usage
//! crosses 90%, the symbol table, and a per-slot listing of everything the
//! encoder wrote.

use crate::rom::RomImage;
use crate::symbols::SymbolTable;
use std::io::{self, Write};

pub fn write_report<W: Write>(
    writer: &mut W,
    rom: &RomImage,
    symbols: &SymbolTable,
    source_lines: &[String],
) -> io::Result<()> {
    let total = rom.len();
    let used = rom
        .iter()
        .filter(|(_, slot)| slot.origin_line.is_some())
        .count() as u32;
    let free = total - used;

    writeln!(writer, "used {} out of {}", used, total)?;

    if free > 0 {
        let usage_pct = (used as f64 / total as f64) * 100.0;
        if usage_pct > 90.0 {
            writeln!(writer, "free slots:")?;
            for (pc, slot) in rom.iter() {
                if slot.origin_line.is_none() {
                    writeln!(writer, "  0x{:03X}", pc)?;
                }
            }
        }
    }

    writeln!(writer, "symbol table:")?;
    for (name, value) in symbols.iter() {
        writeln!(writer, "  {} = 0x{:02X}", name, value)?;
    }

    writeln!(writer, "listing:")?;
    for (pc, slot) in rom.iter() {
        if let Some(line) = slot.origin_line {
            let snippet = source_lines
                .get((line - 1) as usize)
                .map(|s| s.trim())
                .unwrap_or("");
            writeln!(
                writer,
                "  0x{:03X}  {:02X}  {:<12}  line {:<4}  {}",
                pc,
                slot.byte,
                slot.label.as_deref().unwrap_or(""),
                line,
                snippet
            )?;
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
    fn minimal_program_reports_one_used_slot() {
        let mut encoder = Encoder::new();
        encoder.process_source("CLR").unwrap();

        let mut buf = Vec::new();
        write_report(&mut buf, &encoder.rom, &encoder.symbols, &["CLR".to_owned()]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("used 1 out of 256"));
        assert!(text.contains("line 1"));
        assert!(!text.contains("free slots:"));
    }

    #[test]
    #[cfg(feature = "variant-256")]
    fn high_usage_lists_free_slots() {
        let mut encoder = Encoder::new();
        let mut source = String::new();
        for i in 0..250 {
            source.push_str(&format!(".ORG {:X}\n.DB AA\n", i));
        }
        encoder.process_source(&source).unwrap();

        let lines: Vec<String> = source.lines().map(str::to_owned).collect();
        let mut buf = Vec::new();
        write_report(&mut buf, &encoder.rom, &encoder.symbols, &lines).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("used 250 out of 256"));
        assert!(text.contains("free slots:"));
    }
}
