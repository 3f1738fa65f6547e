//! Hex file emission (`spec.md` §4.4/§6): a three-line header followed by
//! one uppercase two-digit hex byte per ROM slot, in address order.

use crate::rom::RomImage;
use crate::variant;
use std::io::{self, Write};

pub fn write_hex<W: Write>(writer: &mut W, rom: &RomImage) -> io::Result<()> {
    writeln!(writer, "#File_format=Hex")?;
    writeln!(writer, "#Address_depth={}", variant::ROM_SIZE)?;
    writeln!(writer, "#Data_width=8")?;
    for (_, slot) in rom.iter() {
        writeln!(writer, "{:02X}", slot.byte)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    #[cfg(feature = "variant-256")]
    fn emits_rom_size_plus_three_lines() {
        let mut encoder = Encoder::new();
        encoder.process_source("CLR").unwrap();

        let mut buf = Vec::new();
        write_hex(&mut buf, &encoder.rom).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), variant::ROM_SIZE as usize + 3);
        assert_eq!(lines[0], "#File_format=Hex");
        assert_eq!(lines[1], "#Address_depth=256");
        assert_eq!(lines[2], "#Data_width=8");
        assert_eq!(lines[3], "AB");
        assert_eq!(lines[4], "AF");
        for line in &lines[3..] {
            assert_eq!(line.len(), 2);
            assert!(line.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }
}
