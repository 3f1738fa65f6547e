//! Two-pass assembler for the microsequencer `EXEC1`/`EXEC2` ROM image.
//!
//! [`assemble`] runs both passes — [`encoder`] allocates ROM bytes and
//! opcode/operand bits line by line, [`resolver`] substitutes every
//! deferred label/symbol reference once the whole source has been seen —
//! and returns the resolved [`rom::RomImage`] plus the [`symbols::SymbolTable`]
//! it built along the way, ready for [`hex`] emission and a [`report`].

pub mod encoder;
pub mod error;
pub mod format;
pub mod hex;
pub mod mnemonics;
pub mod numeric;
mod parser;
pub mod report;
pub mod resolver;
pub mod rom;
pub mod symbols;
pub mod variant;

use error::AssembleError;
use rom::RomImage;
use symbols::SymbolTable;

/// The result of assembling one source file: a fully resolved ROM image,
/// the symbol table built from its `.EQU` directives, and the source text
/// split into lines (kept around for the listing in [`report`]).
pub struct Assembly {
    pub rom: RomImage,
    pub symbols: SymbolTable,
    pub source_lines: Vec<String>,
}

pub fn assemble(source: &str) -> Result<Assembly, AssembleError> {
    let mut encoder = encoder::Encoder::new();
    encoder.process_source(source)?;
    resolver::resolve(&mut encoder.rom, &encoder.symbols)?;

    Ok(Assembly {
        rom: encoder.rom,
        symbols: encoder.symbols,
        source_lines: source.lines().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
mod test;
