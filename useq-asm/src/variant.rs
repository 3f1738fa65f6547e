//! Build-time ROM configuration.
//!
//! `spec.md` §4.2/§9 requires that the two ROM-size configurations share
//! one codebase but never coexist in a single build. They are selected
//! with mutually exclusive Cargo features rather than a runtime switch,
//! since the opcode maps, fill bytes and address widths genuinely differ
//! per build and nothing in this assembler needs to assemble both kinds
//! of image in the same process.

#[cfg(all(feature = "variant-256", feature = "variant-4096"))]
compile_error!("features \"variant-256\" and \"variant-4096\" are mutually exclusive");

#[cfg(not(any(feature = "variant-256", feature = "variant-4096")))]
compile_error!("select a ROM size: enable either \"variant-256\" or \"variant-4096\"");

/// Number of addressable ROM slots.
#[cfg(feature = "variant-256")]
pub const ROM_SIZE: u32 = 256;
#[cfg(feature = "variant-4096")]
pub const ROM_SIZE: u32 = 4096;

/// Width of the PC in bits, for half-selector semantics (`spec.md` §9:
/// "the 256-byte variant uses an 8-bit wrapping counter whose 'halves'
/// are nibbles ... the 4096-byte variant uses a 12-bit counter whose
/// halves are bytes").
#[cfg(feature = "variant-256")]
pub const PC_BITS: u32 = 8;
#[cfg(feature = "variant-4096")]
pub const PC_BITS: u32 = 12;

/// Byte written into every ROM slot never written by an instruction or
/// `.DB`. Must decode as a no-op/clear on the target hardware.
#[cfg(feature = "variant-256")]
pub const FILL_BYTE: u8 = 0xAF;
#[cfg(feature = "variant-4096")]
pub const FILL_BYTE: u8 = 0xE6;

/// Apply a half-selector to a resolved value, per `spec.md` §4.4.
///
/// `High` takes the upper half of the value, `Low` the lower half; for
/// the 256-byte variant a "half" is a nibble (addresses are 8 bits), for
/// the 4096-byte variant it is a byte (addresses are 12 bits, so the
/// upper half is the high nibble of the high byte and low byte combined
/// as an 8-bit quantity — see `format::Half::apply`).
#[cfg(feature = "variant-256")]
pub const HALF_SHIFT: u32 = 4;
#[cfg(feature = "variant-4096")]
pub const HALF_SHIFT: u32 = 8;

#[cfg(feature = "variant-256")]
pub const HALF_MASK: u32 = 0xF;
#[cfg(feature = "variant-4096")]
pub const HALF_MASK: u32 = 0xFF;
