use crate::format::Format;
use crate::variant;

/// Which half of a resolved value a `<`/`>` operand selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    None,
    High,
    Low,
}

impl Half {
    /// Apply the selector to a fully-resolved value, per `spec.md` §4.4:
    /// `High` -> `value >> 8` (or `>> 4` for the 256-byte variant, whose
    /// "halves" are nibbles), `Low` -> the low 8 (or 4) bits, `None` ->
    /// the raw value.
    pub fn apply(self, value: u32) -> u32 {
        match self {
            Half::None => value,
            Half::High => value >> variant::HALF_SHIFT,
            Half::Low => value & variant::HALF_MASK,
        }
    }
}

/// The active micro-instruction set a line is encoded against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Exec1,
    Exec2,
}

/// A label or symbol reference whose value isn't known until pass 2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRef {
    pub target: String,
    pub half: Half,
    pub format: Format,
    pub line: u32,
}

/// One byte of the ROM image.
#[derive(Clone, Debug)]
pub struct RomSlot {
    pub byte: u8,
    pub origin_line: Option<u32>,
    pub label: Option<String>,
    pub pending: Option<PendingRef>,
    pub mode: Mode,
}

impl RomSlot {
    fn empty() -> RomSlot {
        RomSlot {
            byte: variant::FILL_BYTE,
            origin_line: None,
            label: None,
            pending: None,
            mode: Mode::Exec1,
        }
    }
}

/// The fixed-size ROM image being assembled, indexed by program counter.
pub struct RomImage {
    slots: Vec<RomSlot>,
}

impl RomImage {
    pub fn new() -> RomImage {
        RomImage {
            slots: vec![RomSlot::empty(); variant::ROM_SIZE as usize],
        }
    }

    pub fn len(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn slot(&self, pc: u32) -> &RomSlot {
        &self.slots[(pc % variant::ROM_SIZE) as usize]
    }

    pub fn slot_mut(&mut self, pc: u32) -> &mut RomSlot {
        &mut self.slots[(pc % variant::ROM_SIZE) as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &RomSlot)> {
        self.slots.iter().enumerate().map(|(i, s)| (i as u32, s))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut RomSlot)> {
        self.slots.iter_mut().enumerate().map(|(i, s)| (i as u32, s))
    }

    /// Address of every slot sharing `label`, built once per resolver pass.
    pub fn label_address(&self, name: &str) -> Option<u32> {
        self.iter()
            .find(|(_, slot)| slot.label.as_deref() == Some(name))
            .map(|(pc, _)| pc)
    }
}
