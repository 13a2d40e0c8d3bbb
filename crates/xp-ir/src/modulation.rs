//! Modulation matrix entries.
//!
//! Unused slots in a dump hold garbage, so a slot only decodes when both its
//! source and destination codes are inside their tables. The amount byte
//! packs a 6-bit magnitude, a sign bit and an independent quantize bit.

use core::fmt;

use crate::patch::ModSlot;
use crate::tables::{MOD_DESTINATIONS, MOD_SOURCES};

pub const MOD_SOURCE_COUNT: usize = 27;
pub const MOD_DEST_COUNT: usize = 47;

pub const AMOUNT_MASK: u8 = 0x3F;
pub const SIGN_MASK: u8 = 0x40;
pub const QUANTIZE_MASK: u8 = 0x80;

/// A decoded modulation matrix entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModEntry {
    /// Source or destination out of range; nothing else is decoded.
    Unused,
    Active {
        source: &'static str,
        dest: &'static str,
        /// Signed magnitude, -63..=63
        amount: i8,
        quantize: bool,
    },
}

impl ModEntry {
    pub fn decode(slot: &ModSlot) -> Self {
        if usize::from(slot.source) >= MOD_SOURCE_COUNT
            || usize::from(slot.dest) >= MOD_DEST_COUNT
        {
            return ModEntry::Unused;
        }
        let (Some(source), Some(dest)) = (
            MOD_SOURCES.label(slot.source).name(),
            MOD_DESTINATIONS.label(slot.dest).name(),
        ) else {
            return ModEntry::Unused;
        };
        ModEntry::Active {
            source,
            dest,
            amount: signed_amount(slot.amount),
            quantize: slot.amount & QUANTIZE_MASK != 0,
        }
    }

    pub fn is_unused(&self) -> bool {
        matches!(self, ModEntry::Unused)
    }
}

/// Magnitude from the low 6 bits, negated when the sign bit is set.
pub const fn signed_amount(packed: u8) -> i8 {
    let magnitude = (packed & AMOUNT_MASK) as i8;
    if packed & SIGN_MASK != 0 {
        -magnitude
    } else {
        magnitude
    }
}

impl fmt::Display for ModEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModEntry::Unused => f.write_str("UNUSED ENTRY"),
            ModEntry::Active { source, dest, amount, quantize } => {
                write!(f, "{} modulates {}, amount:{}", source, dest, amount)?;
                if *quantize {
                    f.write_str(" [Q]")?;
                }
                Ok(())
            }
        }
    }
}
