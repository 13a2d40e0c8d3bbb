//! Name tables for enumeration codes and flag bytes.

use arrayvec::ArrayVec;
use core::fmt;

/// Maximum labels one flag byte can produce.
pub const MAX_FLAG_LABELS: usize = 8;

/// Labels of the flags set in one byte, in table order.
pub type FlagLabels = ArrayVec<&'static str, MAX_FLAG_LABELS>;

/// An index → name table for enumeration fields.
#[derive(Clone, Copy, Debug)]
pub struct EnumTable {
    pub names: &'static [&'static str],
}

impl EnumTable {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    /// Number of valid codes.
    pub const fn len(&self) -> usize {
        self.names.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Look up a code. Out-of-range codes are reported, never indexed.
    pub fn label(&self, code: u8) -> EnumLabel {
        match self.names.get(code as usize) {
            Some(name) => EnumLabel::Known(name),
            None => EnumLabel::Unknown(code),
        }
    }
}

/// Result of an enumeration lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumLabel {
    Known(&'static str),
    /// Code outside the table
    Unknown(u8),
}

impl EnumLabel {
    pub fn name(&self) -> Option<&'static str> {
        match self {
            EnumLabel::Known(name) => Some(name),
            EnumLabel::Unknown(_) => None,
        }
    }
}

impl fmt::Display for EnumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumLabel::Known(name) => f.write_str(name),
            EnumLabel::Unknown(code) => write!(f, "?? (index {})", code),
        }
    }
}

/// A mask → name table for flag bytes.
#[derive(Clone, Copy, Debug)]
pub struct FlagTable {
    pub flags: &'static [(u8, &'static str)],
}

impl FlagTable {
    pub const fn new(flags: &'static [(u8, &'static str)]) -> Self {
        Self { flags }
    }

    /// Every flag whose mask is fully set in `value`, in table order.
    pub fn labels(&self, value: u8) -> FlagLabels {
        self.flags
            .iter()
            .filter(|(mask, _)| value & mask == *mask)
            .map(|(_, name)| *name)
            .take(MAX_FLAG_LABELS)
            .collect()
    }
}

// Enumerations

pub static FILTER_MODES: EnumTable = EnumTable::new(&[
    "LOW_1", "LOW_2", "LOW_3", "LOW_4", "HIGH_1", "HIGH_2", "HIGH_3", "BAND_2", "BAND_4", "NOTCH_2",
    "PHASE_3", "HIGH_2L", "HIGH_3L", "NOTCH_2L", "PHASE_3L",
]);

pub static FM_DESTINATIONS: EnumTable = EnumTable::new(&["VCO1_FREQ", "VCF_FREQ"]);

/// Modulation sources. Also used for lag input, LFO sample source and
/// tracking generator input.
pub static MOD_SOURCES: EnumTable = EnumTable::new(&[
    "KBD", "LAG", "VEL", "RVEL", "PRES", "TRK1", "TRK2", "TRK3", "RMP1", "RMP2", "RMP3", "RMP4",
    "ENV1", "ENV2", "ENV3", "ENV4", "ENV5", "PED1", "PED2", "LFO1", "LFO2", "LFO3", "LFO4", "LFO5",
    "VIB", "LEV1", "LEV2",
]);

pub static MOD_DESTINATIONS: EnumTable = EnumTable::new(&[
    "VCO1_FRQ", "VCO1_PW", "VCO1_VOL", "VCO2_FRQ", "VCO2_PW", "VCO2_VOL", "VCF_FRQ", "VCF_RES",
    "VCA1_VOL", "VCA2_VOL", "LFO1_SPD", "LFO1_AMP", "LFO2_SPD", "LFO2_AMP", "LFO3_SPD", "LFO3_AMP",
    "LFO4_SPD", "LFO4_AMP", "LFO5_SPD", "LFO5_AMP", "ENV1_DLY", "ENV1_ATK", "ENV1_DCY", "ENV1_REL",
    "ENV1_AMP", "ENV2_DLY", "ENV2_ATK", "ENV2_DCY", "ENV2_REL", "ENV2_AMP", "ENV3_DLY", "ENV3_ATK",
    "ENV3_DCY", "ENV3_REL", "ENV3_AMP", "ENV4_DLY", "ENV4_ATK", "ENV4_DCY", "ENV4_REL", "ENV4_AMP",
    "ENV5_DLY", "ENV5_ATK", "ENV5_DCY", "ENV5_REL", "ENV5_AMP", "FM_AMP", "LAG_SPD",
]);

pub static TRIGGER_MODES: EnumTable = EnumTable::new(&["OFF", "SINGLE", "MULTI", "EXTRIG"]);

pub static LFO_WAVES: EnumTable = EnumTable::new(&[
    "TRIANGLE", "UP_SAW", "DOWN_SAW", "SQUARE", "RANDOM", "NOISE", "SAMPLE",
]);

/// Which LFO (or the vibrato) triggers an envelope or ramp.
pub static LFO_TRIGGERS: EnumTable = EnumTable::new(&[
    "LFO1", "LFO2", "LFO3", "LFO4", "LFO5", "VIB",
]);

// Flag sets

pub static MOD_FLAGS: FlagTable = FlagTable::new(&[
    (0x01, "KEYBD"),
    (0x02, "LAG"),
    (0x04, "LEV_1"),
    (0x08, "VIB"),
]);

pub static VCO_WAVE_FLAGS: FlagTable = FlagTable::new(&[
    (0x01, "TRI"),
    (0x02, "SAW"),
    (0x04, "PULSE"),
    (0x08, "SYNC"),
    (0x10, "NOISE"),
]);

pub static LAG_MODE_FLAGS: FlagTable = FlagTable::new(&[
    (0x01, "LEGATO"),
    (0x02, "EXPO"),
    (0x04, "EQUAL_TIME"),
]);

pub static LFO_LAG_FLAGS: FlagTable = FlagTable::new(&[(0x01, "LAG")]);

/// Envelope mode. Bit 0x02 shows up in real dumps but is not documented;
/// it is labelled without assigning it a meaning. SINGLE when MULTI is clear.
pub static ENV_MODE_FLAGS: FlagTable = FlagTable::new(&[
    (0x01, "RESET"),
    (0x02, "UNDOCUMENTED"),
    (0x04, "MULTI"),
    (0x08, "GATED"),
    (0x10, "EXTRIG"),
    (0x20, "LFOTRIG"),
    (0x40, "DADR"),
    (0x80, "FREERUN"),
]);

/// Ramp mode. SINGLE when MULTI is clear.
pub static RAMP_FLAGS: FlagTable = FlagTable::new(&[
    (0x01, "GATED"),
    (0x02, "LFOTRIG"),
    (0x04, "EXTRIG"),
    (0x08, "MULTI"),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_sizes_match_device() {
        assert_eq!(FILTER_MODES.len(), 15);
        assert_eq!(FM_DESTINATIONS.len(), 2);
        assert_eq!(MOD_SOURCES.len(), 27);
        assert_eq!(MOD_DESTINATIONS.len(), 47);
        assert_eq!(TRIGGER_MODES.len(), 4);
        assert_eq!(LFO_WAVES.len(), 7);
        assert_eq!(LFO_TRIGGERS.len(), 6);
    }

    #[test]
    fn enum_lookup_in_and_out_of_range() {
        assert_eq!(FILTER_MODES.label(0), EnumLabel::Known("LOW_1"));
        assert_eq!(FILTER_MODES.label(14), EnumLabel::Known("PHASE_3L"));
        assert_eq!(FILTER_MODES.label(15), EnumLabel::Unknown(15));
        assert_eq!(MOD_DESTINATIONS.label(46).name(), Some("LAG_SPD"));
        assert_eq!(MOD_SOURCES.label(255).name(), None);
    }

    #[test]
    fn unknown_label_echoes_index() {
        assert_eq!(format!("{}", LFO_WAVES.label(9)), "?? (index 9)");
        assert_eq!(format!("{}", LFO_WAVES.label(6)), "SAMPLE");
    }

    #[test]
    fn zero_byte_has_no_flags() {
        let tables = [
            &MOD_FLAGS,
            &VCO_WAVE_FLAGS,
            &LAG_MODE_FLAGS,
            &LFO_LAG_FLAGS,
            &ENV_MODE_FLAGS,
            &RAMP_FLAGS,
        ];
        for table in tables {
            assert!(table.labels(0x00).is_empty());
        }
    }

    #[test]
    fn flags_come_out_in_table_order() {
        assert_eq!(MOD_FLAGS.labels(0x08 | 0x01).as_slice(), &["KEYBD", "VIB"]);
        assert_eq!(VCO_WAVE_FLAGS.labels(0x1F).len(), 5);
        assert_eq!(ENV_MODE_FLAGS.labels(0xFF).len(), 8);
        assert_eq!(ENV_MODE_FLAGS.labels(0x02).as_slice(), &["UNDOCUMENTED"]);
    }

    #[test]
    fn undefined_bits_are_ignored() {
        assert_eq!(RAMP_FLAGS.labels(0xF0).len(), 0);
        assert_eq!(LFO_LAG_FLAGS.labels(0xFE).len(), 0);
    }
}
