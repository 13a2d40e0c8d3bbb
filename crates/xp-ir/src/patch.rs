//! Single patch record types.
//!
//! Field order inside every group matches the physical order of the packed
//! words in a program dump, so the unpacker can fill a group one field at a
//! time from a sequential cursor.

use arrayvec::ArrayString;

/// Number of packed words carrying field values (everything but the name).
pub const DATA_WORDS: usize = 188;
/// Number of double-byte name characters following the data words.
pub const NAME_LEN: usize = 8;
/// Bytes of payload after the intro: data words plus name, two bytes each.
pub const PAYLOAD_BYTES: usize = (DATA_WORDS + NAME_LEN) * 2;

/// Decoded name storage. Each character is Latin-1, at most two UTF-8 bytes.
pub type PatchName = ArrayString<{ NAME_LEN * 2 }>;

pub const VCO_COUNT: usize = 2;
pub const LFO_COUNT: usize = 5;
pub const ENV_COUNT: usize = 5;
pub const TRACK_COUNT: usize = 3;
pub const TRACK_POINTS: usize = 5;
pub const RAMP_COUNT: usize = 4;
pub const MOD_ENTRIES: usize = 20;

/// Oscillator settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vco {
    pub freq: u8,
    pub detune: i8,
    /// Pulse width
    pub pw: u8,
    pub vol: u8,
    /// Standard modulation flags
    pub mod_flags: u8,
    /// Wave shape flags
    pub wave: u8,
}

/// Filter and amplifier settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vcf {
    pub freq: u8,
    pub res: u8,
    /// Filter mode code
    pub mode: u8,
    pub vca1: u8,
    pub vca2: u8,
    /// Standard modulation flags
    pub mod_flags: u8,
}

/// FM amount/destination and the lag processor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FmLag {
    pub fm_amp: u8,
    /// FM destination code
    pub fm_dest: u8,
    /// Lag input (modulation source code)
    pub lag_in: u8,
    pub lag_rate: u8,
    /// Lag mode flags
    pub lag_mode: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lfo {
    pub speed: u8,
    /// Retrigger mode code
    pub retrig_mode: u8,
    /// Lag enable flag
    pub lag: u8,
    /// Wave shape code
    pub wave: u8,
    /// Retrigger point
    pub retrig: u8,
    /// Sample source (modulation source code)
    pub sample: u8,
    pub amp: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Env {
    /// Mode flags
    pub flags: u8,
    /// Triggering LFO code
    pub lfo_trig: u8,
    pub delay: u8,
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
    pub amp: u8,
}

/// Tracking generator: one input mapped through five signed points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Track {
    /// Input (modulation source code)
    pub input: u8,
    pub points: [i8; TRACK_POINTS],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ramp {
    pub rate: u8,
    pub flags: u8,
    /// Triggering LFO code
    pub lfo_trig: u8,
}

/// One raw modulation matrix slot. See [`crate::ModEntry`] for the decoded form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModSlot {
    pub source: u8,
    /// 6-bit magnitude, sign bit (0x40) and quantize bit (0x80)
    pub amount: u8,
    pub dest: u8,
}

/// A decoded single patch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Patch {
    pub vco: [Vco; VCO_COUNT],
    pub vcf: Vcf,
    pub fm_lag: FmLag,
    pub lfo: [Lfo; LFO_COUNT],
    pub env: [Env; ENV_COUNT],
    pub track: [Track; TRACK_COUNT],
    pub ramp: [Ramp; RAMP_COUNT],
    pub mods: [ModSlot; MOD_ENTRIES],
    /// Patch name, decoded up to the first NUL character
    pub name: PatchName,
}

/// Rebuild an 8-bit value from a packed 9-bit word.
///
/// Bit 8 of the word moves to bit 7 and is OR-ed with the low byte.
#[inline]
pub const fn unpack_word(word: u16) -> u8 {
    (((word & 0x100) >> 1) | (word & 0xFF)) as u8
}

/// Decode the name from its double-byte characters (low byte is the code).
pub fn decode_name(units: &[u16]) -> PatchName {
    let mut name = PatchName::new();
    for &unit in units.iter().take(NAME_LEN) {
        let code = (unit & 0xFF) as u8;
        if code == 0 {
            break;
        }
        let _ = name.try_push(char::from(code));
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_392_bytes() {
        assert_eq!(PAYLOAD_BYTES, 392);
        let fields = VCO_COUNT * 6
            + 6
            + 5
            + LFO_COUNT * 7
            + ENV_COUNT * 8
            + TRACK_COUNT * (1 + TRACK_POINTS)
            + RAMP_COUNT * 3
            + MOD_ENTRIES * 3;
        assert_eq!(fields, DATA_WORDS);
    }

    #[test]
    fn unpack_moves_bit_8_to_bit_7() {
        assert_eq!(unpack_word(0x0000), 0x00);
        assert_eq!(unpack_word(0x007F), 0x7F);
        assert_eq!(unpack_word(0x0100), 0x80);
        assert_eq!(unpack_word(0x017F), 0xFF);
        // bit 7 of the low byte is kept as is
        assert_eq!(unpack_word(0x0080), 0x80);
        // upper bits beyond bit 8 are ignored
        assert_eq!(unpack_word(0xFE05), 0x05);
    }

    #[test]
    fn unpack_is_stable_for_every_word() {
        for word in 0..=u16::MAX {
            let once = unpack_word(word);
            assert_eq!(once, unpack_word(word));
            assert_eq!(once as u16 & !0xFF, 0);
        }
    }

    #[test]
    fn name_stops_at_nul_and_ignores_high_byte() {
        let units = [0x0042, 0x0052, 0x4141, 0x0053, 0x0053, 0x0000, 0x0058, 0x0058];
        assert_eq!(decode_name(&units).as_str(), "BRASS");
    }

    #[test]
    fn name_keeps_all_eight_characters() {
        let units = *b"STRINGS ";
        let units = units.map(u16::from);
        assert_eq!(decode_name(&units).as_str(), "STRINGS ");
    }
}
