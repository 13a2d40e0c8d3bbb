//! Single patch payload unpacking.
//!
//! After the intro come 188 little-endian 16-bit words, one per field, each
//! carrying a 9-bit value, then 8 little-endian double-byte name characters.

use std::io::{Read, Seek};

use binrw::BinRead;
use tracing::warn;
use xp_ir::{
    decode_name, unpack_word, Env, FmLag, Lfo, ModSlot, Patch, Ramp, Track, Vcf, Vco,
    DATA_WORDS, NAME_LEN,
};

use crate::{FormatError, Section};

#[derive(BinRead)]
#[br(little)]
struct PackedWords {
    words: [u16; DATA_WORDS],
}

#[derive(BinRead)]
#[br(little)]
struct PackedName {
    chars: [u16; NAME_LEN],
}

/// Sequential reader over the unpacked field bytes.
struct FieldCursor<'a> {
    words: &'a [u16; DATA_WORDS],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(words: &'a [u16; DATA_WORDS]) -> Self {
        Self { words, pos: 0 }
    }

    fn next_u8(&mut self) -> u8 {
        let v = unpack_word(self.words[self.pos]);
        self.pos += 1;
        v
    }

    fn next_i8(&mut self) -> i8 {
        self.next_u8() as i8
    }

    fn vco(&mut self) -> Vco {
        Vco {
            freq: self.next_u8(),
            detune: self.next_i8(),
            pw: self.next_u8(),
            vol: self.next_u8(),
            mod_flags: self.next_u8(),
            wave: self.next_u8(),
        }
    }

    fn vcf(&mut self) -> Vcf {
        Vcf {
            freq: self.next_u8(),
            res: self.next_u8(),
            mode: self.next_u8(),
            vca1: self.next_u8(),
            vca2: self.next_u8(),
            mod_flags: self.next_u8(),
        }
    }

    fn fm_lag(&mut self) -> FmLag {
        FmLag {
            fm_amp: self.next_u8(),
            fm_dest: self.next_u8(),
            lag_in: self.next_u8(),
            lag_rate: self.next_u8(),
            lag_mode: self.next_u8(),
        }
    }

    fn lfo(&mut self) -> Lfo {
        Lfo {
            speed: self.next_u8(),
            retrig_mode: self.next_u8(),
            lag: self.next_u8(),
            wave: self.next_u8(),
            retrig: self.next_u8(),
            sample: self.next_u8(),
            amp: self.next_u8(),
        }
    }

    fn env(&mut self) -> Env {
        Env {
            flags: self.next_u8(),
            lfo_trig: self.next_u8(),
            delay: self.next_u8(),
            attack: self.next_u8(),
            decay: self.next_u8(),
            sustain: self.next_u8(),
            release: self.next_u8(),
            amp: self.next_u8(),
        }
    }

    fn track(&mut self) -> Track {
        let input = self.next_u8();
        let points = core::array::from_fn(|_| self.next_i8());
        Track { input, points }
    }

    fn ramp(&mut self) -> Ramp {
        Ramp {
            rate: self.next_u8(),
            flags: self.next_u8(),
            lfo_trig: self.next_u8(),
        }
    }

    fn mod_slot(&mut self) -> ModSlot {
        ModSlot {
            source: self.next_u8(),
            amount: self.next_u8(),
            dest: self.next_u8(),
        }
    }
}

/// Build a patch from its packed field words, in physical order.
fn patch_from_words(words: &[u16; DATA_WORDS], name: &[u16; NAME_LEN]) -> Patch {
    let mut c = FieldCursor::new(words);
    let vco = [c.vco(), c.vco()];
    let vcf = c.vcf();
    let fm_lag = c.fm_lag();
    let lfo = core::array::from_fn(|_| c.lfo());
    let env = core::array::from_fn(|_| c.env());
    let track = core::array::from_fn(|_| c.track());
    let ramp = core::array::from_fn(|_| c.ramp());
    let mods = core::array::from_fn(|_| c.mod_slot());
    debug_assert_eq!(c.pos, DATA_WORDS);

    Patch { vco, vcf, fm_lag, lfo, env, track, ramp, mods, name: decode_name(name) }
}

/// Map a binary read failure, treating end of input as truncation.
fn section_error(e: binrw::Error, section: Section, offset: u64) -> FormatError {
    if e.is_eof() {
        FormatError::TruncatedRecord { section, offset }
    } else {
        FormatError::Read(e)
    }
}

/// Read one patch payload. `r` must be positioned just past the intro that
/// started at `offset`.
pub fn read_patch<R: Read + Seek>(r: &mut R, offset: u64) -> Result<Patch, FormatError> {
    let packed =
        PackedWords::read(r).map_err(|e| section_error(e, Section::Payload, offset))?;
    let name = PackedName::read(r).map_err(|e| section_error(e, Section::Name, offset))?;

    if name.chars.iter().any(|c| c & 0xFF00 != 0) {
        warn!(offset, "name has non-zero high bytes, ignoring them");
    }

    Ok(patch_from_words(&packed.words, &name.chars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn words_le(words: &[u16]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn payload(words: &[u16; DATA_WORDS], name: &[u8; NAME_LEN]) -> Vec<u8> {
        let mut v = words_le(words);
        v.extend(words_le(&name.map(u16::from)));
        v
    }

    #[test]
    fn fields_land_in_physical_order() {
        let mut words = [0u16; DATA_WORDS];
        for (i, w) in words.iter_mut().enumerate() {
            *w = i as u16 & 0x7F;
        }
        let mut c = Cursor::new(payload(&words, b"ORGAN   "));
        let patch = read_patch(&mut c, 0).unwrap();

        assert_eq!(patch.vco[0].freq, 0);
        assert_eq!(patch.vco[0].wave, 5);
        assert_eq!(patch.vco[1].freq, 6);
        assert_eq!(patch.vcf.freq, 12);
        assert_eq!(patch.vcf.mod_flags, 17);
        assert_eq!(patch.fm_lag.fm_amp, 18);
        assert_eq!(patch.fm_lag.lag_mode, 22);
        assert_eq!(patch.lfo[0].speed, 23);
        assert_eq!(patch.lfo[4].amp, 57);
        assert_eq!(patch.env[0].flags, 58);
        assert_eq!(patch.env[4].amp, 97);
        assert_eq!(patch.track[0].input, 98);
        assert_eq!(patch.track[2].points, [111, 112, 113, 114, 115]);
        assert_eq!(patch.ramp[0].rate, 116);
        assert_eq!(patch.ramp[3].lfo_trig, 127);
        assert_eq!(patch.mods[0], ModSlot { source: 0, amount: 1, dest: 2 });
        assert_eq!(patch.mods[19], ModSlot { source: 57, amount: 58, dest: 59 });
        assert_eq!(patch.name.as_str(), "ORGAN   ");
        assert_eq!(c.position(), 392);
    }

    #[test]
    fn high_bit_is_rebuilt_from_bit_8() {
        let mut words = [0u16; DATA_WORDS];
        words[0] = 0x017F; // vco1 freq -> 0xFF
        words[1] = 0x017D; // vco1 detune -> 0xFD = -3
        words[98 + 1] = 0x0140; // track1 point1 -> 0xC0 = -64
        let mut c = Cursor::new(payload(&words, b"X\0\0\0\0\0\0\0"));
        let patch = read_patch(&mut c, 0).unwrap();
        assert_eq!(patch.vco[0].freq, 0xFF);
        assert_eq!(patch.vco[0].detune, -3);
        assert_eq!(patch.track[0].points[0], -64);
        assert_eq!(patch.name.as_str(), "X");
    }

    #[test]
    fn short_payload_is_truncated_record() {
        let bytes = vec![0u8; DATA_WORDS * 2 - 1];
        let err = read_patch(&mut Cursor::new(bytes), 0x40).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedRecord { section: Section::Payload, offset: 0x40 }
        ));
    }

    #[test]
    fn short_name_is_truncated_record() {
        let bytes = vec![0u8; DATA_WORDS * 2 + NAME_LEN * 2 - 1];
        let err = read_patch(&mut Cursor::new(bytes), 0).unwrap_err();
        assert!(matches!(err, FormatError::TruncatedRecord { section: Section::Name, .. }));
    }
}
