//! Field interpretation: raw patch values → labelled fields.
//!
//! [`annotate`] walks a patch in physical group order and yields one
//! [`Field`] per value, except that each modulation entry is a single field
//! carrying its source, amount and destination. Every field is interpreted
//! on its own, so the output is the same on every run for the same patch.

use alloc::vec::Vec;
use core::fmt;

use crate::modulation::ModEntry;
use crate::patch::{Env, FmLag, Lfo, Patch, Ramp, Track, Vcf, Vco, DATA_WORDS, MOD_ENTRIES};
use crate::tables::{
    EnumLabel, EnumTable, FlagLabels, FlagTable, ENV_MODE_FLAGS, FILTER_MODES, FM_DESTINATIONS,
    LAG_MODE_FLAGS, LFO_LAG_FLAGS, LFO_TRIGGERS, LFO_WAVES, MOD_FLAGS, MOD_SOURCES, RAMP_FLAGS,
    TRIGGER_MODES, VCO_WAVE_FLAGS,
};

/// Fields produced by [`annotate`]: one per data word, one per modulation entry.
pub const FIELD_COUNT: usize = DATA_WORDS - 2 * MOD_ENTRIES;

/// The group a field belongs to. Indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Group {
    Vco(u8),
    Vcf,
    FmLag,
    Lfo(u8),
    Env(u8),
    Track(u8),
    Ramp(u8),
    Mod(u8),
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Group::Vco(i) => write!(f, "VCO{}", i + 1),
            Group::Vcf => f.write_str("VCF"),
            Group::FmLag => f.write_str("FMLAG"),
            Group::Lfo(i) => write!(f, "LFO[{}]", i + 1),
            Group::Env(i) => write!(f, "ENV[{}]", i + 1),
            Group::Track(i) => write!(f, "TRACK[{}]", i + 1),
            Group::Ramp(i) => write!(f, "RAMP[{}]", i + 1),
            Group::Mod(i) => write!(f, "MOD[{:02}]", i + 1),
        }
    }
}

/// How a raw value reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain unsigned amount
    Value,
    /// Two's-complement signed byte
    Signed(i8),
    Enum(EnumLabel),
    Flags(FlagLabels),
    /// Modulation matrix entry; `raw` is the packed amount byte
    Modulation { source: u8, dest: u8, entry: ModEntry },
}

/// One interpreted field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub group: Group,
    /// Parameter name within the group (empty for modulation entries)
    pub param: &'static str,
    pub raw: u8,
    pub kind: FieldKind,
}

impl Field {
    fn value(group: Group, param: &'static str, raw: u8) -> Self {
        Self { group, param, raw, kind: FieldKind::Value }
    }

    fn signed(group: Group, param: &'static str, value: i8) -> Self {
        Self { group, param, raw: value as u8, kind: FieldKind::Signed(value) }
    }

    fn enumerated(group: Group, param: &'static str, raw: u8, table: &EnumTable) -> Self {
        Self { group, param, raw, kind: FieldKind::Enum(table.label(raw)) }
    }

    fn flags(group: Group, param: &'static str, raw: u8, table: &FlagTable) -> Self {
        Self { group, param, raw, kind: FieldKind::Flags(table.labels(raw)) }
    }

    /// True for enumeration codes outside their table.
    pub fn is_anomaly(&self) -> bool {
        matches!(self.kind, FieldKind::Enum(EnumLabel::Unknown(_)))
    }
}

/// Interpret every field of a patch, in physical order.
pub fn annotate(patch: &Patch) -> Vec<Field> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    for (i, vco) in patch.vco.iter().enumerate() {
        annotate_vco(&mut fields, Group::Vco(i as u8), vco);
    }
    annotate_vcf(&mut fields, &patch.vcf);
    annotate_fm_lag(&mut fields, &patch.fm_lag);
    for (i, lfo) in patch.lfo.iter().enumerate() {
        annotate_lfo(&mut fields, Group::Lfo(i as u8), lfo);
    }
    for (i, env) in patch.env.iter().enumerate() {
        annotate_env(&mut fields, Group::Env(i as u8), env);
    }
    for (i, track) in patch.track.iter().enumerate() {
        annotate_track(&mut fields, Group::Track(i as u8), track);
    }
    for (i, ramp) in patch.ramp.iter().enumerate() {
        annotate_ramp(&mut fields, Group::Ramp(i as u8), ramp);
    }
    for (i, slot) in patch.mods.iter().enumerate() {
        fields.push(Field {
            group: Group::Mod(i as u8),
            param: "",
            raw: slot.amount,
            kind: FieldKind::Modulation {
                source: slot.source,
                dest: slot.dest,
                entry: ModEntry::decode(slot),
            },
        });
    }
    fields
}

fn annotate_vco(out: &mut Vec<Field>, g: Group, vco: &Vco) {
    out.push(Field::value(g, "freq", vco.freq));
    out.push(Field::signed(g, "detune", vco.detune));
    out.push(Field::value(g, "pw", vco.pw));
    out.push(Field::value(g, "vol", vco.vol));
    out.push(Field::flags(g, "mod", vco.mod_flags, &MOD_FLAGS));
    out.push(Field::flags(g, "wave", vco.wave, &VCO_WAVE_FLAGS));
}

fn annotate_vcf(out: &mut Vec<Field>, vcf: &Vcf) {
    let g = Group::Vcf;
    out.push(Field::value(g, "freq", vcf.freq));
    out.push(Field::value(g, "res", vcf.res));
    out.push(Field::enumerated(g, "mode", vcf.mode, &FILTER_MODES));
    out.push(Field::value(g, "vca1", vcf.vca1));
    out.push(Field::value(g, "vca2", vcf.vca2));
    out.push(Field::flags(g, "mod", vcf.mod_flags, &MOD_FLAGS));
}

fn annotate_fm_lag(out: &mut Vec<Field>, fm: &FmLag) {
    let g = Group::FmLag;
    out.push(Field::value(g, "amp", fm.fm_amp));
    out.push(Field::enumerated(g, "dest", fm.fm_dest, &FM_DESTINATIONS));
    out.push(Field::enumerated(g, "lag_in", fm.lag_in, &MOD_SOURCES));
    out.push(Field::value(g, "lag_rate", fm.lag_rate));
    out.push(Field::flags(g, "lag_mode", fm.lag_mode, &LAG_MODE_FLAGS));
}

fn annotate_lfo(out: &mut Vec<Field>, g: Group, lfo: &Lfo) {
    out.push(Field::value(g, "speed", lfo.speed));
    out.push(Field::enumerated(g, "trg_mod", lfo.retrig_mode, &TRIGGER_MODES));
    out.push(Field::flags(g, "lag", lfo.lag, &LFO_LAG_FLAGS));
    out.push(Field::enumerated(g, "wave", lfo.wave, &LFO_WAVES));
    out.push(Field::value(g, "retrig", lfo.retrig));
    out.push(Field::enumerated(g, "sample", lfo.sample, &MOD_SOURCES));
    out.push(Field::value(g, "amp", lfo.amp));
}

fn annotate_env(out: &mut Vec<Field>, g: Group, env: &Env) {
    out.push(Field::flags(g, "flags", env.flags, &ENV_MODE_FLAGS));
    out.push(Field::enumerated(g, "lfo_trg", env.lfo_trig, &LFO_TRIGGERS));
    out.push(Field::value(g, "delay", env.delay));
    out.push(Field::value(g, "attack", env.attack));
    out.push(Field::value(g, "decay", env.decay));
    out.push(Field::value(g, "sustain", env.sustain));
    out.push(Field::value(g, "release", env.release));
    out.push(Field::value(g, "amp", env.amp));
}

fn annotate_track(out: &mut Vec<Field>, g: Group, track: &Track) {
    const POINTS: [&str; 5] = ["point1", "point2", "point3", "point4", "point5"];
    out.push(Field::enumerated(g, "input", track.input, &MOD_SOURCES));
    for (name, &point) in POINTS.iter().zip(track.points.iter()) {
        out.push(Field::signed(g, *name, point));
    }
}

fn annotate_ramp(out: &mut Vec<Field>, g: Group, ramp: &Ramp) {
    out.push(Field::value(g, "rate", ramp.rate));
    out.push(Field::flags(g, "flags", ramp.flags, &RAMP_FLAGS));
    out.push(Field::enumerated(g, "lfo_trg", ramp.lfo_trig, &LFO_TRIGGERS));
}
