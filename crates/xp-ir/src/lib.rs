//! Single patch model for the Oberheim Xpander / Matrix-12 viewer.
//!
//! This crate defines the decoded patch record, the name tables for its
//! enumeration and flag fields, and the interpretation that turns raw
//! values into labelled fields. Format code in `xp-formats` produces
//! [`Patch`] values; the viewer prints them through [`PatchListing`].
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod interpret;
mod modulation;
mod patch;
mod report;
pub mod tables;

pub use interpret::{annotate, Field, FieldKind, Group, FIELD_COUNT};
pub use modulation::{
    signed_amount, ModEntry, AMOUNT_MASK, MOD_DEST_COUNT, MOD_SOURCE_COUNT, QUANTIZE_MASK,
    SIGN_MASK,
};
pub use patch::{
    decode_name, unpack_word, Env, FmLag, Lfo, ModSlot, Patch, PatchName, Ramp, Track, Vcf, Vco,
    DATA_WORDS, ENV_COUNT, LFO_COUNT, MOD_ENTRIES, NAME_LEN, PAYLOAD_BYTES, RAMP_COUNT,
    TRACK_COUNT, TRACK_POINTS, VCO_COUNT,
};
pub use report::PatchListing;
pub use tables::{EnumLabel, EnumTable, FlagLabels, FlagTable};
