//! SysEx dump parsing for the Xpander viewer.
//!
//! Finds single patch program dumps inside an arbitrary byte stream and
//! unpacks each one into an [`xp_ir::Patch`].

mod scanner;
mod stream;
mod unpack;

pub use scanner::{find_intro, Intro, INTRO_LEN, INTRO_PREFIX};
pub use stream::{LocatedPatch, PatchStream};
pub use unpack::read_patch;

use thiserror::Error;

/// Which part of a program dump ran short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// The packed field words
    Payload,
    /// The double-byte name characters
    Name,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Payload => f.write_str("payload"),
            Section::Name => f.write_str("name"),
        }
    }
}

/// Error type for dump parsing.
///
/// Running out of input while looking for an intro is not an error: the
/// scanner reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Input ended inside a program dump, after its intro was found
    #[error("truncated record: {section} ends early (dump starts at offset {offset:#x})")]
    TruncatedRecord { section: Section, offset: u64 },
    /// Binary read failure other than end of input
    #[error("failed to read packed data: {0}")]
    Read(#[from] binrw::Error),
    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub fn is_truncated(&self) -> bool {
        matches!(self, FormatError::TruncatedRecord { .. })
    }
}
