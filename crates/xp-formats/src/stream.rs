//! Iteration over every program dump in a byte source.

use std::io::{Read, Seek};

use tracing::debug;
use xp_ir::Patch;

use crate::scanner::{find_intro, Intro};
use crate::unpack::read_patch;
use crate::FormatError;

/// A patch together with where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocatedPatch {
    pub intro: Intro,
    pub patch: Patch,
}

/// Yields each patch in stream order.
///
/// The stream owns its source, which is released when the stream is dropped.
/// After the first error no further items are produced.
pub struct PatchStream<R> {
    reader: R,
    found: usize,
    done: bool,
}

impl<R: Read + Seek> PatchStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, found: 0, done: false }
    }

    /// Number of patches decoded so far.
    pub fn found(&self) -> usize {
        self.found
    }

    fn next_patch(&mut self) -> Result<Option<LocatedPatch>, FormatError> {
        let Some(intro) = find_intro(&mut self.reader)? else {
            debug!(found = self.found, "no more program dumps");
            return Ok(None);
        };
        let patch = read_patch(&mut self.reader, intro.offset)?;
        self.found += 1;
        Ok(Some(LocatedPatch { intro, patch }))
    }
}

impl<R: Read + Seek> Iterator for PatchStream<R> {
    type Item = Result<LocatedPatch, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_patch() {
            Ok(Some(found)) => Some(Ok(found)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> std::iter::FusedIterator for PatchStream<R> {}
