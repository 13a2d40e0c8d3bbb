//! Program dump intro detection.
//!
//! A single patch dump starts with `F0 10 02 01 00 <program>`. Dumps are not
//! aligned inside a capture, so the search window slides one byte at a time.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use tracing::debug;

use crate::FormatError;

/// Bytes in a program dump intro.
pub const INTRO_LEN: usize = 6;

/// The fixed part of the intro: SysEx start, manufacturer, device, opcode,
/// program type. The sixth byte is the program number and is not matched.
pub const INTRO_PREFIX: [u8; INTRO_LEN - 1] = [0xF0, 0x10, 0x02, 0x01, 0x00];

/// A found intro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intro {
    /// Stream offset of the `F0` byte
    pub offset: u64,
    /// Program number (sixth intro byte)
    pub program: u8,
}

fn matches_intro(window: &[u8; INTRO_LEN]) -> bool {
    window[..INTRO_PREFIX.len()] == INTRO_PREFIX
}

/// Advance `r` to just past the next intro.
///
/// Returns `Ok(None)` once fewer than [`INTRO_LEN`] bytes remain.
pub fn find_intro<R: Read + Seek>(r: &mut R) -> Result<Option<Intro>, FormatError> {
    let mut window = [0u8; INTRO_LEN];
    loop {
        let start = r.stream_position()?;
        match r.read_exact(&mut window) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                debug!(offset = start, "end of stream, no further intro");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        if matches_intro(&window) {
            let intro = Intro { offset: start, program: window[INTRO_LEN - 1] };
            debug!(offset = intro.offset, program = intro.program, "program dump intro");
            return Ok(Some(intro));
        }

        // Slide by one byte, not by the window.
        r.seek(SeekFrom::Current(-(INTRO_LEN as i64 - 1)))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn intro(program: u8) -> Vec<u8> {
        let mut v = INTRO_PREFIX.to_vec();
        v.push(program);
        v
    }

    #[test]
    fn finds_intro_at_start() {
        let mut c = Cursor::new(intro(7));
        let found = find_intro(&mut c).unwrap();
        assert_eq!(found, Some(Intro { offset: 0, program: 7 }));
        assert_eq!(c.position(), 6);
    }

    #[test]
    fn resyncs_on_unaligned_offsets() {
        for k in 1..13 {
            let mut data = vec![0x55u8; k];
            data.extend(intro(0x21));
            data.extend([0xAA, 0xBB]);
            let mut c = Cursor::new(data);
            let found = find_intro(&mut c).unwrap().expect("intro");
            assert_eq!(found.offset, k as u64);
            assert_eq!(found.program, 0x21);
            assert_eq!(c.position(), k as u64 + 6);
        }
    }

    #[test]
    fn partial_intro_overlapping_real_one() {
        // F0 10 F0 10 02 01 00 05: first window fails, match starts at 2
        let mut data = vec![0xF0, 0x10];
        data.extend(intro(5));
        let mut c = Cursor::new(data);
        assert_eq!(find_intro(&mut c).unwrap(), Some(Intro { offset: 2, program: 5 }));
    }

    #[test]
    fn program_byte_is_not_matched() {
        for program in [0x00, 0x7F, 0xF0, 0xFF] {
            let mut c = Cursor::new(intro(program));
            assert_eq!(find_intro(&mut c).unwrap().map(|i| i.program), Some(program));
        }
    }

    #[test]
    fn no_intro_is_not_an_error() {
        let mut c = Cursor::new(vec![0xF0, 0x10, 0x02, 0x01, 0x01, 0x00, 0xF7, 0x00, 0x10]);
        assert_eq!(find_intro(&mut c).unwrap(), None);
    }

    #[test]
    fn short_streams_end_cleanly() {
        for len in 0..INTRO_LEN {
            let data = intro(1)[..len].to_vec();
            let mut c = Cursor::new(data);
            assert_eq!(find_intro(&mut c).unwrap(), None);
        }
    }
}
