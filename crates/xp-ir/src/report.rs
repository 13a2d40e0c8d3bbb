//! Text listing of an interpreted patch.

use alloc::format;
use core::fmt;

use crate::interpret::{annotate, Field, FieldKind, Group};
use crate::patch::{Patch, Track};

const SINGLE_LINE: &str = "---------------------------";
const DOUBLE_LINE: &str = "===========================";

/// Width of the `GROUP.param:` column.
const NAME_WIDTH: usize = 18;

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let FieldKind::Modulation { entry, .. } = &self.kind {
            return write!(f, "{}: {}", self.group, entry);
        }

        let name = format!("{}.{}:", self.group, self.param);
        write!(f, "{:<width$} {:02X}h ", name, self.raw, width = NAME_WIDTH)?;
        match &self.kind {
            FieldKind::Value => write!(f, "{:4}", self.raw),
            FieldKind::Signed(v) => write!(f, "{:4}", v),
            FieldKind::Enum(label) => write!(f, "{:4} : {}", self.raw, label),
            FieldKind::Flags(labels) => {
                write!(f, "{:4} :", self.raw)?;
                for label in labels {
                    write!(f, " {}", label)?;
                }
                Ok(())
            }
            FieldKind::Modulation { .. } => Ok(()),
        }
    }
}

/// One patch as printed: program header, name, then every group.
pub struct PatchListing<'a> {
    /// Program number from the dump intro
    pub program: u8,
    pub patch: &'a Patch,
}

impl<'a> PatchListing<'a> {
    pub fn new(program: u8, patch: &'a Patch) -> Self {
        Self { program, patch }
    }
}

impl fmt::Display for PatchListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DOUBLE_LINE)?;
        writeln!(f, "Program type:\t 00h")?;
        writeln!(f, "Program number:\t {:02X}h ({:02})", self.program, self.program)?;
        writeln!(f, "NAME:\t{}", self.patch.name)?;

        let mut current: Option<Group> = None;
        for field in annotate(self.patch) {
            if current != Some(field.group) {
                if let Some(Group::Track(i)) = current {
                    write_points(f, i, &self.patch.track[i as usize])?;
                }
                writeln!(f, "{}", SINGLE_LINE)?;
                current = Some(field.group);
            }
            writeln!(f, "{}", field)?;
        }
        if let Some(Group::Track(i)) = current {
            write_points(f, i, &self.patch.track[i as usize])?;
        }
        Ok(())
    }
}

/// Summary line of a tracking generator's five points.
fn write_points(f: &mut fmt::Formatter<'_>, index: u8, track: &Track) -> fmt::Result {
    let name = format!("{}.points:", Group::Track(index));
    write!(f, "{:<width$}", name, width = NAME_WIDTH)?;
    for (i, point) in track.points.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", point)?;
    }
    writeln!(f)
}
