//! CWDH - character width table.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "CWDH"                (4 bytes)
//! [0x04] SectionSize                 (u32 LE)
//! [0x08] StartIndex                  (u16 LE)
//! [0x0A] EndIndex                    (u16 LE)
//! [0x0C] NextCwdhOffset              (u32 LE)
//! [0x10] Entries                     ((EndIndex - StartIndex + 1) × 3 bytes)
//! ```
//!
//! ## Width entry (3 bytes)
//! ```text
//! [0x00] Left bearing                (i8)
//! [0x01] Glyph width                 (u8)
//! [0x02] Character advance           (u8)
//! ```
//!
//! Entries are indexed by glyph index, not by code point. A font may chain
//! several tables through `NextCwdhOffset`; the link is recorded but not
//! followed.

use std::io::{Read, Seek};

use log::debug;

use crate::utils::{check_section_size, i8, le_u16, le_u32, magic, u8};
use crate::{Error, Result};

/// Size of the fixed CWDH header in bytes.
pub const HEADER_SIZE: u32 = 0x10;
/// Size of one [`WidthEntry`] on disk.
pub const ENTRY_SIZE: u32 = 3;

/// Horizontal metrics of one glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidthEntry {
    /// Offset from the pen position to the glyph's left edge.
    pub left: i8,
    /// Width of the glyph image.
    pub glyph_width: u8,
    /// Pen advance after drawing the glyph.
    pub char_width: u8,
}

impl WidthEntry {
    pub(crate) fn parse<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            left: i8(r)?,
            glyph_width: u8(r)?,
            char_width: u8(r)?,
        })
    }
}

/// Parsed CWDH section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cwdh {
    /// Absolute stream offset of the section magic.
    pub offset: u64,
    pub section_size: u32,
    pub start_index: u16,
    pub end_index: u16,
    /// Address of the next width table (0 when this is the last).
    pub next_offset: u32,
    /// One entry per glyph index in `start_index..=end_index`.
    pub entries: Vec<WidthEntry>,
}

impl Cwdh {
    /// Parse a CWDH section and its entries at the current position of `r`.
    ///
    /// Returns [`Error::InvalidRange`] if `start_index > end_index`, and
    /// [`Error::InvalidFormat`] if the entries do not fit in the declared
    /// section size.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let offset = r.stream_position()?;

        magic(r, b"CWDH")?;
        let section_size = le_u32(r)?;
        check_section_size(section_size, HEADER_SIZE, "CWDH section smaller than its header")?;

        let start_index = le_u16(r)?;
        let end_index = le_u16(r)?;
        let next_offset = le_u32(r)?;

        if start_index > end_index {
            return Err(Error::InvalidRange("CWDH start index exceeds end index"));
        }
        let count = (end_index - start_index) as u32 + 1;
        if (section_size - HEADER_SIZE) / ENTRY_SIZE < count {
            return Err(Error::InvalidFormat("CWDH entries overrun the section"));
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(WidthEntry::parse(r)?);
        }
        debug!("CWDH at 0x{offset:X}: {count} widths for glyphs {start_index}..={end_index}");

        Ok(Self {
            offset,
            section_size,
            start_index,
            end_index,
            next_offset,
            entries,
        })
    }

    /// Stream offset just past this section.
    pub fn end(&self) -> u64 {
        self.offset + self.section_size as u64
    }

    /// Bytes in the section beyond the header and entries.
    pub fn unknown_bytes(&self) -> u32 {
        self.section_size - HEADER_SIZE - self.entries.len() as u32 * ENTRY_SIZE
    }

    /// Widths of `glyph_index`, if this table covers it.
    pub fn get(&self, glyph_index: u16) -> Option<&WidthEntry> {
        let i = glyph_index.checked_sub(self.start_index)?;
        self.entries.get(i as usize)
    }

    /// Iterate over `(glyph_index, widths)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &WidthEntry)> {
        (self.start_index..=self.end_index).zip(self.entries.iter())
    }
}
