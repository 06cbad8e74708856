//! FINF - font information section.
//!
//! ## Layout (0x20 bytes)
//! ```text
//! [0x00] Magic "FINF"            (4 bytes)
//! [0x04] SectionSize             (u32 LE)
//! [0x08] FontType                (u8)
//! [0x09] LineFeed                (u8)
//! [0x0A] AlterCharIndex          (u16 LE)
//! [0x0C] DefaultWidth            (3 bytes: left, glyph width, char width)
//! [0x0F] Encoding                (u8)
//! [0x10] TglpOffset  (abs addr)  (u32 LE)
//! [0x14] CwdhOffset  (abs addr)  (u32 LE)
//! [0x18] CmapOffset  (abs addr)  (u32 LE)
//! [0x1C] Height                  (u8)
//! [0x1D] Width                   (u8)
//! [0x1E] Ascent                  (u8)
//! [0x1F] Reserved                (u8)
//! ```

use std::io::{Read, Seek};

use crate::Result;
use crate::formats::cwdh::WidthEntry;
use crate::utils::{check_section_size, le_u16, le_u32, magic, u8};

/// Size of the fixed FINF header in bytes.
pub const HEADER_SIZE: u32 = 0x20;

/// How glyph data is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontType {
    /// Bitmap glyphs.
    Glyph,
    /// Glyphs in texture sheets.
    Texture,
    /// Glyphs in packed texture sheets.
    PackedTexture,
}

impl FontType {
    /// Map the on-disk value, or [`None`] for an unknown type.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(FontType::Glyph),
            1 => Some(FontType::Texture),
            2 => Some(FontType::PackedTexture),
            _ => None,
        }
    }
}

/// Character encoding the code maps are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharEncoding {
    Utf8,
    Utf16,
    /// Shift JIS.
    ShiftJis,
    /// Windows-1252.
    Cp1252,
}

impl CharEncoding {
    /// Map the on-disk value, or [`None`] for an unknown encoding.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(CharEncoding::Utf8),
            1 => Some(CharEncoding::Utf16),
            2 => Some(CharEncoding::ShiftJis),
            3 => Some(CharEncoding::Cp1252),
            _ => None,
        }
    }
}

/// Parsed FINF section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finf {
    /// Absolute stream offset of the section magic.
    pub offset: u64,
    /// Declared size, header included. May exceed [`HEADER_SIZE`].
    pub section_size: u32,
    /// Raw [`FontType`] value.
    pub font_type: u8,
    /// Line height in pixels.
    pub line_feed: u8,
    /// Glyph drawn for code points the font does not map.
    pub alter_char_index: u16,
    /// Width used for glyphs outside every width table.
    pub default_width: WidthEntry,
    /// Raw [`CharEncoding`] value.
    pub encoding: u8,
    /// Address of the TGLP data, just past its magic and size.
    pub tglp_offset: u32,
    /// Address of the first CWDH data.
    pub cwdh_offset: u32,
    /// Address of the first CMAP data.
    pub cmap_offset: u32,
    /// Font height in pixels.
    pub height: u8,
    /// Font width in pixels.
    pub width: u8,
    /// Distance from the top to the baseline.
    pub ascent: u8,
    pub reserved: u8,
}

impl Finf {
    /// Parse a FINF section at the current position of `r`.
    ///
    /// Leaves `r` just past the fixed header; callers resume at
    /// [`Finf::end`].
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let offset = r.stream_position()?;

        magic(r, b"FINF")?;
        let section_size = le_u32(r)?;
        check_section_size(section_size, HEADER_SIZE, "FINF section smaller than its header")?;

        let font_type = u8(r)?;
        let line_feed = u8(r)?;
        let alter_char_index = le_u16(r)?;
        let default_width = WidthEntry::parse(r)?;
        let encoding = u8(r)?;
        let tglp_offset = le_u32(r)?;
        let cwdh_offset = le_u32(r)?;
        let cmap_offset = le_u32(r)?;
        let height = u8(r)?;
        let width = u8(r)?;
        let ascent = u8(r)?;
        let reserved = u8(r)?;

        Ok(Self {
            offset,
            section_size,
            font_type,
            line_feed,
            alter_char_index,
            default_width,
            encoding,
            tglp_offset,
            cwdh_offset,
            cmap_offset,
            height,
            width,
            ascent,
            reserved,
        })
    }

    /// Stream offset just past this section.
    pub fn end(&self) -> u64 {
        self.offset + self.section_size as u64
    }

    /// Bytes in the section beyond the documented header.
    pub fn unknown_bytes(&self) -> u32 {
        self.section_size - HEADER_SIZE
    }

    pub fn font_type(&self) -> Option<FontType> {
        FontType::from_raw(self.font_type)
    }

    pub fn encoding(&self) -> Option<CharEncoding> {
        CharEncoding::from_raw(self.encoding)
    }
}
