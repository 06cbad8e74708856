//! TGLP - glyph sheet (texture atlas) layout.
//!
//! ## Layout (0x20 bytes)
//! ```text
//! [0x00] Magic "TGLP"                (4 bytes)
//! [0x04] SectionSize                 (u32 LE)
//! [0x08] CellWidth                   (u8)
//! [0x09] CellHeight                  (u8)
//! [0x0A] BaselinePosition            (u8)
//! [0x0B] MaxCharacterWidth           (u8)
//! [0x0C] SheetSize                   (u32 LE)
//! [0x10] NumSheets                   (u16 LE)
//! [0x12] SheetImageFormat            (u16 LE)
//! [0x14] NumColumns                  (u16 LE)
//! [0x16] NumRows                     (u16 LE)
//! [0x18] SheetWidth                  (u16 LE)
//! [0x1A] SheetHeight                 (u16 LE)
//! [0x1C] SheetDataOffset (abs addr)  (u32 LE)
//! ```
//!
//! Sheets are stored back to back starting at `SheetDataOffset`. Each sheet
//! occupies `SheetWidth * SheetHeight * bpp / 8` bytes, where `bpp` follows
//! from the pixel format. Pixels are tiled GPU data and are returned as-is.

use std::io::{Read, Seek};

use log::warn;

use crate::address::AddressResolver;
use crate::utils::{check_section_size, le_u16, le_u32, magic, u8};
use crate::{Error, Result};

/// Size of the fixed TGLP header in bytes.
pub const HEADER_SIZE: u32 = 0x20;

/// Pixel format of a glyph sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// 8 bits per channel, with alpha.
    Rgba8,
    /// 8 bits per channel.
    Rgb8,
    /// 5-bit colour, 1-bit alpha.
    Rgba5551,
    Rgb565,
    /// 4 bits per channel, with alpha.
    Rgba4,
    /// 8-bit luminance and alpha.
    La8,
    /// Two 8-bit channels (normal maps).
    Hilo8,
    /// 8-bit luminance.
    L8,
    /// 8-bit alpha.
    A8,
    /// 4-bit luminance and alpha.
    La4,
    /// 4-bit luminance.
    L4,
    /// 4-bit alpha. The usual format for system fonts.
    A4,
    /// ETC1 compressed.
    Etc1,
    /// ETC1 compressed with a 4-bit alpha plane.
    Etc1A4,
}

impl SheetFormat {
    /// Map the on-disk discriminant to a format.
    pub fn from_raw(raw: u16) -> Option<Self> {
        Some(match raw {
            0 => SheetFormat::Rgba8,
            1 => SheetFormat::Rgb8,
            2 => SheetFormat::Rgba5551,
            3 => SheetFormat::Rgb565,
            4 => SheetFormat::Rgba4,
            5 => SheetFormat::La8,
            6 => SheetFormat::Hilo8,
            7 => SheetFormat::L8,
            8 => SheetFormat::A8,
            9 => SheetFormat::La4,
            10 => SheetFormat::L4,
            11 => SheetFormat::A4,
            12 => SheetFormat::Etc1,
            13 => SheetFormat::Etc1A4,
            _ => return None,
        })
    }

    /// Storage cost per pixel. ETC1 packs a 4x4 block into 64 bits, plus
    /// another 64 bits of alpha for ETC1A4.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            SheetFormat::Rgba8 => 32,
            SheetFormat::Rgb8 => 24,
            SheetFormat::Rgba5551
            | SheetFormat::Rgb565
            | SheetFormat::Rgba4
            | SheetFormat::La8
            | SheetFormat::Hilo8 => 16,
            SheetFormat::L8 | SheetFormat::A8 | SheetFormat::La4 | SheetFormat::Etc1A4 => 8,
            SheetFormat::L4 | SheetFormat::A4 | SheetFormat::Etc1 => 4,
        }
    }
}

/// Parsed TGLP section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tglp {
    /// Absolute stream offset of the section magic.
    pub offset: u64,
    pub section_size: u32,
    /// Glyph cell size in pixels.
    pub cell_width: u8,
    pub cell_height: u8,
    /// Baseline row within a cell.
    pub baseline_position: u8,
    pub max_character_width: u8,
    /// Size of one sheet in bytes, as declared.
    pub sheet_size: u32,
    pub num_sheets: u16,
    /// Raw pixel format value.
    pub sheet_image_format: u16,
    /// `sheet_image_format` decoded.
    pub format: SheetFormat,
    /// Glyph cells per sheet row.
    pub num_columns: u16,
    /// Glyph cell rows per sheet.
    pub num_rows: u16,
    /// Sheet size in pixels.
    pub sheet_width: u16,
    pub sheet_height: u16,
    /// Address of the first sheet.
    pub sheet_data_offset: u32,
}

impl Tglp {
    /// Parse a TGLP section at the current position of `r`.
    ///
    /// The pixel format is validated here so that sheet extraction never
    /// runs on a layout it cannot size.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let offset = r.stream_position()?;

        magic(r, b"TGLP")?;
        let section_size = le_u32(r)?;
        check_section_size(section_size, HEADER_SIZE, "TGLP section smaller than its header")?;

        let cell_width = u8(r)?;
        let cell_height = u8(r)?;
        let baseline_position = u8(r)?;
        let max_character_width = u8(r)?;
        let sheet_size = le_u32(r)?;
        let num_sheets = le_u16(r)?;
        let sheet_image_format = le_u16(r)?;
        let format = SheetFormat::from_raw(sheet_image_format)
            .ok_or(Error::UnknownSheetFormat(sheet_image_format))?;
        let num_columns = le_u16(r)?;
        let num_rows = le_u16(r)?;
        let sheet_width = le_u16(r)?;
        let sheet_height = le_u16(r)?;
        let sheet_data_offset = le_u32(r)?;

        let tglp = Self {
            offset,
            section_size,
            cell_width,
            cell_height,
            baseline_position,
            max_character_width,
            sheet_size,
            num_sheets,
            sheet_image_format,
            format,
            num_columns,
            num_rows,
            sheet_width,
            sheet_height,
            sheet_data_offset,
        };
        if !tglp.sheet_size_matches() {
            warn!(
                "TGLP declares {} bytes per sheet but {:?} at {}x{} needs {}",
                tglp.sheet_size,
                tglp.format,
                tglp.sheet_width,
                tglp.sheet_height,
                tglp.sheet_bytes()
            );
        }
        Ok(tglp)
    }

    /// Stream offset just past this section.
    pub fn end(&self) -> u64 {
        self.offset + self.section_size as u64
    }

    /// Bytes in the section beyond the documented header.
    pub fn unknown_bytes(&self) -> u32 {
        self.section_size - HEADER_SIZE
    }

    /// Bytes occupied by one sheet, derived from its dimensions and format.
    pub fn sheet_bytes(&self) -> u64 {
        self.sheet_width as u64 * self.sheet_height as u64 * self.format.bits_per_pixel() as u64
            / 8
    }

    /// Whether the declared sheet size agrees with the derived one.
    pub fn sheet_size_matches(&self) -> bool {
        self.sheet_size as u64 == self.sheet_bytes()
    }

    /// Blob-relative offset of sheet `index`.
    ///
    /// Returns [`Error::InvalidRange`] if `index >= num_sheets`, or
    /// [`Error::UnresolvableAddress`] if the sheet data address is below the
    /// resolver's base.
    pub fn sheet_offset(&self, index: u16, resolver: &AddressResolver) -> Result<u64> {
        if index >= self.num_sheets {
            return Err(Error::InvalidRange("sheet index out of range"));
        }
        let data = resolver.resolve(self.sheet_data_offset)? as u64;
        Ok(data + index as u64 * self.sheet_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::address::SHARED_FONT_BASE;

    fn tglp(format: u16, width: u16, height: u16, sheet_size: u32) -> Vec<u8> {
        let mut b = b"TGLP".to_vec();
        b.extend_from_slice(&0x20u32.to_le_bytes());
        b.extend_from_slice(&[25, 27, 22, 24]);
        b.extend_from_slice(&sheet_size.to_le_bytes());
        b.extend_from_slice(&2u16.to_le_bytes());
        b.extend_from_slice(&format.to_le_bytes());
        b.extend_from_slice(&5u16.to_le_bytes());
        b.extend_from_slice(&2u16.to_le_bytes());
        b.extend_from_slice(&width.to_le_bytes());
        b.extend_from_slice(&height.to_le_bytes());
        b.extend_from_slice(&(SHARED_FONT_BASE + 0x100).to_le_bytes());
        b
    }

    #[test]
    fn parses_every_field() {
        let raw = tglp(11, 128, 64, 4096);
        let mut c = Cursor::new(&raw);
        let t = Tglp::parse(&mut c).unwrap();
        assert_eq!(c.position(), 0x20);
        assert_eq!(
            (t.cell_width, t.cell_height, t.baseline_position, t.max_character_width),
            (25, 27, 22, 24)
        );
        assert_eq!(t.num_sheets, 2);
        assert_eq!(t.format, SheetFormat::A4);
        assert_eq!((t.num_columns, t.num_rows), (5, 2));
        assert_eq!((t.sheet_width, t.sheet_height), (128, 64));
        assert_eq!(t.sheet_data_offset, SHARED_FONT_BASE + 0x100);
        assert!(t.sheet_size_matches());
    }

    #[test]
    fn a4_sheets_are_half_a_byte_per_pixel() {
        let t = Tglp::parse(&mut Cursor::new(tglp(11, 128, 64, 4096))).unwrap();
        assert_eq!(t.sheet_bytes(), 4096);
        let r = AddressResolver::default();
        assert_eq!(t.sheet_offset(0, &r).unwrap(), 0x100);
        assert_eq!(t.sheet_offset(1, &r).unwrap(), 0x100 + 4096);
        assert!(matches!(
            t.sheet_offset(2, &r),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn sheet_size_follows_declared_format() {
        let t = Tglp::parse(&mut Cursor::new(tglp(8, 128, 64, 4096))).unwrap();
        assert_eq!(t.format, SheetFormat::A8);
        assert_eq!(t.sheet_bytes(), 8192);
        assert!(!t.sheet_size_matches());

        let t = Tglp::parse(&mut Cursor::new(tglp(0, 16, 16, 1024))).unwrap();
        assert_eq!(t.sheet_bytes(), 1024);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(matches!(
            Tglp::parse(&mut Cursor::new(tglp(14, 128, 64, 4096))),
            Err(Error::UnknownSheetFormat(14))
        ));
    }

    #[test]
    fn sheet_data_below_base_is_unresolvable() {
        let t = Tglp::parse(&mut Cursor::new(tglp(11, 128, 64, 4096))).unwrap();
        let r = AddressResolver::new(SHARED_FONT_BASE + 0x1000);
        assert!(matches!(
            t.sheet_offset(0, &r),
            Err(Error::UnresolvableAddress { .. })
        ));
    }
}
