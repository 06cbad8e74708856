//! BCFNT - complete font decode.
//!
//! Ties the section parsers together. The sections are read strictly in
//! document order, each one starting where the previous one's declared size
//! ends:
//!
//! ## Layout
//! ```text
//! [0x00]            Preamble (configurable, 0 by default)
//! [preamble]        CFNT header  (0x14 bytes)
//! [+0x14]           FINF section (SectionSize bytes)
//! [...]             TGLP section (SectionSize bytes)
//! [...]             CWDH section (SectionSize bytes)
//! [...]             CMAP section chain
//! [SheetDataOffset] Glyph sheets (NumSheets × sheet bytes)
//! ```
//!
//! Absolute addresses inside the sections are resolved against
//! [`DecodeOptions::base_address`] and are relative to the position the
//! stream was at when decoding started (the start of the preamble).

use std::io::{Read, Seek, SeekFrom, Take};

use log::debug;

use crate::address::{AddressResolver, SHARED_FONT_BASE};
use crate::formats::cfnt::Cfnt;
use crate::formats::cmap::{self, Cmap};
use crate::formats::cwdh::{Cwdh, WidthEntry};
use crate::formats::finf::Finf;
use crate::formats::tglp::Tglp;
use crate::utils::{bytesv, seek_section_end, seek_to};
use crate::{Error, Result};

/// Parameters of one decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Bytes to skip before the CFNT header.
    pub preamble_len: u64,
    /// Address the font blob was mapped at when its pointers were written.
    pub base_address: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            preamble_len: 0,
            base_address: SHARED_FONT_BASE,
        }
    }
}

/// Fully decoded font metadata.
///
/// Sheet pixels are not loaded; use [`BcfntReader`] to fetch them.
#[derive(Debug, Clone)]
pub struct Bcfnt {
    pub header: Cfnt,
    pub info: Finf,
    pub glyphs: Tglp,
    pub widths: Cwdh,
    /// Code map chain in file order.
    pub code_maps: Vec<Cmap>,
    /// Resolver used for every absolute address in this font.
    pub resolver: AddressResolver,
    /// Stream position decoding started at.
    pub(crate) origin: u64,
}

impl Bcfnt {
    /// Decode a font from `r`.
    ///
    /// `r` must be positioned at the start of the preamble (or of the CFNT
    /// header when `preamble_len` is 0). The first malformed section aborts
    /// the decode.
    pub fn parse<R: Read + Seek>(r: &mut R, options: &DecodeOptions) -> Result<Self> {
        let origin = r.stream_position()?;
        let resolver = AddressResolver::new(options.base_address);

        let start = origin
            .checked_add(options.preamble_len)
            .ok_or(Error::InvalidRange("preamble length overflows the stream offset"))?;
        seek_to(r, start)?;
        let header = Cfnt::parse(r)?;
        debug!(
            "{:?} container: {} bytes, {} blocks",
            header.variant, header.file_size, header.num_blocks
        );

        let info = Finf::parse(r)?;
        // Every section pointer must be resolvable before anything past FINF
        // is trusted.
        for address in [info.tglp_offset, info.cwdh_offset, info.cmap_offset] {
            resolver.resolve(address)?;
        }
        debug!("FINF at 0x{:X}: {} bytes", info.offset, info.section_size);
        seek_section_end(r, info.offset, info.section_size)?;

        let glyphs = Tglp::parse(r)?;
        resolver.resolve(glyphs.sheet_data_offset)?;
        debug!(
            "TGLP at 0x{:X}: {} {:?} sheets of {}x{}",
            glyphs.offset,
            glyphs.num_sheets,
            glyphs.format,
            glyphs.sheet_width,
            glyphs.sheet_height
        );
        seek_section_end(r, glyphs.offset, glyphs.section_size)?;

        let widths = Cwdh::parse(r)?;
        seek_section_end(r, widths.offset, widths.section_size)?;

        let code_maps = cmap::parse_chain(r)?;

        Ok(Self {
            header,
            info,
            glyphs,
            widths,
            code_maps,
            resolver,
            origin,
        })
    }

    /// Glyph index of a code point, or [`None`] if no code map covers it.
    pub fn glyph_index(&self, code: u16) -> Option<u16> {
        cmap::glyph_index(&self.code_maps, code)
    }

    /// Glyph index of `c`. Characters outside the Basic Multilingual Plane
    /// are never mapped.
    pub fn glyph_index_for_char(&self, c: char) -> Option<u16> {
        u16::try_from(u32::from(c))
            .ok()
            .and_then(|code| self.glyph_index(code))
    }

    /// Glyph index of a code point, falling back to the font's replacement
    /// glyph.
    pub fn glyph_index_or_alternate(&self, code: u16) -> u16 {
        self.glyph_index(code).unwrap_or(self.info.alter_char_index)
    }

    /// Widths of a glyph, falling back to the font's default widths.
    pub fn width_of(&self, glyph_index: u16) -> WidthEntry {
        self.widths
            .get(glyph_index)
            .copied()
            .unwrap_or(self.info.default_width)
    }

    /// Absolute stream offset of sheet `index`.
    pub fn sheet_offset(&self, index: u16) -> Result<u64> {
        Ok(self.origin + self.glyphs.sheet_offset(index, &self.resolver)?)
    }
}

/// Streaming reader wrapper over a decoded [`Bcfnt`].
///
/// Owns the underlying reader; dropping the wrapper releases it.
pub struct BcfntReader<R> {
    inner: R,
    /// Decoded metadata.
    pub font: Bcfnt,
}

impl<R: Read + Seek> BcfntReader<R> {
    /// Decode a font and wrap the provided reader.
    pub fn new(mut reader: R, options: &DecodeOptions) -> Result<Self> {
        let font = Bcfnt::parse(&mut reader, options)?;
        Ok(Self {
            inner: reader,
            font,
        })
    }

    /// Open sheet `index` for streaming access.
    ///
    /// Seeks to the sheet's start and returns a [`Take`] limited to one
    /// sheet. The borrow ends when the [`Take`] is dropped.
    ///
    /// Returns [`Error::UnexpectedEof`] if the stream ends before the whole
    /// sheet, so the [`Take`] always yields exactly one sheet.
    pub fn sheet(&mut self, index: u16) -> Result<Take<&mut R>> {
        let offset = self.font.sheet_offset(index)?;
        let len = self.font.glyphs.sheet_bytes();
        let stream_len = self.inner.seek(SeekFrom::End(0))?;
        if offset.checked_add(len).is_none_or(|end| end > stream_len) {
            return Err(Error::UnexpectedEof);
        }
        seek_to(&mut self.inner, offset)?;
        Ok(self.inner.by_ref().take(len))
    }

    /// Read sheet `index` into memory.
    ///
    /// Returns [`Error::UnexpectedEof`] if the stream ends inside the sheet.
    pub fn read_sheet(&mut self, index: u16) -> Result<Vec<u8>> {
        let offset = self.font.sheet_offset(index)?;
        let len = usize::try_from(self.font.glyphs.sheet_bytes())
            .map_err(|_| Error::InvalidRange("sheet larger than address space"))?;
        seek_to(&mut self.inner, offset)?;
        bytesv(&mut self.inner, len)
    }

    /// Read every sheet, in index order.
    pub fn read_sheets(&mut self) -> Result<Vec<Vec<u8>>> {
        (0..self.font.glyphs.num_sheets)
            .map(|i| self.read_sheet(i))
            .collect()
    }

    /// Consume the reader, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const BASE: u32 = 0x4000_0000;

    fn push_u16(b: &mut Vec<u8>, v: u16) {
        b.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(b: &mut Vec<u8>, v: u32) {
        b.extend_from_slice(&v.to_le_bytes());
    }

    /// A minimal A4 font: 2 sheets of 16x8, glyphs 0..=2 for 'A'..='C'.
    fn font(preamble: usize) -> Vec<u8> {
        let mut b = vec![0xEE; preamble];

        b.extend_from_slice(b"CFNT");
        push_u16(&mut b, 0xFEFF);
        push_u16(&mut b, 0x14);
        push_u32(&mut b, 0x0300_0000);
        push_u32(&mut b, 0);
        push_u32(&mut b, 4);

        // FINF with 4 trailing bytes; section addresses patched below.
        let finf = b.len();
        b.extend_from_slice(b"FINF");
        push_u32(&mut b, 0x24);
        b.extend_from_slice(&[1, 12]);
        push_u16(&mut b, 2);
        b.extend_from_slice(&[0, 8, 9]);
        b.push(1);
        b.extend_from_slice(&[0; 12]);
        b.extend_from_slice(&[10, 9, 8, 0]);
        b.extend_from_slice(&[0xAA; 4]);

        let tglp = b.len();
        b.extend_from_slice(b"TGLP");
        push_u32(&mut b, 0x20);
        b.extend_from_slice(&[8, 8, 7, 8]);
        push_u32(&mut b, 64);
        push_u16(&mut b, 2);
        push_u16(&mut b, 11);
        push_u16(&mut b, 2);
        push_u16(&mut b, 1);
        push_u16(&mut b, 16);
        push_u16(&mut b, 8);
        let sheet_ptr = b.len();
        push_u32(&mut b, 0);

        let cwdh = b.len();
        b.extend_from_slice(b"CWDH");
        push_u32(&mut b, 0x1C);
        push_u16(&mut b, 0);
        push_u16(&mut b, 2);
        push_u32(&mut b, 0);
        b.extend_from_slice(&[0, 5, 6, 1, 6, 7, 2, 7, 8, 0, 0, 0]);

        let cmap = b.len();
        b.extend_from_slice(b"CMAP");
        push_u32(&mut b, 0x18);
        push_u16(&mut b, 0x41);
        push_u16(&mut b, 0x43);
        push_u16(&mut b, 0);
        push_u16(&mut b, 0);
        push_u32(&mut b, 0);
        push_u16(&mut b, 0);
        push_u16(&mut b, 0);

        let sheets = b.len();
        b.extend(std::iter::repeat_n(0x11, 64));
        b.extend(std::iter::repeat_n(0x22, 64));

        // Section pointers address the data just past each magic and size.
        let addr = |pos: usize| BASE + pos as u32;
        b[finf + 0x10..finf + 0x14].copy_from_slice(&addr(tglp + 8).to_le_bytes());
        b[finf + 0x14..finf + 0x18].copy_from_slice(&addr(cwdh + 8).to_le_bytes());
        b[finf + 0x18..finf + 0x1C].copy_from_slice(&addr(cmap + 8).to_le_bytes());
        b[sheet_ptr..sheet_ptr + 4].copy_from_slice(&addr(sheets).to_le_bytes());
        b
    }

    fn options(preamble_len: u64) -> DecodeOptions {
        DecodeOptions {
            preamble_len,
            base_address: BASE,
        }
    }

    #[test]
    fn decodes_every_section_in_order() {
        let raw = font(0);
        let f = Bcfnt::parse(&mut Cursor::new(&raw), &options(0)).unwrap();
        assert_eq!(f.info.offset, 0x14);
        assert_eq!(f.info.unknown_bytes(), 4);
        assert_eq!(f.glyphs.offset, 0x14 + 0x24);
        assert_eq!(f.widths.offset, f.glyphs.end());
        assert_eq!(f.code_maps.len(), 1);
        assert_eq!(f.code_maps[0].offset, f.widths.end());
        assert_eq!(
            f.resolver.resolve(f.info.tglp_offset).unwrap() as u64,
            f.glyphs.offset + 8
        );
    }

    #[test]
    fn lookups_fall_back_to_font_defaults() {
        let raw = font(0);
        let f = Bcfnt::parse(&mut Cursor::new(&raw), &options(0)).unwrap();
        assert_eq!(f.glyph_index(0x42), Some(1));
        assert_eq!(f.glyph_index_for_char('C'), Some(2));
        assert_eq!(f.glyph_index_for_char('\u{1F600}'), None);
        assert_eq!(f.glyph_index_or_alternate(0x5A), 2);
        assert_eq!(f.width_of(1).char_width, 7);
        assert_eq!(
            f.width_of(40),
            WidthEntry {
                left: 0,
                glyph_width: 8,
                char_width: 9
            }
        );
    }

    #[test]
    fn preamble_is_skipped_and_addresses_stay_blob_relative() {
        let raw = font(0x80);
        let mut reader = BcfntReader::new(Cursor::new(raw), &options(0x80)).unwrap();
        assert_eq!(reader.font.info.offset, 0x80 + 0x14);
        let sheets = reader.read_sheets().unwrap();
        assert_eq!(sheets.len(), 2);
        assert!(sheets[0].iter().all(|&b| b == 0x11));
        assert!(sheets[1].iter().all(|&b| b == 0x22));
    }

    #[test]
    fn sheets_are_consecutive_and_bounded() {
        let raw = font(0);
        let mut reader = BcfntReader::new(Cursor::new(raw), &options(0)).unwrap();
        let first = reader.font.sheet_offset(0).unwrap();
        assert_eq!(reader.font.sheet_offset(1).unwrap(), first + 64);

        let mut buf = Vec::new();
        reader.sheet(1).unwrap().read_to_end(&mut buf).unwrap();
        assert_eq!(buf, vec![0x22; 64]);
        assert!(matches!(reader.read_sheet(2), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn missing_sheet_data_is_truncated_input() {
        let mut raw = font(0);
        raw.truncate(raw.len() - 10);
        let mut reader = BcfntReader::new(Cursor::new(raw), &options(0)).unwrap();
        assert!(reader.read_sheet(0).is_ok());
        assert!(matches!(reader.read_sheet(1), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn streaming_a_short_sheet_fails_up_front() {
        let mut raw = font(0);
        raw.truncate(raw.len() - 10);
        let mut reader = BcfntReader::new(Cursor::new(raw), &options(0)).unwrap();
        assert!(reader.sheet(0).is_ok());
        assert!(matches!(reader.sheet(1), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn oversized_preamble_is_a_range_error() {
        let raw = font(0);
        let mut c = Cursor::new(&raw);
        c.set_position(1);
        let opts = DecodeOptions {
            preamble_len: u64::MAX,
            base_address: BASE,
        };
        assert!(matches!(
            Bcfnt::parse(&mut c, &opts),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn unresolvable_section_pointer_aborts() {
        let raw = font(0);
        let opts = DecodeOptions {
            preamble_len: 0,
            base_address: BASE + 0x1000,
        };
        assert!(matches!(
            Bcfnt::parse(&mut Cursor::new(&raw), &opts),
            Err(Error::UnresolvableAddress { .. })
        ));
    }

    #[test]
    fn wrong_preamble_fails_on_magic() {
        let raw = font(0x80);
        assert!(matches!(
            Bcfnt::parse(&mut Cursor::new(&raw), &options(0)),
            Err(Error::BadMagic { .. })
        ));
    }
}
