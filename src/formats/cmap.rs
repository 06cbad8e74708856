//! CMAP - code point to glyph index map.
//!
//! A font carries a chain of CMAP sections, each covering one code range
//! with one of three encodings. The chain is walked in file order: every
//! section is followed directly by the next, and a section whose
//! `NextCmapOffset` is zero ends the chain.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "CMAP"                (4 bytes)
//! [0x04] SectionSize                 (u32 LE)
//! [0x08] CodeBegin                   (u16 LE)
//! [0x0A] CodeEnd                     (u16 LE)
//! [0x0C] MappingMethod               (u16 LE)
//! [0x0E] Reserved                    (u16 LE)
//! [0x10] NextCmapOffset              (u32 LE)
//! [0x14] Mapping data                (see below)
//! ```
//!
//! ## Mapping data
//! * **Direct (0)** - one `u16` base index; code `c` maps to
//!   `base + (c - CodeBegin)`.
//! * **Table (1)** - one `u16` index per code in `CodeBegin..=CodeEnd`.
//! * **Scan (2)** - a `u16` count followed by that many `(code, index)`
//!   `u16` pairs. Only valid for the full `0x0000..=0xFFFF` range.

use std::io::{Read, Seek};

use log::{debug, trace};

use crate::utils::{check_section_size, le_u16, le_u32, magic, seek_section_end};
use crate::{Error, Result};

/// Size of the fixed CMAP header in bytes.
pub const HEADER_SIZE: u32 = 0x14;

/// On-disk mapping method discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMethod {
    Direct,
    Table,
    Scan,
}

impl MappingMethod {
    /// Map the on-disk discriminant to a method.
    ///
    /// Returns [`Error::UnknownMappingMethod`] for anything but 0, 1 or 2.
    pub fn from_raw(raw: u16) -> Result<Self> {
        match raw {
            0 => Ok(MappingMethod::Direct),
            1 => Ok(MappingMethod::Table),
            2 => Ok(MappingMethod::Scan),
            _ => Err(Error::UnknownMappingMethod(raw)),
        }
    }
}

/// One explicit pair from a Scan mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEntry {
    pub code: u16,
    pub index: u16,
}

/// Decoded mapping data of one CMAP section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeMapping {
    /// Consecutive codes map to consecutive glyphs starting at `base`.
    Direct { base: u16 },
    /// Glyph index of every code in range, in code order.
    Table(Vec<u16>),
    /// Sparse pairs in file order. Not sorted and not exhaustive.
    Scan(Vec<ScanEntry>),
}

/// Parsed CMAP section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmap {
    /// Absolute stream offset of the section magic.
    pub offset: u64,
    pub section_size: u32,
    /// First code point covered.
    pub code_begin: u16,
    /// Last code point covered, inclusive.
    pub code_end: u16,
    /// Raw [`MappingMethod`] value.
    pub mapping_method: u16,
    pub reserved: u16,
    /// Address of the next section's data; zero on the last section of the
    /// chain.
    pub next_offset: u32,
    pub mapping: CodeMapping,
}

impl Cmap {
    /// Parse one CMAP section and its mapping data at the current position
    /// of `r`.
    ///
    /// Leaves `r` just past the mapping data; callers resume at
    /// [`Cmap::end`].
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let offset = r.stream_position()?;

        magic(r, b"CMAP")?;
        let section_size = le_u32(r)?;
        check_section_size(section_size, HEADER_SIZE, "CMAP section smaller than its header")?;

        let code_begin = le_u16(r)?;
        let code_end = le_u16(r)?;
        let mapping_method = le_u16(r)?;
        let reserved = le_u16(r)?;
        let next_offset = le_u32(r)?;

        if code_begin > code_end {
            return Err(Error::InvalidRange("CMAP code begin exceeds code end"));
        }

        let mapping = match MappingMethod::from_raw(mapping_method)? {
            MappingMethod::Direct => CodeMapping::Direct { base: le_u16(r)? },
            MappingMethod::Table => {
                let count = (code_end - code_begin) as usize + 1;
                let mut indices = Vec::with_capacity(count);
                for _ in 0..count {
                    indices.push(le_u16(r)?);
                }
                CodeMapping::Table(indices)
            }
            MappingMethod::Scan => {
                if code_begin != 0x0000 || code_end != 0xFFFF {
                    return Err(Error::InvalidFormat(
                        "scan mapping must cover 0x0000..=0xFFFF",
                    ));
                }
                let count = le_u16(r)?;
                let mut pairs = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let code = le_u16(r)?;
                    let index = le_u16(r)?;
                    pairs.push(ScanEntry { code, index });
                }
                CodeMapping::Scan(pairs)
            }
        };

        if r.stream_position()? > offset + section_size as u64 {
            return Err(Error::InvalidFormat("CMAP entries overrun the section"));
        }

        Ok(Self {
            offset,
            section_size,
            code_begin,
            code_end,
            mapping_method,
            reserved,
            next_offset,
            mapping,
        })
    }

    /// Stream offset just past this section.
    pub fn end(&self) -> u64 {
        self.offset + self.section_size as u64
    }

    /// Bytes of mapping data following the header.
    pub fn payload_size(&self) -> u32 {
        match &self.mapping {
            CodeMapping::Direct { .. } => 2,
            CodeMapping::Table(indices) => indices.len() as u32 * 2,
            CodeMapping::Scan(pairs) => 2 + pairs.len() as u32 * 4,
        }
    }

    /// Bytes in the section beyond the header and mapping data.
    pub fn unknown_bytes(&self) -> u32 {
        self.section_size - HEADER_SIZE - self.payload_size()
    }

    pub fn method(&self) -> MappingMethod {
        match self.mapping {
            CodeMapping::Direct { .. } => MappingMethod::Direct,
            CodeMapping::Table(_) => MappingMethod::Table,
            CodeMapping::Scan(_) => MappingMethod::Scan,
        }
    }

    /// Whether `code` falls inside this section's declared range.
    pub fn contains(&self, code: u16) -> bool {
        (self.code_begin..=self.code_end).contains(&code)
    }

    /// Glyph index of `code` according to this section alone.
    ///
    /// Returns [`None`] if the code is outside the range or, for Scan
    /// sections, has no explicit pair.
    pub fn glyph_index(&self, code: u16) -> Option<u16> {
        if !self.contains(code) {
            return None;
        }
        let rel = code - self.code_begin;
        match &self.mapping {
            CodeMapping::Direct { base } => Some(base.wrapping_add(rel)),
            CodeMapping::Table(indices) => indices.get(rel as usize).copied(),
            CodeMapping::Scan(pairs) => pairs.iter().find(|p| p.code == code).map(|p| p.index),
        }
    }

    /// Every `(code, glyph_index)` pair this section defines, in file order.
    pub fn mappings(&self) -> Vec<(u16, u16)> {
        match &self.mapping {
            CodeMapping::Direct { base } => (self.code_begin..=self.code_end)
                .map(|c| (c, base.wrapping_add(c - self.code_begin)))
                .collect(),
            CodeMapping::Table(indices) => (self.code_begin..=self.code_end)
                .zip(indices.iter().copied())
                .collect(),
            CodeMapping::Scan(pairs) => pairs.iter().map(|p| (p.code, p.index)).collect(),
        }
    }
}

/// Walk the CMAP chain starting at the current position of `r`.
///
/// Each section is parsed, then `r` is moved to `start + section_size`; the
/// walk stops after the first section whose next offset is zero. Any
/// malformed section aborts the whole walk.
pub fn parse_chain<R: Read + Seek>(r: &mut R) -> Result<Vec<Cmap>> {
    let mut chain = Vec::new();
    loop {
        let cmap = Cmap::parse(r)?;
        trace!(
            "CMAP at 0x{:X}: {:?} 0x{:04X}..=0x{:04X}",
            cmap.offset,
            cmap.method(),
            cmap.code_begin,
            cmap.code_end
        );
        seek_section_end(r, cmap.offset, cmap.section_size)?;
        let last = cmap.next_offset == 0;
        chain.push(cmap);
        if last {
            break;
        }
    }
    debug!("CMAP chain: {} segments", chain.len());
    Ok(chain)
}

/// Glyph index of `code` across a whole chain.
///
/// Segments whose range contains the code are tried in file order and the
/// first mapping wins. An unmapped code is [`None`], never an error.
pub fn glyph_index(chain: &[Cmap], code: u16) -> Option<u16> {
    chain.iter().find_map(|cmap| cmap.glyph_index(code))
}
