//! CFNT - BCFNT container header.
//!
//! ## Layout (0x14 bytes)
//! ```text
//! [0x00] Magic "CFNT" / "CFNU" / "FFNT"  (4 bytes)
//! [0x04] Endianness (0xFEFF)             (u16 LE)
//! [0x06] HeaderSize (0x14)               (u16 LE)
//! [0x08] Version (0x03000000)            (u32 LE)
//! [0x0C] FileSize                        (u32 LE)
//! [0x10] NumBlocks                       (u32 LE)
//! ```
//!
//! The three magics are variants of one layout: `CFNT` for standalone font
//! files, `CFNU` for the shared system font once relocated in memory, and
//! `FFNT` for the Wii U flavour.

use std::io::{Read, Seek};

use crate::utils::{le_u16, le_u32, magic_any};
use crate::{Error, Result};

/// Size of the container header in bytes.
pub const HEADER_SIZE: u16 = 0x14;
/// Byte-order mark of a little-endian container.
pub const ENDIANNESS_LE: u16 = 0xFEFF;
/// The only supported container version.
pub const VERSION_3: u32 = 0x0300_0000;

const MAGICS: [&[u8; 4]; 3] = [b"CFNT", b"CFNU", b"FFNT"];

/// Which of the accepted container magics a font carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfntVariant {
    /// Standalone font file.
    Cfnt,
    /// Shared system font, relocated in memory.
    Cfnu,
    /// Wii U font.
    Ffnt,
}

impl CfntVariant {
    /// The four magic bytes of this variant.
    pub fn magic(self) -> &'static [u8; 4] {
        match self {
            CfntVariant::Cfnt => MAGICS[0],
            CfntVariant::Cfnu => MAGICS[1],
            CfntVariant::Ffnt => MAGICS[2],
        }
    }
}

/// Parsed container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cfnt {
    /// Magic the container was opened with.
    pub variant: CfntVariant,
    /// Byte-order mark, always [`ENDIANNESS_LE`].
    pub endianness: u16,
    /// Always [`HEADER_SIZE`].
    pub header_size: u16,
    /// Always [`VERSION_3`].
    pub version: u32,
    /// Total size of the font in bytes, as declared.
    pub file_size: u32,
    /// Number of sections (blocks) following the header.
    pub num_blocks: u32,
}

impl Cfnt {
    /// Parse the container header at the current position of `r`.
    ///
    /// Fails with [`Error::BadMagic`] or [`Error::InvalidFormat`] on a bad
    /// magic, byte-order mark or header size, and with
    /// [`Error::UnsupportedVersion`] for anything but version 3.
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let variant = match magic_any(r, &MAGICS)? {
            0 => CfntVariant::Cfnt,
            1 => CfntVariant::Cfnu,
            _ => CfntVariant::Ffnt,
        };

        let endianness = le_u16(r)?;
        if endianness != ENDIANNESS_LE {
            return Err(Error::InvalidFormat("unsupported byte-order mark"));
        }
        let header_size = le_u16(r)?;
        if header_size != HEADER_SIZE {
            return Err(Error::InvalidFormat("unexpected CFNT header size"));
        }
        let version = le_u32(r)?;
        if version != VERSION_3 {
            return Err(Error::UnsupportedVersion(version));
        }
        let file_size = le_u32(r)?;
        let num_blocks = le_u32(r)?;

        Ok(Self {
            variant,
            endianness,
            header_size,
            version,
            file_size,
            num_blocks,
        })
    }

    /// Re-encode the header into its 20-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE as usize] {
        let mut out = [0u8; HEADER_SIZE as usize];
        out[0x00..0x04].copy_from_slice(self.variant.magic());
        out[0x04..0x06].copy_from_slice(&self.endianness.to_le_bytes());
        out[0x06..0x08].copy_from_slice(&self.header_size.to_le_bytes());
        out[0x08..0x0C].copy_from_slice(&self.version.to_le_bytes());
        out[0x0C..0x10].copy_from_slice(&self.file_size.to_le_bytes());
        out[0x10..0x14].copy_from_slice(&self.num_blocks.to_le_bytes());
        out
    }
}
