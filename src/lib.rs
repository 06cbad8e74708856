//! **bcfnt** - a Rust library for parsing Nintendo 3DS BCFNT fonts.
//!
//! Decodes the container header and its FINF, TGLP, CWDH and CMAP sections,
//! resolves the absolute addresses embedded in them, maps code points to
//! glyph indices and extracts the raw glyph sheets.
//!
//! # Sections
//! | Module | Section |
//! |--------|---------|
//! | [`formats::cfnt`]  | CFNT / CFNU / FFNT - container header |
//! | [`formats::finf`]  | FINF - font information |
//! | [`formats::tglp`]  | TGLP - glyph sheet layout |
//! | [`formats::cwdh`]  | CWDH - character widths |
//! | [`formats::cmap`]  | CMAP - code point to glyph map chain |
//! | [`formats::bcfnt`] | whole-font decode and sheet access |
//!
//! ```no_run
//! use std::fs::File;
//!
//! use bcfnt::formats::bcfnt::{BcfntReader, DecodeOptions};
//!
//! # fn main() -> bcfnt::Result<()> {
//! let mut font = BcfntReader::new(File::open("font.bcfnt")?, &DecodeOptions::default())?;
//! let glyph = font.font.glyph_index_for_char('A');
//! let first_sheet = font.read_sheet(0)?;
//! # let _ = (glyph, first_sheet);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod dump;
pub mod error;
pub mod formats;
pub mod unicode;
pub(crate) mod utils;

pub use error::{Error, ErrorCategory, Result};
