//! Parsers for the sections of a BCFNT font.
//!
//! All parsers follow the same conventions:
//!
//! * **Generic over** [`std::io::Read`] + [`std::io::Seek`] - pass a
//!   [`std::fs::File`], a [`std::io::Cursor`], or anything else that
//!   implements both traits.
//! * **Start offset recorded** - every section struct keeps the stream
//!   offset of its magic in `offset`, and `end()` gives the offset of the
//!   next section regardless of undocumented trailing bytes.
//! * **Validate up front** - magic, declared size and every discriminant are
//!   checked before the section is returned. A failure is never patched up
//!   by a later section.
//! * **Sheet pixels are not eagerly loaded** - [`bcfnt::BcfntReader`] owns
//!   the reader and reads sheets on demand.
//!
//! ## Section overview
//!
//! | Module    | Section | Description |
//! |-----------|---------|-------------|
//! | [`cfnt`]  | CFNT    | Container header; magic variant, byte order, version |
//! | [`finf`]  | FINF    | Font-wide metrics and addresses of the other sections |
//! | [`tglp`]  | TGLP    | Glyph sheet layout and pixel format |
//! | [`cwdh`]  | CWDH    | Per-glyph left bearing, glyph width and advance |
//! | [`cmap`]  | CMAP    | Chained code point to glyph index maps |
//! | [`bcfnt`] | -       | Whole-font decode session |

pub mod bcfnt;
pub mod cfnt;
pub mod cmap;
pub mod cwdh;
pub mod finf;
pub mod tglp;
