//! Human-readable dump of a decoded font.
//!
//! Every scalar field is printed with its decimal and zero-padded hex value;
//! address fields are printed raw together with the file offset they
//! resolve to.
//!
//! ```text
//! FINF @ 0x00000094
//!   section_size = 32 (0x00000020)
//!   line_feed = 30 (0x1E)
//!   tglp_offset = 0x180000B4 (file offset 0x000000B4)
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::address::AddressResolver;
use crate::formats::bcfnt::Bcfnt;
use crate::formats::cmap::{Cmap, CodeMapping};
use crate::formats::cwdh::{Cwdh, WidthEntry};
use crate::formats::finf::Finf;
use crate::formats::tglp::Tglp;
use crate::unicode::block_name;

/// A scalar header field, tagged with its on-disk width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    U8(u8),
    U16(u16),
    U32(u32),
}

impl From<u8> for Field {
    fn from(v: u8) -> Self {
        Field::U8(v)
    }
}

impl From<u16> for Field {
    fn from(v: u16) -> Self {
        Field::U16(v)
    }
}

impl From<u32> for Field {
    fn from(v: u32) -> Self {
        Field::U32(v)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Field::U8(v) => write!(f, "{v} (0x{v:02X})"),
            Field::U16(v) => write!(f, "{v} (0x{v:04X})"),
            Field::U32(v) => write!(f, "{v} (0x{v:08X})"),
        }
    }
}

/// Format one scalar field line.
pub fn field_line(label: &str, value: impl Into<Field>) -> String {
    format!("{label} = {}", value.into())
}

/// Format one address field line with its resolved file offset.
pub fn address_line(label: &str, address: u32, resolver: &AddressResolver) -> String {
    match resolver.resolve(address) {
        Ok(offset) => format!("{label} = 0x{address:08X} (file offset 0x{offset:08X})"),
        Err(_) => format!("{label} = 0x{address:08X} (below base 0x{:08X})", resolver.base()),
    }
}

fn width_text(w: &WidthEntry) -> String {
    format!(
        "left {}, glyph {}, advance {}",
        w.left, w.glyph_width, w.char_width
    )
}

/// Write the full dump of `font` to `w`.
pub fn write_report<W: Write>(w: &mut W, font: &Bcfnt) -> io::Result<()> {
    let h = &font.header;
    writeln!(w, "{}", String::from_utf8_lossy(h.variant.magic()))?;
    writeln!(w, "  {}", field_line("endianness", h.endianness))?;
    writeln!(w, "  {}", field_line("header_size", h.header_size))?;
    writeln!(w, "  {}", field_line("version", h.version))?;
    writeln!(w, "  {}", field_line("file_size", h.file_size))?;
    writeln!(w, "  {}", field_line("num_blocks", h.num_blocks))?;

    write_finf(w, &font.info, &font.resolver)?;
    write_tglp(w, &font.glyphs, &font.resolver)?;
    write_cwdh(w, &font.widths)?;
    for cmap in &font.code_maps {
        write_cmap(w, cmap, &font.resolver)?;
    }
    Ok(())
}

fn write_finf<W: Write>(w: &mut W, finf: &Finf, resolver: &AddressResolver) -> io::Result<()> {
    writeln!(w, "FINF @ 0x{:08X}", finf.offset)?;
    writeln!(w, "  {}", field_line("section_size", finf.section_size))?;
    writeln!(w, "  {}", field_line("font_type", finf.font_type))?;
    writeln!(w, "  {}", field_line("line_feed", finf.line_feed))?;
    writeln!(w, "  {}", field_line("alter_char_index", finf.alter_char_index))?;
    writeln!(w, "  default_width = {}", width_text(&finf.default_width))?;
    writeln!(w, "  {}", field_line("encoding", finf.encoding))?;
    writeln!(w, "  {}", address_line("tglp_offset", finf.tglp_offset, resolver))?;
    writeln!(w, "  {}", address_line("cwdh_offset", finf.cwdh_offset, resolver))?;
    writeln!(w, "  {}", address_line("cmap_offset", finf.cmap_offset, resolver))?;
    writeln!(w, "  {}", field_line("height", finf.height))?;
    writeln!(w, "  {}", field_line("width", finf.width))?;
    writeln!(w, "  {}", field_line("ascent", finf.ascent))?;
    writeln!(w, "  {}", field_line("reserved", finf.reserved))?;
    writeln!(w, "  {} unknown bytes", finf.unknown_bytes())
}

fn write_tglp<W: Write>(w: &mut W, tglp: &Tglp, resolver: &AddressResolver) -> io::Result<()> {
    writeln!(w, "TGLP @ 0x{:08X}", tglp.offset)?;
    writeln!(w, "  {}", field_line("section_size", tglp.section_size))?;
    writeln!(w, "  {}", field_line("cell_width", tglp.cell_width))?;
    writeln!(w, "  {}", field_line("cell_height", tglp.cell_height))?;
    writeln!(w, "  {}", field_line("baseline_position", tglp.baseline_position))?;
    writeln!(w, "  {}", field_line("max_character_width", tglp.max_character_width))?;
    writeln!(w, "  {}", field_line("sheet_size", tglp.sheet_size))?;
    writeln!(w, "  {}", field_line("num_sheets", tglp.num_sheets))?;
    writeln!(
        w,
        "  {} {:?}",
        field_line("sheet_image_format", tglp.sheet_image_format),
        tglp.format
    )?;
    writeln!(w, "  {}", field_line("num_columns", tglp.num_columns))?;
    writeln!(w, "  {}", field_line("num_rows", tglp.num_rows))?;
    writeln!(w, "  {}", field_line("sheet_width", tglp.sheet_width))?;
    writeln!(w, "  {}", field_line("sheet_height", tglp.sheet_height))?;
    writeln!(
        w,
        "  {}",
        address_line("sheet_data_offset", tglp.sheet_data_offset, resolver)
    )?;
    if !tglp.sheet_size_matches() {
        writeln!(
            w,
            "  sheet_size disagrees with format: {} bytes per sheet used",
            tglp.sheet_bytes()
        )?;
    }
    writeln!(w, "  {} unknown bytes", tglp.unknown_bytes())
}

fn write_cwdh<W: Write>(w: &mut W, cwdh: &Cwdh) -> io::Result<()> {
    writeln!(w, "CWDH @ 0x{:08X}", cwdh.offset)?;
    writeln!(w, "  {}", field_line("section_size", cwdh.section_size))?;
    writeln!(w, "  {}", field_line("start_index", cwdh.start_index))?;
    writeln!(w, "  {}", field_line("end_index", cwdh.end_index))?;
    writeln!(w, "  {}", field_line("next_cwdh_offset", cwdh.next_offset))?;
    writeln!(w, "  {} unknown bytes", cwdh.unknown_bytes())?;
    writeln!(w, "  widths {}..={}", cwdh.start_index, cwdh.end_index)?;
    for (index, entry) in cwdh.iter() {
        writeln!(w, "    {index}: {}", width_text(entry))?;
    }
    Ok(())
}

fn write_cmap<W: Write>(w: &mut W, cmap: &Cmap, resolver: &AddressResolver) -> io::Result<()> {
    writeln!(w, "CMAP @ 0x{:08X}", cmap.offset)?;
    writeln!(w, "  {}", field_line("section_size", cmap.section_size))?;
    writeln!(w, "  {}", field_line("code_begin", cmap.code_begin))?;
    writeln!(w, "  {}", field_line("code_end", cmap.code_end))?;
    writeln!(w, "  {}", field_line("mapping_method", cmap.mapping_method))?;
    writeln!(w, "  {}", field_line("reserved", cmap.reserved))?;
    // Printed for reference only; the chain is walked by section size.
    writeln!(
        w,
        "  {}",
        address_line("next_cmap_offset", cmap.next_offset, resolver)
    )?;
    writeln!(w, "  {} unknown bytes", cmap.unknown_bytes())?;
    match &cmap.mapping {
        CodeMapping::Direct { base } => writeln!(
            w,
            "  Direct 0x{:04X}..=0x{:04X} from glyph {base}",
            cmap.code_begin, cmap.code_end
        )?,
        CodeMapping::Table(_) => writeln!(
            w,
            "  Table 0x{:04X}..=0x{:04X}",
            cmap.code_begin, cmap.code_end
        )?,
        CodeMapping::Scan(pairs) => writeln!(w, "  Scan, {} pairs", pairs.len())?,
    }
    for (code, index) in cmap.mappings() {
        writeln!(w, "    0x{code:04X} -> {index} ({})", block_name(code))?;
    }
    Ok(())
}
