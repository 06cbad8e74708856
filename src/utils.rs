//! Record reads and repositioning for the BCFNT section parsers.
//!
//! Every section is a fixed little-endian header followed by a variable
//! payload, and the next section starts at `start + SectionSize` no matter
//! how much of the payload was understood. The helpers here cover exactly
//! that: fixed-size records that are read in full or fail with
//! [`Error::UnexpectedEof`], four-byte section tags, and the seek to the end
//! of a section.

use std::io::{Read, Seek, SeekFrom};

use crate::{Error, Result};

/// Read one byte.
#[inline]
pub(crate) fn u8<R: Read>(r: &mut R) -> Result<u8> {
    let [b] = bytesa::<1>(r)?;
    Ok(b)
}

/// Read one signed byte.
#[inline]
pub(crate) fn i8<R: Read>(r: &mut R) -> Result<i8> {
    Ok(u8(r)? as i8)
}

/// Read a little-endian `u16`.
#[inline]
pub(crate) fn le_u16<R: Read>(r: &mut R) -> Result<u16> {
    bytesa(r).map(u16::from_le_bytes)
}

/// Read a little-endian `u32`.
#[inline]
pub(crate) fn le_u32<R: Read>(r: &mut R) -> Result<u32> {
    bytesa(r).map(u32::from_le_bytes)
}

/// Read one fixed-size record.
#[inline]
pub(crate) fn bytesa<const N: usize>(r: &mut impl Read) -> Result<[u8; N]> {
    let mut record = [0u8; N];
    r.read_exact(&mut record)?;
    Ok(record)
}

/// Read a record whose length is only known at run time, such as a sheet.
#[inline]
pub(crate) fn bytesv<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut record = vec![0u8; len];
    r.read_exact(&mut record)?;
    Ok(record)
}

/// Verify that the next four bytes in the stream match `expected`.
///
/// Returns [`Error::BadMagic`] on mismatch.
#[inline]
pub(crate) fn magic<R: Read>(r: &mut R, expected: &'static [u8; 4]) -> Result<()> {
    let found = bytesa::<4>(r)?;
    if &found != expected {
        return Err(Error::BadMagic {
            expected: tag_name(expected),
            found,
        });
    }
    Ok(())
}

/// Read a four-byte magic and return the index of the tag it matches.
///
/// Returns [`Error::BadMagic`] (naming the first candidate) if none match.
pub(crate) fn magic_any<R: Read>(r: &mut R, candidates: &[&'static [u8; 4]]) -> Result<usize> {
    let found = bytesa::<4>(r)?;
    candidates
        .iter()
        .position(|c| **c == found)
        .ok_or(Error::BadMagic {
            expected: candidates.first().map_or("", |c| tag_name(*c)),
            found,
        })
}

/// Seek to an absolute stream offset.
#[inline]
pub(crate) fn seek_to<S: Seek>(s: &mut S, offset: u64) -> Result<()> {
    s.seek(SeekFrom::Start(offset))?;
    Ok(())
}

/// Reposition just past a section that began at `start` and declared
/// `section_size` bytes, skipping any undocumented trailing bytes.
#[inline]
pub(crate) fn seek_section_end<S: Seek>(s: &mut S, start: u64, section_size: u32) -> Result<()> {
    seek_to(s, start + section_size as u64)
}

/// Reject a section whose declared size cannot hold its fixed header.
#[inline]
pub(crate) fn check_section_size(
    section_size: u32,
    header_size: u32,
    what: &'static str,
) -> Result<()> {
    if section_size < header_size {
        return Err(Error::InvalidFormat(what));
    }
    Ok(())
}

fn tag_name(tag: &'static [u8; 4]) -> &'static str {
    std::str::from_utf8(tag).unwrap_or("????")
}
