//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout bcfnt.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Every variant is fatal to the decode session that raised it; nothing is
/// salvaged from a partially decoded font.
#[derive(Debug, Error)]
pub enum Error {
    /// A section magic did not match the expected tag.
    #[error("bad magic: expected {expected:?}, found {:?}", String::from_utf8_lossy(.found))]
    BadMagic {
        expected: &'static str,
        found: [u8; 4],
    },
    /// The container version is not the supported 0x03000000.
    #[error("unsupported version: 0x{0:08X}")]
    UnsupportedVersion(u32),
    /// The stream ended before all expected bytes could be read.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// An index or offset would fall outside the valid region.
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),
    /// An embedded absolute address lies below the base address.
    #[error("address 0x{address:08X} is below base address 0x{base:08X}")]
    UnresolvableAddress { address: u32, base: u32 },
    /// A structural constraint was violated (message describes which one).
    #[error("invalid format: {0}")]
    InvalidFormat(&'static str),
    /// A code map declared a mapping method other than Direct, Table or Scan.
    #[error("unknown mapping method: {0}")]
    UnknownMappingMethod(u16),
    /// A glyph sheet declared a pixel format outside the 14 known values.
    #[error("unknown sheet image format: {0}")]
    UnknownSheetFormat(u16),
    /// An underlying I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[source] io::Error),
}

/// Coarse classification of an [`Error`], used to pick a report and an exit
/// status at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Magic, endianness, header size, section size, mapping method, scan
    /// range or pixel format violations.
    InvalidFormat,
    /// The container declares a version other than 3.
    UnsupportedVersion,
    /// The stream ended early.
    TruncatedInput,
    /// An index, offset or width range is out of bounds.
    InvalidRange,
    /// An absolute address could not be made file-relative.
    AddressResolution,
    /// Any other I/O failure.
    Io,
}

impl Error {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::BadMagic { .. }
            | Error::InvalidFormat(_)
            | Error::UnknownMappingMethod(_)
            | Error::UnknownSheetFormat(_) => ErrorCategory::InvalidFormat,
            Error::UnsupportedVersion(_) => ErrorCategory::UnsupportedVersion,
            Error::UnexpectedEof => ErrorCategory::TruncatedInput,
            Error::InvalidRange(_) => ErrorCategory::InvalidRange,
            Error::UnresolvableAddress { .. } => ErrorCategory::AddressResolution,
            Error::Io(_) => ErrorCategory::Io,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof
        } else {
            Error::Io(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_become_truncated_input() {
        let err = Error::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, Error::UnexpectedEof));
        assert_eq!(err.category(), ErrorCategory::TruncatedInput);
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err = Error::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn bad_magic_reports_both_tags() {
        let err = Error::BadMagic {
            expected: "FINF",
            found: *b"XXXX",
        };
        assert_eq!(err.category(), ErrorCategory::InvalidFormat);
        assert!(err.to_string().contains("FINF"));
    }
}
