//! Absolute-address resolution.
//!
//! FINF and TGLP store pointers as runtime addresses inside the memory
//! region the font blob is mapped at, not as file offsets. Subtracting the
//! mapping base turns them back into offsets from the start of the blob.
//! An address of `0` means "no reference" and resolves to `0`.

use crate::{Error, Result};

/// Address the system maps the shared font blob at.
pub const SHARED_FONT_BASE: u32 = 0x1800_0000;

/// Converts absolute addresses embedded in a font to blob-relative offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressResolver {
    base: u32,
}

impl AddressResolver {
    /// Create a resolver for a blob mapped at `base`.
    pub const fn new(base: u32) -> Self {
        Self { base }
    }

    /// The mapping base this resolver subtracts.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Resolve `address` to a blob-relative offset.
    ///
    /// Returns [`Error::UnresolvableAddress`] if `address` is non-zero and
    /// below the base.
    pub fn resolve(&self, address: u32) -> Result<u32> {
        if address == 0 {
            return Ok(0);
        }
        address
            .checked_sub(self.base)
            .ok_or(Error::UnresolvableAddress {
                address,
                base: self.base,
            })
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new(SHARED_FONT_BASE)
    }
}
