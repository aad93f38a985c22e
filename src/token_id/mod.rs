//! Packed token identifiers
//!
//! Range-order positions and option positions are both identified by a
//! single 256-bit integer, but with unrelated layouts. Each kind gets its own
//! newtype so an id of one kind can never be decoded as the other.

pub mod option;
pub mod position;

pub use option::{OptionTokenFields, OptionTokenId, TokenType};
pub use position::{PositionKey, PositionTokenFields, PositionTokenId};

use crate::common::error::{QuoteError, QuoteResult};
use crate::utils::calc::U256;

/// `U256` with the lowest `bits` bits set.
pub(crate) fn low_mask(bits: usize) -> U256 {
    if bits >= 256 { U256::MAX } else { (U256::one() << bits) - U256::one() }
}

/// Extracts `bits` bits starting at `offset`.
pub(crate) fn field(id: U256, offset: usize, bits: usize) -> U256 {
    (id >> offset) & low_mask(bits)
}

/// Rejects `value` if it does not fit in `bits` bits.
pub(crate) fn ensure_fits(name: &'static str, value: U256, bits: usize) -> QuoteResult<()> {
    if value > low_mask(bits) {
        return Err(QuoteError::OutOfRange { field: name, value: value.to_string(), bits: bits as u32 });
    }
    Ok(())
}

pub(crate) fn invalid(id: U256, reason: impl Into<String>) -> QuoteError {
    QuoteError::InvalidTokenId { id: id.to_hex_string(), reason: reason.into() }
}
