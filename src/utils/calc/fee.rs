//! Taker fee model
//!
//! This is the local, possibly stale estimate. The quote engine asks the pool
//! for the authoritative fee first and only falls back to this formula when
//! that call fails (see `trading::fee`).

use crate::common::error::MathError;
use crate::constants::protocol::{
    MAX_PREMIUM_FEE_PERCENT, NOTIONAL_FEE_PERCENT, ORDERBOOK_NOTIONAL_FEE_PERCENT,
    PREMIUM_FEE_PERCENT,
};
use crate::utils::calc::wad::Wad;

/// Taker fee for a trade of `size` contracts paying `premium` in total.
///
/// Order-book trades pay `min(size * 0.08%, premium * 12.5%)`.
/// AMM trades pay `max(size * 0.3%, premium * 3%)`, capped at
/// `premium * 12.5%` (or uncapped beyond the size fee when premium is zero).
pub fn compute_taker_fee(size: Wad, premium: Wad, is_orderbook: bool) -> Result<Wad, MathError> {
    if is_orderbook {
        let notional_fee = size.mul(ORDERBOOK_NOTIONAL_FEE_PERCENT)?;
        let premium_cap = premium.mul(MAX_PREMIUM_FEE_PERCENT)?;
        return Ok(notional_fee.min(premium_cap));
    }

    let size_based = size.mul(NOTIONAL_FEE_PERCENT)?;
    let premium_based = premium.mul(PREMIUM_FEE_PERCENT)?;
    let cap = if premium.is_zero() { size_based } else { premium.mul(MAX_PREMIUM_FEE_PERCENT)? };

    Ok(size_based.max(premium_based).min(cap))
}
