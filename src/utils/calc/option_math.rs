//! Option breakeven

use crate::common::error::{QuoteError, QuoteResult};
use crate::utils::calc::wad::Wad;

/// Spot price at which an option bought at `price` breaks even.
///
/// `price` is per contract; unless `is_fully_denominated` it is a fraction of
/// spot (calls) or strike (puts). Put premium is paid in the quote token, so
/// the put breakeven is linear. Call premium is paid in the base token, whose
/// value moves with spot, so the breakeven solves
/// `strike + p - p * (strike + p - spot) / (p - spot)`.
pub fn breakeven_price(
    strike: Wad,
    is_call: bool,
    price: Wad,
    spot_price_at_purchase: Wad,
    is_fully_denominated: bool,
) -> QuoteResult<Wad> {
    let full_price = if is_fully_denominated {
        price
    } else if is_call {
        price.mul(spot_price_at_purchase)?
    } else {
        price.mul(strike)?
    };

    if !is_call {
        return Ok(strike.checked_sub(full_price)?);
    }

    let denominator = full_price.checked_sub(spot_price_at_purchase)?;
    if denominator.is_zero() {
        return Err(QuoteError::Singular("call premium equals spot price"));
    }
    let numerator = strike.checked_add(full_price)?.checked_sub(spot_price_at_purchase)?;
    let adjustment = full_price.mul_div(numerator, denominator)?;

    Ok(strike.checked_add(full_price)?.checked_sub(adjustment)?)
}
