//! Range-width lattice
//!
//! A range order's width must be one of [`VALID_RANGE_WIDTHS`] ticks. Snapping
//! keeps one bound fixed and moves the other so the width lands on the
//! closest valid entry.

use serde::{Deserialize, Serialize};

use crate::common::error::{QuoteError, QuoteResult};
use crate::common::market::RangeOrderType;
use crate::constants::protocol::{
    MAX_TICK_PRICE, MIN_TICK_DISTANCE, MIN_TICK_PRICE, VALID_RANGE_WIDTHS,
};
use crate::utils::calc::wad::{Wad, closest_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickRange {
    pub lower: Wad,
    pub upper: Wad,
}

impl TickRange {
    pub fn new(lower: Wad, upper: Wad) -> Self {
        Self { lower, upper }
    }

    /// Width in ticks, as a WAD multiplier (0.0034 wide is `3.4`).
    pub fn width_in_ticks(&self) -> QuoteResult<Wad> {
        Ok(self.upper.checked_sub(self.lower)?.div(MIN_TICK_DISTANCE)?)
    }

    /// Lattice membership plus the global price bounds.
    pub fn is_valid(&self) -> bool {
        if self.lower.is_negative() || self.lower >= self.upper || self.upper > MAX_TICK_PRICE {
            return false;
        }
        if !self.lower.is_multiple_of(MIN_TICK_DISTANCE) || !self.upper.is_multiple_of(MIN_TICK_DISTANCE) {
            return false;
        }
        match self.width_in_ticks() {
            Ok(width) => lattice_multipliers().any(|w| w == width),
            Err(_) => false,
        }
    }
}

/// The valid widths as WAD multipliers of `MIN_TICK_DISTANCE`.
pub fn lattice_multipliers() -> impl Iterator<Item = Wad> {
    VALID_RANGE_WIDTHS.iter().map(|w| Wad::from_int(i64::from(*w)))
}

fn width_price(index: usize) -> Wad {
    Wad::from_raw(MIN_TICK_DISTANCE.raw() * i128::from(VALID_RANGE_WIDTHS[index]))
}

/// Snaps `[lower, upper]` to the closest valid width.
///
/// `LongCollateral` keeps `upper` and recomputes `lower`; every other order
/// type keeps `lower` and recomputes `upper`. If the closest width pushes the
/// moving bound past `MIN_TICK_PRICE` / `MAX_TICK_PRICE`, the next smaller
/// width is tried once. A range that still does not fit is rejected.
pub fn snap_to_valid_range(lower: Wad, upper: Wad, order_type: RangeOrderType) -> QuoteResult<TickRange> {
    if lower.is_negative() {
        return Err(QuoteError::DomainRange(format!("lower bound {lower} is negative")));
    }
    if lower >= upper {
        return Err(QuoteError::DomainRange(format!("lower bound {lower} is not below upper bound {upper}")));
    }

    let anchor = if order_type.adjusts_lower() { upper } else { lower };
    if anchor > MAX_TICK_PRICE || !anchor.is_multiple_of(MIN_TICK_DISTANCE) {
        return Err(QuoteError::DomainRange(format!(
            "fixed bound {anchor} is not a tick in [0, {MAX_TICK_PRICE}]"
        )));
    }

    let requested = upper.checked_sub(lower)?.div(MIN_TICK_DISTANCE)?;
    let candidates: Vec<Wad> = lattice_multipliers().collect();
    let Some(mut index) = closest_index(requested, &candidates) else {
        return Err(QuoteError::DomainRange("no valid widths".to_string()));
    };

    let place = |index: usize| -> QuoteResult<(TickRange, bool)> {
        let width = width_price(index);
        if order_type.adjusts_lower() {
            let snapped = upper.checked_sub(width)?;
            Ok((TickRange::new(snapped, upper), snapped >= MIN_TICK_PRICE))
        } else {
            let snapped = lower.checked_add(width)?;
            Ok((TickRange::new(lower, snapped), snapped <= MAX_TICK_PRICE))
        }
    };

    let (range, fits) = place(index)?;
    if fits {
        return Ok(range);
    }
    if index == 0 {
        return Err(QuoteError::DomainRange(format!(
            "range [{lower}, {upper}] cannot hold the smallest valid width"
        )));
    }
    index -= 1;
    let (range, fits) = place(index)?;
    if fits {
        Ok(range)
    } else {
        Err(QuoteError::DomainRange(format!(
            "range [{lower}, {upper}] cannot be snapped inside [{MIN_TICK_PRICE}, {MAX_TICK_PRICE}]"
        )))
    }
}
