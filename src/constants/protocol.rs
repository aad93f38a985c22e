//! Protocol constants
//!
//! Every percentage is a WAD fraction: 0.3% is `0.003 * 10^18`.

use alloy_primitives::Address;

use crate::utils::calc::wad::Wad;

/// Minimum price granularity of a range order (0.001).
pub const MIN_TICK_DISTANCE: Wad = Wad::from_raw(1_000_000_000_000_000);

/// Lowest valid tick price (0.001).
pub const MIN_TICK_PRICE: Wad = Wad::from_raw(1_000_000_000_000_000);

/// Highest valid tick price (1.0).
pub const MAX_TICK_PRICE: Wad = Wad::ONE;

/// AMM fee charged on notional size (0.3%).
pub const NOTIONAL_FEE_PERCENT: Wad = Wad::from_raw(3_000_000_000_000_000);

/// AMM fee charged on premium (3%).
pub const PREMIUM_FEE_PERCENT: Wad = Wad::from_raw(30_000_000_000_000_000);

/// Fee cap as a share of premium (12.5%).
pub const MAX_PREMIUM_FEE_PERCENT: Wad = Wad::from_raw(125_000_000_000_000_000);

/// Order-book fee charged on notional size (0.08%).
pub const ORDERBOOK_NOTIONAL_FEE_PERCENT: Wad = Wad::from_raw(800_000_000_000_000);

/// Format tag written into the top nibble of position token ids.
pub const TOKEN_ID_VERSION: u8 = 1;

/// Valid range widths, in multiples of `MIN_TICK_DISTANCE`.
///
/// Every entry is `2^n * 5^m`, so dividing by a width always terminates in
/// decimal.
pub const VALID_RANGE_WIDTHS: [u16; 28] = [
    1, 2, 4, 5, 8, 10, 16, 20, 25, 32, 40, 50, 64, 80, 100, 125, 128, 160, 200, 250, 256, 320,
    400, 500, 512, 625, 640, 800,
];

pub const ZERO_ADDRESS: Address = Address::ZERO;
