//! Market-level value types shared by the codecs, the fee model and the
//! quote engine.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::utils::calc::wad::Wad;

/// Order type of a range-order position.
///
/// The discriminant is the 4-bit tag stored in position token ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RangeOrderType {
    /// Short collateral, premium kept as collateral.
    CollateralShortUsePremium = 0,
    /// Short collateral.
    CollateralShort = 1,
    /// Long options backed by collateral.
    LongCollateral = 2,
}

impl RangeOrderType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::CollateralShortUsePremium),
            1 => Some(Self::CollateralShort),
            2 => Some(Self::LongCollateral),
            _ => None,
        }
    }

    /// `LongCollateral` orders move their lower bound when snapped; every
    /// other order type moves the upper bound.
    pub fn adjusts_lower(self) -> bool {
        matches!(self, Self::LongCollateral)
    }
}

/// Side of a trade, from the taker's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn from_is_call(is_call: bool) -> Self {
        if is_call { Self::Call } else { Self::Put }
    }
}

/// `(base, quote, oracle adapter)` triplet a vault can trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportedPair {
    pub base: Address,
    pub quote: Address,
    pub oracle_adapter: Address,
}

/// Settings identifying an option pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub base: Address,
    pub quote: Address,
    pub oracle_adapter: Address,
    pub strike: Wad,
    /// Unix timestamp in seconds.
    pub maturity: u64,
    pub is_call: bool,
}

impl PoolKey {
    pub fn pair(&self) -> SupportedPair {
        SupportedPair { base: self.base, quote: self.quote, oracle_adapter: self.oracle_adapter }
    }

    pub fn option_type(&self) -> OptionType {
        OptionType::from_is_call(self.is_call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_tags() {
        for t in [
            RangeOrderType::CollateralShortUsePremium,
            RangeOrderType::CollateralShort,
            RangeOrderType::LongCollateral,
        ] {
            assert_eq!(RangeOrderType::from_tag(t.tag()), Some(t));
        }
        assert_eq!(RangeOrderType::from_tag(3), None);
        assert!(RangeOrderType::LongCollateral.adjusts_lower());
        assert!(!RangeOrderType::CollateralShort.adjusts_lower());
    }

    #[test]
    fn test_pool_key_serde() {
        let key = PoolKey {
            base: Address::repeat_byte(0x01),
            quote: Address::repeat_byte(0x02),
            oracle_adapter: Address::repeat_byte(0x03),
            strike: Wad::from_int(1500),
            maturity: 1_700_000_000,
            is_call: false,
        };
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(json["strike"], "1500");
        assert_eq!(json["base"], "0x0101010101010101010101010101010101010101");
        assert_eq!(serde_json::from_value::<PoolKey>(json).unwrap(), key);
    }
}
