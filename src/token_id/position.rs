//! Range-order position token ids
//!
//! | bits      | field                                   |
//! |-----------|-----------------------------------------|
//! | 0..=9     | lower tick index (`lower / 0.001`)      |
//! | 10..=19   | upper tick index                        |
//! | 20..=179  | operator address                        |
//! | 180..=183 | order type                              |
//! | 184..=251 | reserved, zero                          |
//! | 252..=255 | format version                          |

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::{ensure_fits, field, invalid, low_mask};
use crate::common::error::{QuoteError, QuoteResult};
use crate::common::market::RangeOrderType;
use crate::constants::protocol::{MIN_TICK_DISTANCE, TOKEN_ID_VERSION};
use crate::utils::calc::{U256, Wad};

const LOWER_OFFSET: usize = 0;
const UPPER_OFFSET: usize = 10;
const TICK_BITS: usize = 10;
const OPERATOR_OFFSET: usize = 20;
const OPERATOR_BITS: usize = 160;
const ORDER_TYPE_OFFSET: usize = 180;
const ORDER_TYPE_BITS: usize = 4;
const RESERVED_OFFSET: usize = 184;
const RESERVED_BITS: usize = 68;
const VERSION_OFFSET: usize = 252;
const VERSION_BITS: usize = 4;

/// Identity of a range-order position.
///
/// Built per call from caller input plus the pool's strike and option type.
/// Only `operator`, the range and the order type end up in the token id;
/// `owner` is the holder of that token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub owner: Address,
    pub operator: Address,
    pub lower: Wad,
    pub upper: Wad,
    pub order_type: RangeOrderType,
    pub is_call: bool,
    pub strike: Wad,
}

impl PositionKey {
    pub fn token_fields(&self) -> PositionTokenFields {
        PositionTokenFields {
            version: TOKEN_ID_VERSION,
            order_type: self.order_type,
            operator: self.operator,
            lower: self.lower,
            upper: self.upper,
        }
    }

    pub fn token_id(&self) -> QuoteResult<PositionTokenId> {
        PositionTokenId::encode(&self.token_fields())
    }
}

/// Fields packed into a position token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionTokenFields {
    pub version: u8,
    pub order_type: RangeOrderType,
    pub operator: Address,
    pub lower: Wad,
    pub upper: Wad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionTokenId(U256);

impl PositionTokenId {
    pub fn encode(fields: &PositionTokenFields) -> QuoteResult<Self> {
        let version = U256::from(fields.version);
        ensure_fits("version", version, VERSION_BITS)?;

        let lower = tick_index("lower", fields.lower)?;
        let upper = tick_index("upper", fields.upper)?;
        let operator = U256::from_big_endian(fields.operator.as_slice());
        let order_type = U256::from(fields.order_type.tag());

        let id = (version << VERSION_OFFSET)
            | (order_type << ORDER_TYPE_OFFSET)
            | (operator << OPERATOR_OFFSET)
            | (upper << UPPER_OFFSET)
            | (lower << LOWER_OFFSET);
        Ok(Self(id))
    }

    /// Exact inverse of [`encode`](Self::encode). Only the current format
    /// version is accepted.
    pub fn decode(&self) -> QuoteResult<PositionTokenFields> {
        let id = self.0;

        let version = field(id, VERSION_OFFSET, VERSION_BITS).low_u64() as u8;
        if version != TOKEN_ID_VERSION {
            return Err(invalid(id, format!("unsupported version {version}")));
        }
        if !field(id, RESERVED_OFFSET, RESERVED_BITS).is_zero() {
            return Err(invalid(id, "reserved bits are set"));
        }

        let tag = field(id, ORDER_TYPE_OFFSET, ORDER_TYPE_BITS).low_u64() as u8;
        let order_type =
            RangeOrderType::from_tag(tag).ok_or_else(|| invalid(id, format!("unknown order type {tag}")))?;

        let operator_word = field(id, OPERATOR_OFFSET, OPERATOR_BITS).to_be_word();
        let operator = Address::from_slice(&operator_word[12..]);

        Ok(PositionTokenFields {
            version,
            order_type,
            operator,
            lower: tick_price(field(id, LOWER_OFFSET, TICK_BITS)),
            upper: tick_price(field(id, UPPER_OFFSET, TICK_BITS)),
        })
    }

    pub fn from_u256(id: U256) -> Self {
        Self(id)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn to_hex_string(&self) -> String {
        self.0.to_hex_string()
    }
}

fn tick_index(name: &'static str, price: Wad) -> QuoteResult<U256> {
    if price.is_negative() || !price.is_multiple_of(MIN_TICK_DISTANCE) {
        return Err(QuoteError::DomainRange(format!("{name} bound {price} is not a tick")));
    }
    let index = U256::from((price.raw() / MIN_TICK_DISTANCE.raw()) as u128);
    ensure_fits(name, index, TICK_BITS)?;
    Ok(index)
}

fn tick_price(index: U256) -> Wad {
    debug_assert!(index <= low_mask(TICK_BITS));
    Wad::from_raw(index.low_u64() as i128 * MIN_TICK_DISTANCE.raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const OPERATOR: Address = address!("0x1234567890abcdef1234567890abcdef12345678");

    fn w(s: &str) -> Wad {
        s.parse().unwrap()
    }

    fn fields(lower: &str, upper: &str, order_type: RangeOrderType) -> PositionTokenFields {
        PositionTokenFields { version: TOKEN_ID_VERSION, order_type, operator: OPERATOR, lower: w(lower), upper: w(upper) }
    }

    #[test]
    fn test_layout() {
        let id = PositionTokenId::encode(&fields("0.001", "0.002", RangeOrderType::LongCollateral)).unwrap();
        let raw = id.as_u256();
        assert_eq!(field(raw, 0, 10), U256::from(1u64));
        assert_eq!(field(raw, 10, 10), U256::from(2u64));
        assert_eq!(field(raw, 180, 4), U256::from(2u64));
        assert_eq!(field(raw, 252, 4), U256::from(1u64));
        assert_eq!(raw >> 252usize, U256::from(1u64));
        assert_eq!(
            field(raw, 20, 160),
            U256::from_big_endian(OPERATOR.as_slice())
        );
    }

    #[test]
    fn test_round_trip() {
        let cases = [
            fields("0", "0.001", RangeOrderType::CollateralShort),
            fields("0.25", "0.5", RangeOrderType::CollateralShortUsePremium),
            fields("0.2", "1", RangeOrderType::LongCollateral),
            fields("1.022", "1.023", RangeOrderType::CollateralShort),
            PositionTokenFields { operator: Address::ZERO, ..fields("0.1", "0.2", RangeOrderType::CollateralShort) },
            PositionTokenFields { operator: Address::repeat_byte(0xff), ..fields("0.1", "0.2", RangeOrderType::CollateralShort) },
        ];
        for case in cases {
            let id = PositionTokenId::encode(&case).unwrap();
            assert_eq!(id.decode().unwrap(), case);
        }
    }

    #[test]
    fn test_position_key_token_id() {
        let key = PositionKey {
            owner: Address::repeat_byte(0x11),
            operator: OPERATOR,
            lower: w("0.1"),
            upper: w("0.2"),
            order_type: RangeOrderType::LongCollateral,
            is_call: true,
            strike: w("1500"),
        };
        let decoded = key.token_id().unwrap().decode().unwrap();
        assert_eq!(decoded.operator, key.operator);
        assert_eq!(decoded.lower, key.lower);
        assert_eq!(decoded.upper, key.upper);
        assert_eq!(decoded.order_type, key.order_type);
        assert_eq!(decoded.version, TOKEN_ID_VERSION);
    }

    #[test]
    fn test_tick_out_of_range() {
        let err = PositionTokenId::encode(&fields("0.1", "1.024", RangeOrderType::CollateralShort)).unwrap_err();
        assert!(matches!(err, QuoteError::OutOfRange { field: "upper", bits: 10, .. }));
    }

    #[test]
    fn test_misaligned_or_negative_tick() {
        let err = PositionTokenId::encode(&fields("0.1005", "0.2", RangeOrderType::CollateralShort)).unwrap_err();
        assert!(matches!(err, QuoteError::DomainRange(_)));
        let err = PositionTokenId::encode(&fields("-0.1", "0.2", RangeOrderType::CollateralShort)).unwrap_err();
        assert!(matches!(err, QuoteError::DomainRange(_)));
    }

    #[test]
    fn test_version_out_of_range() {
        let f = PositionTokenFields { version: 16, ..fields("0.1", "0.2", RangeOrderType::CollateralShort) };
        assert!(matches!(PositionTokenId::encode(&f), Err(QuoteError::OutOfRange { field: "version", .. })));
    }

    #[test]
    fn test_decode_rejects_foreign_ids() {
        let good = PositionTokenId::encode(&fields("0.1", "0.2", RangeOrderType::CollateralShort)).unwrap().as_u256();

        let wrong_version = (good & low_mask(252)) | (U256::from(2u64) << 252usize);
        assert!(matches!(
            PositionTokenId::from_u256(wrong_version).decode(),
            Err(QuoteError::InvalidTokenId { .. })
        ));

        let reserved = good | (U256::one() << 200usize);
        assert!(PositionTokenId::from_u256(reserved).decode().is_err());

        let bad_type = (good & !(low_mask(4) << 180usize)) | (U256::from(7u64) << 180usize);
        assert!(PositionTokenId::from_u256(bad_type).decode().is_err());
    }
}
