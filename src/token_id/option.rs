//! Option position token ids
//!
//! | bits      | field                    |
//! |-----------|--------------------------|
//! | 0..=127   | strike (raw WAD)         |
//! | 128..=247 | maturity (unix seconds)  |
//! | 248..=255 | token type               |

use serde::{Deserialize, Serialize};

use super::{ensure_fits, field, invalid};
use crate::common::error::{QuoteError, QuoteResult};
use crate::utils::calc::{U256, Wad};

const STRIKE_OFFSET: usize = 0;
const STRIKE_BITS: usize = 128;
const MATURITY_OFFSET: usize = 128;
const MATURITY_BITS: usize = 120;
const TOKEN_TYPE_OFFSET: usize = 248;
const TOKEN_TYPE_BITS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Long = 0,
    Short = 1,
}

impl TokenType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Long),
            1 => Some(Self::Short),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionTokenFields {
    pub token_type: TokenType,
    /// Unix timestamp in seconds.
    pub maturity: u64,
    pub strike: Wad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionTokenId(U256);

impl OptionTokenId {
    pub fn encode(fields: &OptionTokenFields) -> QuoteResult<Self> {
        if fields.strike.is_negative() {
            return Err(QuoteError::OutOfRange {
                field: "strike",
                value: fields.strike.to_string(),
                bits: STRIKE_BITS as u32,
            });
        }
        let strike = U256::from(fields.strike.raw() as u128);
        let maturity = U256::from(fields.maturity);
        ensure_fits("maturity", maturity, MATURITY_BITS)?;
        let token_type = U256::from(fields.token_type as u8);

        Ok(Self(
            (token_type << TOKEN_TYPE_OFFSET) | (maturity << MATURITY_OFFSET) | (strike << STRIKE_OFFSET),
        ))
    }

    pub fn decode(&self) -> QuoteResult<OptionTokenFields> {
        let id = self.0;

        let tag = field(id, TOKEN_TYPE_OFFSET, TOKEN_TYPE_BITS).low_u64() as u8;
        let token_type = TokenType::from_tag(tag).ok_or_else(|| invalid(id, format!("unknown token type {tag}")))?;

        let maturity = field(id, MATURITY_OFFSET, MATURITY_BITS);
        if maturity > U256::from(u64::MAX) {
            return Err(invalid(id, "maturity does not fit in 64 bits"));
        }

        let strike = field(id, STRIKE_OFFSET, STRIKE_BITS).low_u128();
        let strike = i128::try_from(strike).map_err(|_| invalid(id, "strike exceeds the signed WAD range"))?;

        Ok(OptionTokenFields { token_type, maturity: maturity.low_u64(), strike: Wad::from_raw(strike) })
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
