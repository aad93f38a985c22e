//! Quote request and result types.
//!
//! Every liquidity source produces the same [`CandidateQuote`] shape, with
//! prices normalized to "per unit, fee excluded", so the aggregator can
//! compare them directly.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::common::error::QuoteResult;
use crate::common::market::TradeSide;
use crate::utils::calc::Wad;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Amm,
    Vault,
}

/// Where a taker fee figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeSource {
    /// Returned by the pool contract.
    Authoritative,
    /// Local formula, used when the pool could not be asked.
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub pool: Address,
    pub size: Wad,
    pub side: TradeSide,
    /// Candidates filling less than this are discarded.
    pub min_size: Option<Wad>,
    /// WAD fraction, e.g. `0.05` for 5%.
    pub max_slippage: Option<Wad>,
    pub taker: Option<Address>,
}

impl QuoteRequest {
    pub fn new(pool: Address, size: Wad, side: TradeSide) -> Self {
        Self { pool, size, side, min_size: None, max_slippage: None, taker: None }
    }

    pub fn with_min_size(mut self, min_size: Wad) -> Self {
        self.min_size = Some(min_size);
        self
    }

    pub fn with_max_slippage(mut self, max_slippage: Wad) -> Self {
        self.max_slippage = Some(max_slippage);
        self
    }

    pub fn with_taker(mut self, taker: Address) -> Self {
        self.taker = Some(taker);
        self
    }
}

/// An executable quote from one liquidity source.
///
/// Quotes are never updated in place; a newer quote replaces an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuote {
    pub source_id: String,
    pub source_kind: SourceKind,
    /// Pool or vault that executes the trade.
    pub provider: Address,
    /// Per-unit premium, taker fee excluded.
    pub price: Wad,
    pub size: Wad,
    pub side: TradeSide,
    pub taker_fee: Wad,
    pub fee_source: FeeSource,
    /// Bound embedded in `call_data`.
    pub premium_limit: Wad,
    /// Unix seconds after which the quote should not be executed.
    pub deadline: u64,
    pub approval_target: Address,
    pub approval_amount: Wad,
    pub call_data: Bytes,
}

impl CandidateQuote {
    /// Per-unit price with the fee folded in: what a buyer pays, or what a
    /// seller receives.
    pub fn effective_price(&self) -> QuoteResult<Wad> {
        let fee_per_unit = self.taker_fee.div(self.size)?;
        let price = if self.side.is_buy() {
            self.price.checked_add(fee_per_unit)?
        } else {
            self.price.checked_sub(fee_per_unit)?
        };
        Ok(price)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "source_id": self.source_id,
            "source_kind": self.source_kind,
            "provider": self.provider.to_string(),
            "price": self.price.to_string(),
            "size": self.size.to_string(),
            "side": self.side,
            "taker_fee": self.taker_fee.to_string(),
            "fee_source": self.fee_source,
            "premium_limit": self.premium_limit.to_string(),
            "deadline": self.deadline,
            "approval_target": self.approval_target.to_string(),
            "approval_amount": self.approval_amount.to_string(),
            "call_data": format!("0x{}", hex::encode(&self.call_data)),
        })
    }
}
