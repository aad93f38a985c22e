//! Taker fee lookup
//!
//! The pool's own fee query is authoritative. The local formula is only a
//! fallback for when that call fails.

use alloy_primitives::Address;
use tracing::warn;

use crate::common::chain::ChainClient;
use crate::common::error::QuoteResult;
use crate::utils::calc::{Wad, compute_taker_fee};
use crate::utils::quote::FeeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakerFee {
    pub amount: Wad,
    pub source: FeeSource,
}

pub async fn resolve_taker_fee(
    chain: &dyn ChainClient,
    pool: Address,
    taker: Address,
    size: Wad,
    premium: Wad,
    is_orderbook: bool,
) -> QuoteResult<TakerFee> {
    match chain.get_authoritative_fee(pool, taker, size, premium, is_orderbook).await {
        Ok(amount) => Ok(TakerFee { amount, source: FeeSource::Authoritative }),
        Err(e) => {
            warn!("taker fee query for pool {pool} failed, using local estimate: {e:#}");
            let amount = compute_taker_fee(size, premium, is_orderbook)?;
            Ok(TakerFee { amount, source: FeeSource::Estimated })
        }
    }
}
