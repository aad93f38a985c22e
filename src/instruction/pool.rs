//! AMM pool trade call

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;

use super::{IPool, abi_uint};
use crate::common::error::QuoteResult;
use crate::common::market::TradeSide;
use crate::utils::calc::Wad;

/// `trade(size, isBuy, premiumLimit, referrer)` on the pool.
///
/// `premium_limit` is the most the taker pays when buying, or the least it
/// accepts when selling.
pub fn build_pool_trade(size: Wad, side: TradeSide, premium_limit: Wad, referrer: Address) -> QuoteResult<Bytes> {
    let call = IPool::tradeCall {
        size: abi_uint("size", size)?,
        isBuy: side.is_buy(),
        premiumLimit: abi_uint("premium_limit", premium_limit)?,
        referrer,
    };
    Ok(Bytes::from(call.abi_encode()))
}
