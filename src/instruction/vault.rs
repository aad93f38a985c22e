//! Vault trade call

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use super::{IVault, abi_uint};
use crate::common::error::QuoteResult;
use crate::common::market::{PoolKey, TradeSide};
use crate::utils::calc::Wad;

/// `trade(poolKey, size, isBuy, premiumLimit, referrer)` on a vault. The pool
/// key tuple is static and encodes inline.
pub fn build_vault_trade(
    pool_key: &PoolKey,
    size: Wad,
    side: TradeSide,
    premium_limit: Wad,
    referrer: Address,
) -> QuoteResult<Bytes> {
    let call = IVault::tradeCall {
        poolKey: IVault::PoolKey {
            base: pool_key.base,
            quote: pool_key.quote,
            oracleAdapter: pool_key.oracle_adapter,
            strike: abi_uint("strike", pool_key.strike)?,
            maturity: U256::from(pool_key.maturity),
            isCallPool: pool_key.is_call,
        },
        size: abi_uint("size", size)?,
        isBuy: side.is_buy(),
        premiumLimit: abi_uint("premium_limit", premium_limit)?,
        referrer,
    };
    Ok(Bytes::from(call.abi_encode()))
}
