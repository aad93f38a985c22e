//! Trade call data
//!
//! The pool and vault `trade` entry points are declared with `sol!` and
//! encoded through [`SolCall::abi_encode`](alloy_sol_types::SolCall::abi_encode).

pub mod pool;
pub mod vault;

use alloy_primitives::U256;
use alloy_sol_types::sol;

use crate::common::error::{QuoteError, QuoteResult};
use crate::utils::calc::Wad;

sol! {
    interface IPool {
        function trade(uint256 size, bool isBuy, uint256 premiumLimit, address referrer) external;
    }

    interface IVault {
        struct PoolKey {
            address base;
            address quote;
            address oracleAdapter;
            uint256 strike;
            uint256 maturity;
            bool isCallPool;
        }

        function trade(
            PoolKey poolKey,
            uint256 size,
            bool isBuy,
            uint256 premiumLimit,
            address referrer
        ) external;
    }
}

/// Raw WAD value as a `uint256` argument. Negative values cannot be encoded.
pub(crate) fn abi_uint(name: &'static str, value: Wad) -> QuoteResult<U256> {
    if value.is_negative() {
        return Err(QuoteError::OutOfRange { field: name, value: value.to_string(), bits: 256 });
    }
    Ok(U256::from(value.raw() as u128))
}
