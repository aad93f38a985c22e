//! External collaborators
//!
//! The quote engine never talks to a node, the vault registry or an event
//! feed directly; callers plug in implementations of these traits. Every call
//! either succeeds or fails, and a failure only means "unavailable".

use alloy_primitives::Address;
use tokio::sync::broadcast;

use crate::common::AnyResult;
use crate::common::market::{OptionType, PoolKey, SupportedPair, TradeSide};
use crate::utils::calc::Wad;

/// Premium a vault is willing to trade at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultFill {
    /// Total premium for `size`, taker fee included.
    pub premium: Wad,
    /// Size the vault can fill, at most the requested size.
    pub size: Wad,
}

/// Read-only on-chain queries the quote engine depends on.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_pool_settings(&self, pool: Address) -> AnyResult<PoolKey>;

    /// Total AMM premium for `size`, taker fee excluded.
    async fn get_amm_quote(&self, pool: Address, size: Wad, side: TradeSide, taker: Address) -> AnyResult<Wad>;

    async fn get_vault_quote(
        &self,
        vault: Address,
        pool_key: &PoolKey,
        size: Wad,
        side: TradeSide,
        taker: Address,
    ) -> AnyResult<VaultFill>;

    /// Taker fee as the pool itself computes it.
    async fn get_authoritative_fee(
        &self,
        pool: Address,
        taker: Address,
        size: Wad,
        premium: Wad,
        is_orderbook: bool,
    ) -> AnyResult<Wad>;
}

#[async_trait::async_trait]
pub trait VaultRegistry: Send + Sync {
    /// Coarse filter: vaults trading any of `assets` on `side` for `option_type`.
    async fn find_vaults_by_filter(
        &self,
        assets: &[Address],
        side: TradeSide,
        option_type: OptionType,
    ) -> AnyResult<Vec<Address>>;

    async fn get_supported_pairs(&self, vault: Address) -> AnyResult<Vec<SupportedPair>>;
}

/// On-chain activity that may move quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    Trade { pool: Address },
    VaultQuotesUpdated { vault: Address },
}

impl ChainEvent {
    /// Trades only matter for the pool being quoted; any vault update may
    /// change the best vault quote.
    pub fn affects_pool(&self, pool: Address) -> bool {
        match self {
            ChainEvent::Trade { pool: traded } => *traded == pool,
            ChainEvent::VaultQuotesUpdated { .. } => true,
        }
    }
}

pub trait EventSource: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<ChainEvent>;
}
