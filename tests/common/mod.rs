//! In-memory collaborators for integration tests
//!
//! Each mock answers from state the test sets up front. Any value left unset
//! makes the corresponding call fail, which is how tests simulate an
//! unreachable node or a vault that refuses to quote.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, address};
use anyhow::anyhow;
use parking_lot::Mutex;
use tokio::sync::broadcast;

use options_quote_sdk::common::AnyResult;
use options_quote_sdk::common::chain::{ChainClient, ChainEvent, EventSource, VaultFill, VaultRegistry};
use options_quote_sdk::{OptionType, PoolKey, SupportedPair, TradeSide, Wad};

pub const POOL: Address = address!("0x00000000000000000000000000000000000000a1");
pub const OTHER_POOL: Address = address!("0x00000000000000000000000000000000000000a2");
pub const BASE: Address = address!("0x00000000000000000000000000000000000000b1");
pub const QUOTE: Address = address!("0x00000000000000000000000000000000000000b2");
pub const ORACLE: Address = address!("0x00000000000000000000000000000000000000c1");
pub const OTHER_ORACLE: Address = address!("0x00000000000000000000000000000000000000c2");
pub const VAULT_A: Address = address!("0x00000000000000000000000000000000000000d1");
pub const VAULT_B: Address = address!("0x00000000000000000000000000000000000000d2");
pub const ROUTER: Address = address!("0x00000000000000000000000000000000000000e1");
pub const REFERRER: Address = address!("0x00000000000000000000000000000000000000e2");
pub const TAKER: Address = address!("0x00000000000000000000000000000000000000f1");

pub fn w(s: &str) -> Wad {
    s.parse().unwrap()
}

pub fn pool_key(is_call: bool) -> PoolKey {
    PoolKey {
        base: BASE,
        quote: QUOTE,
        oracle_adapter: ORACLE,
        strike: w("1000"),
        maturity: 1_767_225_600,
        is_call,
    }
}

pub fn pair() -> SupportedPair {
    pool_key(true).pair()
}

#[derive(Default)]
pub struct MockChain {
    pub pools: Mutex<HashMap<Address, PoolKey>>,
    /// Total AMM premium for any size.
    pub amm_premium: Mutex<Option<Wad>>,
    pub amm_delay: Mutex<Option<Duration>>,
    pub vault_fills: Mutex<HashMap<Address, VaultFill>>,
    pub vault_delays: Mutex<HashMap<Address, Duration>>,
    pub authoritative_fee: Mutex<Option<Wad>>,
    pub amm_calls: AtomicUsize,
}

impl MockChain {
    /// A call pool at `POOL` with an AMM premium and an authoritative fee.
    pub fn with_pool(amm_premium: &str, fee: &str) -> Self {
        let chain = Self::default();
        chain.pools.lock().insert(POOL, pool_key(true));
        *chain.amm_premium.lock() = Some(w(amm_premium));
        *chain.authoritative_fee.lock() = Some(w(fee));
        chain
    }

    pub fn set_vault(&self, vault: Address, premium: &str, size: &str) {
        self.vault_fills.lock().insert(vault, VaultFill { premium: w(premium), size: w(size) });
    }

    pub fn amm_calls(&self) -> usize {
        self.amm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChainClient for MockChain {
    async fn get_pool_settings(&self, pool: Address) -> AnyResult<PoolKey> {
        self.pools.lock().get(&pool).copied().ok_or_else(|| anyhow!("pool {pool} not deployed"))
    }

    async fn get_amm_quote(&self, _pool: Address, _size: Wad, _side: TradeSide, _taker: Address) -> AnyResult<Wad> {
        self.amm_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.amm_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let premium = *self.amm_premium.lock();
        premium.ok_or_else(|| anyhow!("amm has no liquidity"))
    }

    async fn get_vault_quote(
        &self,
        vault: Address,
        _pool_key: &PoolKey,
        _size: Wad,
        _side: TradeSide,
        _taker: Address,
    ) -> AnyResult<VaultFill> {
        let delay = self.vault_delays.lock().get(&vault).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.vault_fills.lock().get(&vault).copied().ok_or_else(|| anyhow!("vault {vault} reverted"))
    }

    async fn get_authoritative_fee(
        &self,
        _pool: Address,
        _taker: Address,
        _size: Wad,
        _premium: Wad,
        _is_orderbook: bool,
    ) -> AnyResult<Wad> {
        let fee = *self.authoritative_fee.lock();
        fee.ok_or_else(|| anyhow!("execution reverted"))
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pub vaults: Mutex<Vec<Address>>,
    pub pairs: Mutex<HashMap<Address, Vec<SupportedPair>>>,
    pub fail: Mutex<bool>,
}

impl MockRegistry {
    /// Registers `vault` as supporting `pairs`, in call order.
    pub fn add_vault(&self, vault: Address, pairs: Vec<SupportedPair>) {
        self.vaults.lock().push(vault);
        self.pairs.lock().insert(vault, pairs);
    }
}

#[async_trait::async_trait]
impl VaultRegistry for MockRegistry {
    async fn find_vaults_by_filter(
        &self,
        _assets: &[Address],
        _side: TradeSide,
        _option_type: OptionType,
    ) -> AnyResult<Vec<Address>> {
        if *self.fail.lock() {
            return Err(anyhow!("registry unreachable"));
        }
        Ok(self.vaults.lock().clone())
    }

    async fn get_supported_pairs(&self, vault: Address) -> AnyResult<Vec<SupportedPair>> {
        self.pairs.lock().get(&vault).cloned().ok_or_else(|| anyhow!("unknown vault {vault}"))
    }
}

pub struct MockEvents {
    pub sender: broadcast::Sender<ChainEvent>,
}

impl MockEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    pub fn emit(&self, event: ChainEvent) {
        let _ = self.sender.send(event);
    }
}

impl EventSource for MockEvents {
    fn subscribe(&self) -> broadcast::Receiver<ChainEvent> {
        self.sender.subscribe()
    }
}

pub fn shared(chain: MockChain, registry: MockRegistry) -> (Arc<MockChain>, Arc<MockRegistry>) {
    (Arc::new(chain), Arc::new(registry))
}
