use alloy_primitives::Address;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::constants::protocol::ZERO_ADDRESS;

/// Quote engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteConfig {
    /// How often a stream re-evaluates its quote (default: 15s)
    pub refresh_interval: Duration,
    /// How long a quote's call data stays executable (default: 120s)
    pub quote_ttl: Duration,
    /// Referrer written into trade call data
    pub referrer: Address,
    /// Spender that pulls tokens for AMM trades
    pub erc20_router: Address,
    /// Taker used when a request does not name one
    pub default_taker: Address,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(15),
            quote_ttl: Duration::from_secs(120),
            referrer: ZERO_ADDRESS,
            erc20_router: ZERO_ADDRESS,
            default_taker: ZERO_ADDRESS,
        }
    }
}

impl QuoteConfig {
    pub fn new(erc20_router: Address) -> Self {
        Self { erc20_router, ..Self::default() }
    }

    /// Reads overrides from the environment, keeping defaults for missing or
    /// unparsable values and for a zero refresh interval.
    ///
    /// - `QUOTE_REFRESH_SECS`, `QUOTE_TTL_SECS`
    /// - `QUOTE_REFERRER`, `QUOTE_ERC20_ROUTER`, `QUOTE_TAKER`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        match env_parse::<u64>("QUOTE_REFRESH_SECS") {
            Some(0) => warn!("ignoring QUOTE_REFRESH_SECS=0: refresh interval must be positive"),
            Some(secs) => config.refresh_interval = Duration::from_secs(secs),
            None => {}
        }
        if let Some(secs) = env_parse::<u64>("QUOTE_TTL_SECS") {
            config.quote_ttl = Duration::from_secs(secs);
        }
        if let Some(addr) = env_parse::<Address>("QUOTE_REFERRER") {
            config.referrer = addr;
        }
        if let Some(addr) = env_parse::<Address>("QUOTE_ERC20_ROUTER") {
            config.erc20_router = addr;
        }
        if let Some(addr) = env_parse::<Address>("QUOTE_TAKER") {
            config.default_taker = addr;
        }
        config
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_quote_ttl(mut self, ttl: Duration) -> Self {
        self.quote_ttl = ttl;
        self
    }

    pub fn with_referrer(mut self, referrer: Address) -> Self {
        self.referrer = referrer;
        self
    }

    pub fn with_default_taker(mut self, taker: Address) -> Self {
        self.default_taker = taker;
        self
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("ignoring {key}={raw}: {e}");
            None
        }
    }
}

pub type AnyResult<T> = anyhow::Result<T>;
