//! Quote synthesis and position-identifier codec for an on-chain options
//! protocol.
//!
//! - [`utils::calc`]: WAD fixed-point math, range-width snapping, taker fees
//!   and option breakeven.
//! - [`token_id`]: packed position and option token ids.
//! - [`instruction`]: ABI call data for pool and vault trades.
//! - [`trading`]: multi-source best-quote aggregation and live quote streams.
//!
//! Node access, the vault registry and the on-chain event feed are supplied
//! by the caller through the traits in [`common::chain`].

pub mod common;
pub mod constants;
pub mod instruction;
pub mod token_id;
pub mod trading;
pub mod utils;

use std::sync::Arc;

use alloy_primitives::Address;

pub use crate::common::QuoteConfig;
use crate::common::chain::{ChainClient, EventSource, VaultRegistry};
pub use crate::common::error::{MathError, QuoteError, QuoteResult};
pub use crate::common::market::{OptionType, PoolKey, RangeOrderType, SupportedPair, TradeSide};
pub use crate::token_id::{OptionTokenId, PositionKey, PositionTokenId};
pub use crate::trading::fee::TakerFee;
pub use crate::trading::{ListenerRef, NoopListener, QuoteAggregator, QuoteListener, QuoteStreamer, Subscription};
pub use crate::utils::calc::{TickRange, Wad, breakeven_price, compute_taker_fee, snap_to_valid_range};
pub use crate::utils::quote::{CandidateQuote, FeeSource, QuoteRequest, SourceKind};

/// Main quoting client
///
/// Bundles the configuration with the caller's collaborators and exposes
/// one-shot quotes, live streams and the pure pricing helpers.
pub struct QuoteClient {
    pub config: QuoteConfig,
    pub chain: Arc<dyn ChainClient>,
    aggregator: Arc<QuoteAggregator>,
    streamer: QuoteStreamer,
}

impl QuoteClient {
    pub fn new(
        config: QuoteConfig,
        chain: Arc<dyn ChainClient>,
        registry: Arc<dyn VaultRegistry>,
        events: Option<Arc<dyn EventSource>>,
    ) -> Self {
        let aggregator = Arc::new(QuoteAggregator::new(chain.clone(), registry, config.clone()));
        let streamer = QuoteStreamer::new(aggregator.clone(), events);
        Self { config, chain, aggregator, streamer }
    }

    /// Best quote across the AMM and every vault supporting the pool.
    pub async fn best_quote(&self, request: &QuoteRequest) -> QuoteResult<Option<CandidateQuote>> {
        self.aggregator.best_quote(request).await
    }

    /// All quotes that came back, AMM first.
    pub async fn all_quotes(&self, request: &QuoteRequest) -> QuoteResult<Vec<CandidateQuote>> {
        self.aggregator.collect_quotes(request).await
    }

    /// Streams the best quote for `request` until the subscription is
    /// cancelled or [`cancel_all_streams`](Self::cancel_all_streams) runs.
    pub fn stream_quotes(&self, request: QuoteRequest, listener: ListenerRef) -> Subscription {
        self.streamer.subscribe(request, listener)
    }

    pub fn cancel_all_streams(&self) {
        self.streamer.cancel_all();
    }

    pub fn active_streams(&self) -> usize {
        self.streamer.active_sessions()
    }

    /// Taker fee from the pool, falling back to the local formula.
    pub async fn taker_fee(
        &self,
        pool: Address,
        size: Wad,
        premium: Wad,
        is_orderbook: bool,
        taker: Option<Address>,
    ) -> QuoteResult<TakerFee> {
        let taker = taker.unwrap_or(self.config.default_taker);
        trading::fee::resolve_taker_fee(self.chain.as_ref(), pool, taker, size, premium, is_orderbook).await
    }

    /// Token id of a range order on `pool`, with the range snapped to a
    /// valid width first.
    pub async fn position_token_id(
        &self,
        pool: Address,
        owner: Address,
        operator: Address,
        lower: Wad,
        upper: Wad,
        order_type: RangeOrderType,
    ) -> QuoteResult<(PositionKey, PositionTokenId)> {
        let pool_key = self
            .chain
            .get_pool_settings(pool)
            .await
            .map_err(|e| QuoteError::PoolUnavailable { pool, reason: format!("{e:#}") })?;
        let range = utils::calc::snap_to_valid_range(lower, upper, order_type)?;
        let key = PositionKey {
            owner,
            operator,
            lower: range.lower,
            upper: range.upper,
            order_type,
            is_call: pool_key.is_call,
            strike: pool_key.strike,
        };
        let id = key.token_id()?;
        Ok((key, id))
    }
}
