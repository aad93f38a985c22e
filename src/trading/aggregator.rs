//! Best-execution quote aggregation
//!
//! One AMM candidate is always attempted. Vault candidates come from the
//! registry's coarse asset/side/type filter, narrowed to vaults that list the
//! pool's exact `(base, quote, oracle adapter)` pair. All sources are queried
//! concurrently; a failing source only drops its own candidate.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use futures::future::join_all;
use tracing::{debug, warn};

use super::source::{AmmQuoteSource, QuoteContext, SourceRef, VaultQuoteSource};
use crate::common::QuoteConfig;
use crate::common::chain::{ChainClient, VaultRegistry};
use crate::common::error::{QuoteError, QuoteResult};
use crate::common::market::{PoolKey, TradeSide};
use crate::utils::calc::Wad;
use crate::utils::quote::{CandidateQuote, QuoteRequest};

pub struct QuoteAggregator {
    chain: Arc<dyn ChainClient>,
    registry: Arc<dyn VaultRegistry>,
    config: QuoteConfig,
}

impl QuoteAggregator {
    pub fn new(chain: Arc<dyn ChainClient>, registry: Arc<dyn VaultRegistry>, config: QuoteConfig) -> Self {
        Self { chain, registry, config }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Best executable quote for `request`, or `None` when no source can
    /// fill at least `min_size`.
    ///
    /// Only invalid requests and an unreadable pool are errors; failures of
    /// individual sources are logged and skipped.
    pub async fn best_quote(&self, request: &QuoteRequest) -> QuoteResult<Option<CandidateQuote>> {
        let candidates = self.collect_quotes(request).await?;
        let best = select_best(candidates, request.side, request.min_size);
        match &best {
            Some(quote) => debug!(
                "best quote for pool {} from {} at {} (fee {})",
                request.pool, quote.source_id, quote.price, quote.taker_fee
            ),
            None => debug!("no quote available for pool {}", request.pool),
        }
        Ok(best)
    }

    /// Every candidate that answered, AMM first, then vaults in registry order.
    pub async fn collect_quotes(&self, request: &QuoteRequest) -> QuoteResult<Vec<CandidateQuote>> {
        if request.size <= Wad::ZERO {
            return Err(QuoteError::DomainRange(format!("trade size {} must be positive", request.size)));
        }
        if let Some(slippage) = request.max_slippage.filter(|s| s.is_negative()) {
            return Err(QuoteError::DomainRange(format!("slippage {slippage} is negative")));
        }

        let pool_key = self
            .chain
            .get_pool_settings(request.pool)
            .await
            .map_err(|e| QuoteError::PoolUnavailable { pool: request.pool, reason: format!("{e:#}") })?;

        let ctx = QuoteContext {
            pool: request.pool,
            pool_key,
            size: request.size,
            side: request.side,
            max_slippage: request.max_slippage,
            taker: request.taker.unwrap_or(self.config.default_taker),
            referrer: self.config.referrer,
            erc20_router: self.config.erc20_router,
            deadline: deadline_after(self.config.quote_ttl),
        };

        let mut sources: Vec<SourceRef> = vec![Arc::new(AmmQuoteSource::new(self.chain.clone()))];
        for vault in self.discover_vaults(&pool_key, request.side).await {
            sources.push(Arc::new(VaultQuoteSource::new(self.chain.clone(), vault)));
        }

        // join_all keeps source order, and each task owns its own result slot
        let results = join_all(sources.iter().map(|source| source.quote(&ctx))).await;

        let mut candidates = Vec::with_capacity(results.len());
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(quote) => candidates.push(quote),
                Err(e) => warn!("quote source {} skipped: {e}", source.source_id()),
            }
        }
        Ok(candidates)
    }

    /// Vaults the registry lists for the pool's assets, side and option type
    /// that also support the pool's exact pair.
    async fn discover_vaults(&self, pool_key: &PoolKey, side: TradeSide) -> Vec<Address> {
        let assets = [pool_key.base, pool_key.quote];
        let listed = match self.registry.find_vaults_by_filter(&assets, side, pool_key.option_type()).await {
            Ok(vaults) => vaults,
            Err(e) => {
                warn!("vault registry lookup failed, quoting AMM only: {e:#}");
                return Vec::new();
            }
        };

        let pair = pool_key.pair();
        let lookups = join_all(listed.iter().map(|vault| self.registry.get_supported_pairs(*vault))).await;

        listed
            .into_iter()
            .zip(lookups)
            .filter_map(|(vault, pairs)| match pairs {
                Ok(pairs) if pairs.contains(&pair) => Some(vault),
                Ok(_) => {
                    debug!("vault {vault} does not support pair {:?}", pair);
                    None
                }
                Err(e) => {
                    warn!("supported pairs of vault {vault} unavailable: {e:#}");
                    None
                }
            })
            .collect()
    }
}

/// Picks the cheapest quote to buy or the most generous quote to sell,
/// comparing per-unit prices with the fee included.
///
/// Candidates below `min_size` are dropped. Equal prices keep the earlier
/// candidate, so the AMM wins ties, then vaults in registry order.
pub fn select_best(
    candidates: Vec<CandidateQuote>,
    side: TradeSide,
    min_size: Option<Wad>,
) -> Option<CandidateQuote> {
    let mut best: Option<(Wad, CandidateQuote)> = None;
    for quote in candidates {
        if min_size.is_some_and(|min| quote.size < min) {
            continue;
        }
        let price = match quote.effective_price() {
            Ok(price) => price,
            Err(e) => {
                warn!("dropping quote from {}: {e}", quote.source_id);
                continue;
            }
        };
        let better = match &best {
            None => true,
            Some((best_price, _)) => match side {
                TradeSide::Buy => price < *best_price,
                TradeSide::Sell => price > *best_price,
            },
        };
        if better {
            best = Some((price, quote));
        }
    }
    best.map(|(_, quote)| quote)
}

fn deadline_after(ttl: Duration) -> u64 {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    now.saturating_add(ttl.as_secs())
}
