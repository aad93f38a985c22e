//! Liquidity sources
//!
//! The AMM and every vault answer the same [`QuoteSource`] call. Each
//! implementation normalizes its premium to "per unit, fee excluded" and
//! builds the call data needed to execute it.

use std::sync::Arc;

use alloy_primitives::Address;

use super::fee::resolve_taker_fee;
use crate::common::chain::ChainClient;
use crate::common::error::{QuoteError, QuoteResult};
use crate::common::market::{PoolKey, TradeSide};
use crate::instruction::pool::build_pool_trade;
use crate::instruction::vault::build_vault_trade;
use crate::utils::calc::Wad;
use crate::utils::quote::{CandidateQuote, SourceKind};

/// Everything a source needs to price one request.
#[derive(Debug, Clone)]
pub struct QuoteContext {
    pub pool: Address,
    pub pool_key: PoolKey,
    pub size: Wad,
    pub side: TradeSide,
    pub max_slippage: Option<Wad>,
    pub taker: Address,
    pub referrer: Address,
    pub erc20_router: Address,
    pub deadline: u64,
}

#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    fn source_id(&self) -> String;

    fn kind(&self) -> SourceKind;

    async fn quote(&self, ctx: &QuoteContext) -> QuoteResult<CandidateQuote>;
}

pub type SourceRef = Arc<dyn QuoteSource>;

/// Premium bound written into call data. Buyers accept paying up to
/// `premium * (1 + slippage)`, sellers accept down to `premium * (1 - slippage)`.
pub fn premium_limit(premium: Wad, side: TradeSide, max_slippage: Option<Wad>) -> QuoteResult<Wad> {
    let Some(slippage) = max_slippage else {
        return Ok(premium);
    };
    if slippage.is_negative() {
        return Err(QuoteError::DomainRange(format!("slippage {slippage} is negative")));
    }
    let factor = if side.is_buy() {
        Wad::ONE.checked_add(slippage)?
    } else {
        Wad::ONE.checked_sub(slippage)?.max(Wad::ZERO)
    };
    Ok(premium.mul(factor)?)
}

/// Tokens the taker must approve: premium plus any fee not already included
/// when buying, collateral when selling.
fn approval_amount(ctx: &QuoteContext, size: Wad, premium_limit: Wad, unpaid_fee: Wad) -> QuoteResult<Wad> {
    if ctx.side.is_buy() {
        return Ok(premium_limit.checked_add(unpaid_fee)?);
    }
    if ctx.pool_key.is_call {
        Ok(size)
    } else {
        Ok(size.mul(ctx.pool_key.strike)?)
    }
}

pub struct AmmQuoteSource {
    chain: Arc<dyn ChainClient>,
}

impl AmmQuoteSource {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait::async_trait]
impl QuoteSource for AmmQuoteSource {
    fn source_id(&self) -> String {
        "amm".to_string()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Amm
    }

    async fn quote(&self, ctx: &QuoteContext) -> QuoteResult<CandidateQuote> {
        let premium = self
            .chain
            .get_amm_quote(ctx.pool, ctx.size, ctx.side, ctx.taker)
            .await
            .map_err(|e| QuoteError::source_unavailable(self.source_id(), format!("{e:#}")))?;

        // AMM premiums exclude the fee
        let fee = resolve_taker_fee(self.chain.as_ref(), ctx.pool, ctx.taker, ctx.size, premium, false).await?;
        let price = premium.div(ctx.size)?;
        let limit = premium_limit(premium, ctx.side, ctx.max_slippage)?;

        Ok(CandidateQuote {
            source_id: self.source_id(),
            source_kind: SourceKind::Amm,
            provider: ctx.pool,
            price,
            size: ctx.size,
            side: ctx.side,
            taker_fee: fee.amount,
            fee_source: fee.source,
            premium_limit: limit,
            deadline: ctx.deadline,
            approval_target: ctx.erc20_router,
            approval_amount: approval_amount(ctx, ctx.size, limit, fee.amount)?,
            call_data: build_pool_trade(ctx.size, ctx.side, limit, ctx.referrer)?,
        })
    }
}

pub struct VaultQuoteSource {
    chain: Arc<dyn ChainClient>,
    vault: Address,
}

impl VaultQuoteSource {
    pub fn new(chain: Arc<dyn ChainClient>, vault: Address) -> Self {
        Self { chain, vault }
    }

    pub fn vault(&self) -> Address {
        self.vault
    }
}

#[async_trait::async_trait]
impl QuoteSource for VaultQuoteSource {
    fn source_id(&self) -> String {
        format!("vault:{}", self.vault)
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Vault
    }

    async fn quote(&self, ctx: &QuoteContext) -> QuoteResult<CandidateQuote> {
        let fill = self
            .chain
            .get_vault_quote(self.vault, &ctx.pool_key, ctx.size, ctx.side, ctx.taker)
            .await
            .map_err(|e| QuoteError::source_unavailable(self.source_id(), format!("{e:#}")))?;

        if fill.size <= Wad::ZERO || fill.size > ctx.size {
            return Err(QuoteError::source_unavailable(
                self.source_id(),
                format!("fill size {} outside (0, {}]", fill.size, ctx.size),
            ));
        }
        if fill.premium.is_negative() {
            return Err(QuoteError::source_unavailable(self.source_id(), format!("negative premium {}", fill.premium)));
        }

        // Vault premiums include the fee, so the fee is computed separately
        // and taken back out.
        let fee = resolve_taker_fee(self.chain.as_ref(), ctx.pool, ctx.taker, fill.size, fill.premium, false).await?;
        let net = if ctx.side.is_buy() {
            fill.premium.checked_sub(fee.amount)?
        } else {
            fill.premium.checked_add(fee.amount)?
        };
        let price = net.div(fill.size)?;
        let limit = premium_limit(fill.premium, ctx.side, ctx.max_slippage)?;

        Ok(CandidateQuote {
            source_id: self.source_id(),
            source_kind: SourceKind::Vault,
            provider: self.vault,
            price,
            size: fill.size,
            side: ctx.side,
            taker_fee: fee.amount,
            fee_source: fee.source,
            premium_limit: limit,
            deadline: ctx.deadline,
            approval_target: self.vault,
            approval_amount: approval_amount(ctx, fill.size, limit, Wad::ZERO)?,
            call_data: build_vault_trade(&ctx.pool_key, fill.size, ctx.side, limit, ctx.referrer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(s: &str) -> Wad {
        s.parse().unwrap()
    }

    #[test]
    fn test_premium_limit() {
        assert_eq!(premium_limit(w("10"), TradeSide::Buy, None).unwrap(), w("10"));
        assert_eq!(premium_limit(w("10"), TradeSide::Buy, Some(w("0.05"))).unwrap(), w("10.5"));
        assert_eq!(premium_limit(w("10"), TradeSide::Sell, Some(w("0.05"))).unwrap(), w("9.5"));
        assert_eq!(premium_limit(w("10"), TradeSide::Sell, Some(w("1.5"))).unwrap(), Wad::ZERO);
        assert!(premium_limit(w("10"), TradeSide::Buy, Some(w("-0.1"))).is_err());
    }
}
