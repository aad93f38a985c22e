//! Error types
//!
//! Pure math and codec failures surface synchronously as [`QuoteError`].
//! Failures of individual liquidity sources never leave the aggregator; they
//! are logged and turned into "no candidate from that source".

use alloy_primitives::Address;

/// Fixed-point arithmetic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("fixed-point overflow")]
    Overflow,
    #[error("fixed-point division by zero")]
    DivisionByZero,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// Caller input violates a domain invariant and cannot be corrected.
    #[error("domain range error: {0}")]
    DomainRange(String),

    /// A value does not fit in the bit field reserved for it.
    #[error("field `{field}` out of range: {value} does not fit in {bits} bits")]
    OutOfRange { field: &'static str, value: String, bits: u32 },

    /// A packed identifier could not be decoded.
    #[error("invalid token id {id}: {reason}")]
    InvalidTokenId { id: String, reason: String },

    /// Formula evaluated at a point where it is undefined.
    #[error("singular computation: {0}")]
    Singular(&'static str),

    #[error(transparent)]
    Math(#[from] MathError),

    /// Pool settings could not be read, so no source can be queried.
    #[error("pool {pool} unavailable: {reason}")]
    PoolUnavailable { pool: Address, reason: String },

    /// A single liquidity source failed to answer.
    #[error("source {source_id} unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },
}

impl QuoteError {
    pub fn source_unavailable(source_id: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable { source_id: source_id.into(), reason: err.to_string() }
    }
}

pub type QuoteResult<T> = Result<T, QuoteError>;
