//! Quote delivery callbacks
//!
//! A stream hands every re-evaluated quote to a [`QuoteListener`]. `None`
//! means no source could quote this round, including rounds that failed.

use std::sync::Arc;

use crate::utils::quote::CandidateQuote;

pub trait QuoteListener: Send + Sync {
    fn on_quote(&self, quote: Option<CandidateQuote>);
}

impl<F> QuoteListener for F
where
    F: Fn(Option<CandidateQuote>) + Send + Sync,
{
    fn on_quote(&self, quote: Option<CandidateQuote>) {
        self(quote)
    }
}

/// Listener that drops every delivery.
#[derive(Clone)]
pub struct NoopListener;

impl QuoteListener for NoopListener {
    fn on_quote(&self, _quote: Option<CandidateQuote>) {}
}

pub type ListenerRef = Arc<dyn QuoteListener>;
