pub mod aggregator;
pub mod fee;
pub mod lifecycle;
pub mod source;
pub mod stream;

pub use aggregator::{QuoteAggregator, select_best};
pub use fee::{TakerFee, resolve_taker_fee};
pub use lifecycle::{ListenerRef, NoopListener, QuoteListener};
pub use source::{AmmQuoteSource, QuoteContext, QuoteSource, SourceRef, VaultQuoteSource, premium_limit};
pub use stream::{QuoteStreamer, Subscription};
