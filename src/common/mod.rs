pub mod chain;
pub mod error;
pub mod market;
pub mod types;

pub use types::*;
