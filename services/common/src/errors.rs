//! Common error types for the analytics services
//!
//! "No data" and "insufficient data" are never errors here; analyzers
//! return explicit empty or degraded results for those. The variants below
//! cover malformed upstream data only, which must fail loudly rather than
//! silently produce zeros.

use thiserror::Error;

/// Analytics error types
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// An options chain contains no contracts at all
    #[error("Options chain for {0} is empty")]
    EmptyChain(String),

    /// The at-the-money contracts required for a calculation are missing
    #[error("ATM contract missing at strike {strike} for {underlying}")]
    MissingAtmContract {
        /// Underlying symbol of the chain
        underlying: String,
        /// The ATM strike that has no call/put pair
        strike: f64,
    },

    /// A snapshot violates its documented invariants
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Convenience result alias for the analytics crates
pub type Result<T> = std::result::Result<T, AnalyticsError>;
