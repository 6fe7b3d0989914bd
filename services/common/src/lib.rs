//! Common snapshot types and utilities shared by the analytics services
//!
//! Everything here is an immutable value produced once per request cycle:
//! candle history, open interest, funding, liquidations, orderbook and
//! options-chain snapshots. Derived analytics live in the per-domain
//! crates; this crate only defines the inputs they consume, the shared
//! error type, and the injected TTL cache used at the collaborator
//! boundary.

pub mod cache;
pub mod constants;
pub mod errors;
pub mod types;

pub use cache::TtlCache;
pub use errors::{AnalyticsError, Result};
pub use types::market::{
    Candle, FundingRatePoint, Interval, LiquidationEvent, LiquidationSide, OpenInterestPoint,
    OrderbookLevel, OrderbookSnapshot, TakerFlowPoint, TopTraderRatioPoint,
};
pub use types::options::{OptionContract, OptionSide, OptionsChain};
