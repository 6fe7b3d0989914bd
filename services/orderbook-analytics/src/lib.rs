//! Orderbook liquidity analytics
//!
//! Snapshot metrics over an L2 book: cumulative depth, spread, windowed
//! bid/ask imbalance with dominance classification, notional slippage
//! estimates and liquidity walls. All functions are single-pass pure
//! transforms; an empty side produces an empty/absent result, never an
//! error.

#![warn(missing_docs)]

pub mod config;
pub mod liquidity;
pub mod slippage;

pub use config::BookAnalyzerConfig;
pub use liquidity::{
    BookDominance, BookSide, DepthLevel, DepthProfile, ImbalanceMetrics, LiquidityWall,
    SpreadMetrics, cumulative_depth, imbalance, liquidity_walls, spread_metrics,
};
pub use slippage::{SlippageEstimate, TradeDirection, estimate_slippage};
