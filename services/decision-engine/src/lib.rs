//! Trading decision scorer
//!
//! The last stage of the analytics pipeline: a weighted multi-factor
//! score over the per-domain analyzer outputs plus funding and taker
//! flow, reduced to a single actionable Buy/Sell/Wait call with a
//! confidence tier. The volatility regime gates the result; the scorer
//! itself holds no state beyond aggregating already-computed factors.

#![warn(missing_docs)]

pub mod config;
pub mod scorer;

pub use config::ScoreConfig;
pub use scorer::{
    Action, Confidence, Factor, FactorContribution, MarketInputs, TradingDecision, score_market,
};
