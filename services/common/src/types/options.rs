//! Options chain snapshot types
//!
//! A chain is always filtered to one underlying and one expiry by the
//! caller; cross-expiry aggregation is not performed here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::STRIKE_TOLERANCE;

/// Option side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    /// Right to buy the underlying at strike
    Call,
    /// Right to sell the underlying at strike
    Put,
}

/// Single option contract as delivered by the exchange snapshot
///
/// Greeks are the exchange-provided marks; contracts with non-finite
/// Greeks are backfilled from implied volatility before aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Exchange symbol, e.g. `BTC-27MAR26-60000-C`
    pub symbol: String,
    /// Strike price
    pub strike: f64,
    /// Call or put
    pub side: OptionSide,
    /// Mark price in quote units
    pub mark_price: f64,
    /// Mark implied volatility (fraction, 0.65 = 65%)
    pub implied_volatility: f64,
    /// Mark delta
    pub delta: f64,
    /// Mark gamma
    pub gamma: f64,
    /// Mark theta
    pub theta: f64,
    /// Mark vega
    pub vega: f64,
    /// 24h contract volume
    pub volume: f64,
    /// Open interest in contracts
    pub open_interest: f64,
}

/// Options chain snapshot for one underlying and one expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsChain {
    /// Underlying symbol, e.g. `BTCUSDT`
    pub underlying: String,
    /// Spot price of the underlying at snapshot time
    pub spot_price: f64,
    /// Expiry shared by every contract in the chain
    pub expiry: DateTime<Utc>,
    /// Call contracts
    pub calls: Vec<OptionContract>,
    /// Put contracts
    pub puts: Vec<OptionContract>,
}

impl OptionsChain {
    /// Sorted distinct strikes across both sides
    #[must_use]
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .calls
            .iter()
            .chain(self.puts.iter())
            .map(|c| c.strike)
            .filter(|s| s.is_finite())
            .collect();
        strikes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        strikes.dedup_by(|a, b| (*a - *b).abs() < STRIKE_TOLERANCE);
        strikes
    }

    /// Strike minimizing |strike - spot|, `None` for an empty chain
    #[must_use]
    pub fn atm_strike(&self) -> Option<f64> {
        self.strikes()
            .into_iter()
            .min_by(|a, b| {
                let da = (a - self.spot_price).abs();
                let db = (b - self.spot_price).abs();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Call contract at the given strike, if present
    #[must_use]
    pub fn call_at(&self, strike: f64) -> Option<&OptionContract> {
        self.calls
            .iter()
            .find(|c| (c.strike - strike).abs() < STRIKE_TOLERANCE)
    }

    /// Put contract at the given strike, if present
    #[must_use]
    pub fn put_at(&self, strike: f64) -> Option<&OptionContract> {
        self.puts
            .iter()
            .find(|c| (c.strike - strike).abs() < STRIKE_TOLERANCE)
    }

    /// Total number of contracts across both sides
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len() + self.puts.len()
    }

    /// True when the chain carries no contracts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}
