//! Market data snapshot types
//!
//! Time-series inputs (candles, open interest, funding, taker flow,
//! liquidations) and the L2 orderbook snapshot. All fields are plain f64;
//! sanitization of non-finite exchange values happens at the analyzer
//! boundary via [`sanitize_quantity`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candle interval
///
/// Parameterizes any calculation that depends on sampling cadence, in
/// particular realized-volatility annualization. Never assume a fixed
/// interval downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1 minute bars
    M1,
    /// 5 minute bars
    M5,
    /// 15 minute bars
    M15,
    /// 30 minute bars
    M30,
    /// 1 hour bars
    H1,
    /// 4 hour bars
    H4,
    /// Daily bars
    D1,
}

impl Interval {
    /// Bar duration in seconds
    #[must_use]
    pub const fn duration_secs(&self) -> u64 {
        match self {
            Interval::M1 => 60,
            Interval::M5 => 300,
            Interval::M15 => 900,
            Interval::M30 => 1800,
            Interval::H1 => 3600,
            Interval::H4 => 14400,
            Interval::D1 => 86400,
        }
    }

    /// Number of bars in one day at this cadence
    #[must_use]
    pub fn periods_per_day(&self) -> f64 {
        crate::constants::SECS_PER_DAY as f64 / self.duration_secs() as f64
    }
}

/// OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time
    pub open_time: DateTime<Utc>,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Base-asset volume
    pub volume: f64,
}

impl Candle {
    /// Typical price, the per-bar anchor used by volume bucketing
    #[must_use]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// True when every price field is finite and positive
    ///
    /// Price-like fields cannot be zero-defaulted; bars failing this check
    /// short-circuit their analyzer to its empty result.
    #[must_use]
    pub fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Open interest sample
///
/// Sampled on its own cadence, not the candle cadence; joining onto
/// candles is a nearest-timestamp match with a tolerance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInterestPoint {
    /// Sample timestamp
    pub ts: DateTime<Utc>,
    /// Outstanding contracts (base-asset units)
    pub value: f64,
}

/// Funding rate sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRatePoint {
    /// Sample timestamp
    pub ts: DateTime<Utc>,
    /// Signed funding rate (positive = longs pay shorts)
    pub rate: f64,
}

/// Taker buy/sell volume sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakerFlowPoint {
    /// Sample timestamp
    pub ts: DateTime<Utc>,
    /// Aggressive buy volume
    pub buy_volume: f64,
    /// Aggressive sell volume
    pub sell_volume: f64,
}

/// Top-trader long/short account ratio sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTraderRatioPoint {
    /// Sample timestamp
    pub ts: DateTime<Utc>,
    /// Long/short ratio of top-trader accounts (1.0 = balanced)
    pub long_short_ratio: f64,
}

/// Which side of a position was forcibly closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidationSide {
    /// A long position was liquidated (forced sell)
    Long,
    /// A short position was liquidated (forced buy)
    Short,
}

/// Single forced-liquidation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationEvent {
    /// Event timestamp
    pub ts: DateTime<Utc>,
    /// Liquidation price
    pub price: f64,
    /// Liquidated quantity (base-asset units)
    pub quantity: f64,
    /// Which side was closed
    pub side: LiquidationSide,
}

/// Single price level of an L2 book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderbookLevel {
    /// Level price
    pub price: f64,
    /// Resting quantity at this price
    pub quantity: f64,
}

/// L2 orderbook snapshot
///
/// Invariant: `bids` sorted descending by price, `asks` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderbookSnapshot {
    /// Exchange sequence number of the snapshot
    pub last_update_id: u64,
    /// Snapshot timestamp
    pub ts: DateTime<Utc>,
    /// Bid levels, best (highest) first
    pub bids: Vec<OrderbookLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<OrderbookLevel>,
}

impl OrderbookSnapshot {
    /// Best bid level, if any
    #[must_use]
    pub fn best_bid(&self) -> Option<&OrderbookLevel> {
        self.bids.first()
    }

    /// Best ask level, if any
    #[must_use]
    pub fn best_ask(&self) -> Option<&OrderbookLevel> {
        self.asks.first()
    }

    /// Mid price, `None` when either side is empty
    #[must_use]
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price + ask.price) / 2.0),
            _ => None,
        }
    }
}

/// Clamp a volume/OI-like value to a finite non-negative number
///
/// Exchange feeds occasionally deliver NaN or null quantities; those are
/// treated as zero so they drop out of sums instead of poisoning them.
#[must_use]
pub fn sanitize_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}
