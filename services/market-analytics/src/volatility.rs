//! Volatility regime assessment
//!
//! Combines ATR and annualized realized volatility, ranks the current
//! realized vol against a rolling history of window volatilities, and maps
//! the result to a regime with a strategy hint, a position-size multiplier
//! and a trust level for OI-based signals. Downstream signal filters
//! consume the warnings list.

use serde::{Deserialize, Serialize};
use services_common::constants::PERCENT;
use services_common::{Candle, Interval};
use tracing::debug;

use crate::config::VolatilityConfig;

/// Volatility regime label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityRegime {
    /// Quiet tape, mean reversion works
    Low,
    /// Normal trending conditions
    Medium,
    /// Elevated volatility, breakout conditions
    High,
    /// Disorderly tape, stand aside
    Extreme,
    /// Not enough history for a read
    Insufficient,
}

/// Strategy suited to the regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyHint {
    /// Fade extremes back to value
    MeanReversion,
    /// Ride established direction
    TrendFollow,
    /// Trade range expansion
    Breakout,
    /// Do not trade
    StayOut,
}

/// How much OI-based signals can be trusted in this regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrustLevel {
    /// OI signals unreliable
    Low,
    /// OI signals usable with confirmation
    Medium,
    /// OI signals reliable
    High,
}

/// Full volatility assessment for a candle window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityAssessment {
    /// Regime label
    pub regime: VolatilityRegime,
    /// Strategy suited to the regime
    pub strategy: StrategyHint,
    /// Trust level for OI-derived signals
    pub trust: TrustLevel,
    /// Position-size multiplier for the regime
    pub size_multiplier: f64,
    /// Average true range over the ATR period
    pub atr: f64,
    /// ATR as a percentage of the last close
    pub atr_pct: f64,
    /// Annualized realized volatility of log returns
    pub realized_vol: f64,
    /// Percentile of current realized vol within the rolling history (0-100)
    pub percentile: f64,
    /// Fixed explanation of the classification
    pub reasoning: String,
    /// Warnings consumed by downstream signal filters
    pub warnings: Vec<String>,
}

impl VolatilityAssessment {
    fn insufficient(bars: usize, required: usize) -> Self {
        Self {
            regime: VolatilityRegime::Insufficient,
            strategy: StrategyHint::StayOut,
            trust: TrustLevel::Low,
            size_multiplier: 0.0,
            atr: 0.0,
            atr_pct: 0.0,
            realized_vol: 0.0,
            percentile: 50.0,
            reasoning: "Insufficient history for a volatility read".to_string(),
            warnings: vec![format!(
                "Only {bars} bars available, {required} required; treat all signals as unreliable"
            )],
        }
    }
}

/// True range of a bar given the previous close
fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    let hl = candle.high - candle.low;
    let hc = (candle.high - prev_close).abs();
    let lc = (candle.low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Mean true range over the trailing `period` bars
fn average_true_range(candles: &[Candle], period: usize) -> f64 {
    if candles.len() < period + 1 || period == 0 {
        return 0.0;
    }
    let start = candles.len() - period;
    let sum: f64 = (start..candles.len())
        .map(|i| true_range(&candles[i], candles[i - 1].close))
        .sum();
    sum / period as f64
}

/// Population standard deviation of log returns over the window ending at
/// `end` (exclusive), spanning `period` returns
fn window_volatility(candles: &[Candle], end: usize, period: usize) -> Option<f64> {
    if end < period + 1 || period < 2 {
        return None;
    }
    let returns: Vec<f64> = (end - period..end)
        .map(|i| (candles[i].close / candles[i - 1].close).ln())
        .filter(|r| r.is_finite())
        .collect();
    if returns.len() < 2 {
        return None;
    }
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Fraction of historical values at or below `current`, as a percentile
fn percentile_rank(history: &[f64], current: f64) -> f64 {
    if history.is_empty() {
        return 50.0;
    }
    let below = history.iter().filter(|v| **v <= current).count();
    below as f64 / history.len() as f64 * PERCENT
}

/// Assess the volatility regime of a candle window
///
/// Fewer than `config.min_bars` candles yields the degraded
/// [`VolatilityRegime::Insufficient`] assessment (trust Low, multiplier 0)
/// rather than an error.
#[must_use]
pub fn assess_volatility(
    candles: &[Candle],
    interval: Interval,
    config: &VolatilityConfig,
) -> VolatilityAssessment {
    if candles.len() < config.min_bars {
        debug!(
            bars = candles.len(),
            required = config.min_bars,
            "insufficient candles for volatility assessment"
        );
        return VolatilityAssessment::insufficient(candles.len(), config.min_bars);
    }

    let atr = average_true_range(candles, config.atr_period);
    let last_close = candles[candles.len() - 1].close;
    let atr_pct = if last_close > 0.0 { atr / last_close * PERCENT } else { 0.0 };

    let annualizer = interval.periods_per_day().sqrt();
    let current_vol = window_volatility(candles, candles.len(), config.rv_period)
        .map_or(0.0, |v| v * annualizer);

    // Rolling history of window volatilities ending one bar earlier each step
    let mut history = Vec::with_capacity(config.history_window);
    for back in 1..=config.history_window {
        if candles.len() < back {
            break;
        }
        let end = candles.len() - back;
        match window_volatility(candles, end, config.rv_period) {
            Some(v) => history.push(v * annualizer),
            None => break,
        }
    }
    let percentile = percentile_rank(&history, current_vol);

    let (regime, strategy, trust, size_multiplier, reasoning, warnings) = if percentile
        > config.extreme_percentile
        || atr_pct > config.extreme_atr_pct
    {
        (
            VolatilityRegime::Extreme,
            StrategyHint::StayOut,
            TrustLevel::Low,
            0.3,
            "Volatility at historical extremes; moves are disorderly and stop-driven".to_string(),
            vec![
                "OI positioning signals are unreliable in extreme volatility".to_string(),
                "Liquidation cascades can gap through stops".to_string(),
            ],
        )
    } else if percentile > config.high_percentile || atr_pct > config.high_atr_pct {
        (
            VolatilityRegime::High,
            StrategyHint::Breakout,
            TrustLevel::Medium,
            0.7,
            "Elevated volatility favors range-expansion entries over fading".to_string(),
            vec!["Reduce size; expect wider adverse excursions".to_string()],
        )
    } else if percentile > config.medium_percentile || atr_pct > config.medium_atr_pct {
        (
            VolatilityRegime::Medium,
            StrategyHint::TrendFollow,
            TrustLevel::High,
            1.0,
            "Orderly volatility; trends carry and OI reads are dependable".to_string(),
            Vec::new(),
        )
    } else {
        (
            VolatilityRegime::Low,
            StrategyHint::MeanReversion,
            TrustLevel::Medium,
            0.8,
            "Compressed volatility; fade extremes but watch for regime change".to_string(),
            vec!["Volatility compression often precedes expansion".to_string()],
        )
    };

    VolatilityAssessment {
        regime,
        strategy,
        trust,
        size_multiplier,
        atr,
        atr_pct,
        realized_vol: current_vol,
        percentile,
        reasoning,
        warnings,
    }
}
