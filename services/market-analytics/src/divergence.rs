//! Open-interest / price divergence classification
//!
//! A sliding-window classifier over the aligned candle+OI series: for each
//! bar it compares the relative close and OI changes across the lookback
//! window and labels the co-movement. Traps are positioning build-ups
//! (squeeze fuel); continuations are positioning unwinds. The detector is
//! stateless and recomputable from any sub-window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::AlignedBar;
use crate::config::DivergenceConfig;

/// Divergence classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivergenceKind {
    /// Price down, OI up: shorts accumulating into weakness, squeeze risk
    BearishTrap,
    /// Price up, OI up: longs accumulating into strength, squeeze risk
    BullishTrap,
    /// Price up, OI down: short covering fuels the move
    BullishContinuation,
    /// Price down, OI down: long liquidation fuels the move
    BearishContinuation,
}

impl DivergenceKind {
    /// Human-readable interpretation of the class
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            DivergenceKind::BearishTrap => {
                "Short accumulation into falling price; vulnerable to a short squeeze"
            }
            DivergenceKind::BullishTrap => {
                "Long accumulation into rising price; vulnerable to a long squeeze"
            }
            DivergenceKind::BullishContinuation => "Short covering is driving price higher",
            DivergenceKind::BearishContinuation => "Long liquidation is driving price lower",
        }
    }
}

/// One classified bar of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceSignal {
    /// Index of the bar inside the aligned series
    pub index: usize,
    /// Open time of the classified bar
    pub ts: DateTime<Utc>,
    /// Relative close change over the lookback window
    pub price_change: f64,
    /// Relative OI change over the lookback window
    pub oi_change: f64,
    /// Divergence class
    pub kind: DivergenceKind,
}

/// Classify every bar at index >= lookback; the latest signal is the last
/// element of the returned sequence
#[must_use]
pub fn detect_divergences(bars: &[AlignedBar], config: &DivergenceConfig) -> Vec<DivergenceSignal> {
    let w = config.lookback;
    if w == 0 || bars.len() <= w {
        debug!(bars = bars.len(), lookback = w, "series shorter than lookback");
        return Vec::new();
    }

    let mut signals = Vec::new();
    for i in w..bars.len() {
        let base_price = bars[i - w].candle.close;
        let base_oi = bars[i - w].open_interest;
        if base_price <= 0.0 || base_oi <= 0.0 {
            continue;
        }

        let price_change = (bars[i].candle.close - base_price) / base_price;
        let oi_change = (bars[i].open_interest - base_oi) / base_oi;
        if price_change.abs() <= config.price_threshold || oi_change.abs() <= config.oi_threshold {
            continue;
        }

        let kind = match (price_change > 0.0, oi_change > 0.0) {
            (false, true) => DivergenceKind::BearishTrap,
            (true, true) => DivergenceKind::BullishTrap,
            (true, false) => DivergenceKind::BullishContinuation,
            (false, false) => DivergenceKind::BearishContinuation,
        };

        signals.push(DivergenceSignal {
            index: i,
            ts: bars[i].candle.open_time,
            price_change,
            oi_change,
            kind,
        });
    }
    signals
}
