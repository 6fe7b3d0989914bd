//! Analytics configuration
//!
//! Threshold sets for the time-series analyzers. Defaults carry the
//! production values; deserializable so deployments can override them
//! per symbol.

use serde::{Deserialize, Serialize};

/// Volume profile configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Fraction of total volume the value area must contain
    pub value_area_fraction: f64,

    /// Levels under this fraction of average volume count as low-volume nodes
    pub low_volume_fraction: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            value_area_fraction: 0.70,
            low_volume_fraction: 0.5,
        }
    }
}

/// Open-interest divergence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivergenceConfig {
    /// Rolling lookback window in bars
    pub lookback: usize,

    /// Minimum |relative price change| to classify
    pub price_threshold: f64,

    /// Minimum |relative OI change| to classify
    pub oi_threshold: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            price_threshold: 0.02,
            oi_threshold: 0.04,
        }
    }
}

/// Volatility regime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityConfig {
    /// ATR averaging period in bars
    pub atr_period: usize,

    /// Realized-volatility window in bars
    pub rv_period: usize,

    /// Number of rolling realized-vol samples ranked against
    pub history_window: usize,

    /// Minimum bars required for a non-degraded assessment
    pub min_bars: usize,

    /// Percentile above which the regime is Extreme
    pub extreme_percentile: f64,
    /// Percentile above which the regime is High
    pub high_percentile: f64,
    /// Percentile above which the regime is Medium
    pub medium_percentile: f64,

    /// ATR as % of price above which the regime is Extreme
    pub extreme_atr_pct: f64,
    /// ATR as % of price above which the regime is High
    pub high_atr_pct: f64,
    /// ATR as % of price above which the regime is Medium
    pub medium_atr_pct: f64,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            rv_period: 20,
            history_window: 30,
            min_bars: 50,
            extreme_percentile: 85.0,
            high_percentile: 60.0,
            medium_percentile: 30.0,
            extreme_atr_pct: 5.0,
            high_atr_pct: 3.0,
            medium_atr_pct: 1.5,
        }
    }
}

/// Liquidation cluster configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Intensity below which a cluster is Minimal
    pub minimal_intensity: f64,

    /// Long-liquidation ratio above which a cluster is a long squeeze
    pub long_squeeze_ratio: f64,

    /// Long-liquidation ratio below which a cluster is a short squeeze
    pub short_squeeze_ratio: f64,

    /// Intensity above which a cluster at a low-volume node is High risk
    pub hunting_intensity: f64,

    /// Profile levels under this fraction of average volume count as thin
    pub low_volume_fraction: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            minimal_intensity: 20.0,
            long_squeeze_ratio: 0.7,
            short_squeeze_ratio: 0.3,
            hunting_intensity: 70.0,
            low_volume_fraction: 0.5,
        }
    }
}
