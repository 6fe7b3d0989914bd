//! Options analytics configuration

use serde::{Deserialize, Serialize};

/// Greeks exposure aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposureConfig {
    /// Units of underlying per contract
    pub contract_multiplier: f64,

    /// Number of gamma walls reported
    pub wall_count: usize,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            contract_multiplier: 1.0,
            wall_count: 5,
        }
    }
}

/// Smile skew and IV regime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkewConfig {
    /// |put IV - call IV| beyond which the smile is skewed
    pub skew_threshold: f64,

    /// Strike percentile bounding the OTM buckets (0.2 = 20th/80th)
    pub otm_percentile: f64,

    /// Absolute ATM IV above which the regime is Expansion
    pub expansion_iv: f64,

    /// Absolute ATM IV below which the regime is Collapse
    pub collapse_iv: f64,
}

impl Default for SkewConfig {
    fn default() -> Self {
        Self {
            skew_threshold: 0.05,
            otm_percentile: 0.2,
            expansion_iv: 0.8,
            collapse_iv: 0.15,
        }
    }
}

/// Defensive strike detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsConfig {
    /// OI ratio beyond which a strike is defended
    pub ratio_threshold: f64,

    /// Minimum open interest on the defending side
    pub min_open_interest: f64,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: 1.5,
            min_open_interest: 100.0,
        }
    }
}
