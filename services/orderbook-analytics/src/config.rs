//! Orderbook analyzer configuration

use serde::{Deserialize, Serialize};

/// Thresholds for book analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAnalyzerConfig {
    /// Number of levels per side considered by the imbalance window
    pub depth_window: usize,

    /// |imbalance %| beyond which one side dominates
    pub dominance_threshold: f64,

    /// Number of liquidity walls reported
    pub wall_count: usize,
}

impl Default for BookAnalyzerConfig {
    fn default() -> Self {
        Self {
            depth_window: 10,
            dominance_threshold: 20.0,
            wall_count: 5,
        }
    }
}
