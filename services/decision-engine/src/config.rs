//! Decision scorer configuration

use serde::{Deserialize, Serialize};

/// Factor weights and thresholds for the decision scorer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreConfig {
    /// Bars of history each factor looks back over
    pub lookback: usize,

    /// Weight of price momentum
    pub momentum_weight: f64,
    /// Weight of OI/price alignment
    pub alignment_weight: f64,
    /// Weight of the top-trader (smart money) ratio
    pub smart_money_weight: f64,
    /// Weight of taker buy/sell flow
    pub taker_flow_weight: f64,
    /// Weight of the funding-rate sign (deliberately capped low)
    pub funding_weight: f64,

    /// |score| at which Buy/Sell triggers
    pub action_threshold: f64,
    /// |score| at which confidence turns High
    pub strong_threshold: f64,

    /// Relative price change that saturates the momentum factor
    pub momentum_full_scale: f64,
    /// Top-trader ratio deviation from 1.0 that saturates smart money
    pub smart_money_full_scale: f64,
    /// |funding rate| under which funding reads neutral
    pub funding_neutral_band: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            momentum_weight: 25.0,
            alignment_weight: 25.0,
            smart_money_weight: 20.0,
            taker_flow_weight: 15.0,
            funding_weight: 8.0,
            action_threshold: 40.0,
            strong_threshold: 60.0,
            momentum_full_scale: 0.05,
            smart_money_full_scale: 0.5,
            funding_neutral_band: 1e-4,
        }
    }
}
