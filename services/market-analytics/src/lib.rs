//! Market time-series analytics
//!
//! Pure, deterministic transforms over candle, open-interest and
//! liquidation history:
//! - Volume profile (POC, value area, Gaussian bands, mean-reversion setups)
//! - Open-interest / price divergence classification
//! - Volatility regime assessment (ATR, realized vol, percentile rank)
//! - Liquidation cluster and hunting-zone analysis
//!
//! Every function takes immutable snapshots and returns immutable result
//! records; "no data" conditions produce empty results, never errors.

#![warn(missing_docs)]

pub mod align;
pub mod config;
pub mod divergence;
pub mod liquidations;
pub mod volatility;
pub mod volume_profile;

pub use align::{AlignedBar, align_open_interest, default_tolerance};
pub use config::{ClusterConfig, DivergenceConfig, ProfileConfig, VolatilityConfig};
pub use divergence::{DivergenceKind, DivergenceSignal, detect_divergences};
pub use liquidations::{
    ClusterKind, HuntRisk, HuntingZone, LiquidationCluster, cluster_liquidations, hunting_zones,
};
pub use volatility::{
    StrategyHint, TrustLevel, VolatilityAssessment, VolatilityRegime, assess_volatility,
};
pub use volume_profile::{
    MeanReversionSetup, PriceZone, SetupDirection, SigmaBands, VolumeLevel, VolumeProfile,
    build_profile,
};
