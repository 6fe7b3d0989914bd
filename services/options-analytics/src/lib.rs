//! Options chain analytics
//!
//! Derived dealer-positioning metrics over a single-expiry options chain:
//! - Delta/gamma exposure per strike, dealer bias, gamma walls, delta flip
//! - Volatility smile skew (ATM and OTM-bucket variants) and IV regime
//! - Defensive support/resistance strikes from the OI skew
//! - Max pain and the ATM-straddle expected move
//! - Black-Scholes fill-in for contracts missing exchange Greeks
//!
//! The chain is assumed pre-filtered to one underlying and one expiry.

pub mod black_scholes;
pub mod config;
pub mod exposure;
pub mod levels;
pub mod max_pain;
pub mod skew;

pub use black_scholes::{BlackScholes, backfill_chain};
pub use config::{ExposureConfig, LevelsConfig, SkewConfig};
pub use exposure::{
    DealerBias, GammaWall, GreeksExposureProfile, StrikeExposure, aggregate_exposure,
};
pub use levels::{DefensiveLevel, LevelKind, defensive_levels};
pub use max_pain::{ExpectedMove, MaxPainResult, expected_move, max_pain};
pub use skew::{IvRegime, IvRegimeLabel, OtmSkew, SkewDirection, SmileSkew, analyze_skew, classify_iv_regime};
