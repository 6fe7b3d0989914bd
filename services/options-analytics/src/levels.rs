//! Defensive strikes from the open-interest skew
//!
//! A strike below spot with heavily put-dominant OI is being defended as
//! support; a strike above spot with call-dominant OI acts as resistance.
//! Strength scales with the OI ratio and caps at 100.

use serde::{Deserialize, Serialize};
use services_common::OptionsChain;
use services_common::types::market::sanitize_quantity;

use crate::config::LevelsConfig;

/// Side of spot a defensive level sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    /// Put-defended strike below spot
    Support,
    /// Call-defended strike above spot
    Resistance,
}

/// A defended strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveLevel {
    /// Strike price
    pub strike: f64,
    /// Support or resistance
    pub kind: LevelKind,
    /// Defending-side OI over opposing-side OI
    pub oi_ratio: f64,
    /// Open interest on the defending side
    pub defending_open_interest: f64,
    /// min(ratio x 20, 100)
    pub strength: f64,
}

/// Scan a chain for defended support and resistance strikes
#[must_use]
pub fn defensive_levels(chain: &OptionsChain, config: &LevelsConfig) -> Vec<DefensiveLevel> {
    let spot = chain.spot_price;
    if !spot.is_finite() || spot <= 0.0 {
        return Vec::new();
    }

    let mut levels = Vec::new();
    for strike in chain.strikes() {
        let call_oi = chain.call_at(strike).map_or(0.0, |c| sanitize_quantity(c.open_interest));
        let put_oi = chain.put_at(strike).map_or(0.0, |p| sanitize_quantity(p.open_interest));

        let (kind, defending, opposing) = if strike < spot {
            (LevelKind::Support, put_oi, call_oi)
        } else if strike > spot {
            (LevelKind::Resistance, call_oi, put_oi)
        } else {
            continue;
        };

        if defending < config.min_open_interest {
            continue;
        }
        // Zero opposing OI means the defense is unopposed; cap the ratio
        // rather than letting it run to infinity
        let oi_ratio = if opposing > 0.0 {
            defending / opposing
        } else {
            config.ratio_threshold * 100.0
        };
        if oi_ratio <= config.ratio_threshold {
            continue;
        }

        levels.push(DefensiveLevel {
            strike,
            kind,
            oi_ratio,
            defending_open_interest: defending,
            strength: (oi_ratio * 20.0).min(100.0),
        });
    }
    levels
}
