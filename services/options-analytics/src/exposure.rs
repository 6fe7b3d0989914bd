//! Delta and gamma exposure aggregation
//!
//! Maps a chain into per-strike dealer-hedging pressure. The sign
//! asymmetry is the documented business rule: call delta exposure enters
//! as given, put delta exposure is negated before netting (dealers carry
//! the opposite book on puts), while gamma exposure is summed across both
//! sides without sign flipping.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use services_common::OptionsChain;
use services_common::constants::EPSILON;
use services_common::types::market::sanitize_quantity;
use tracing::debug;

use crate::config::ExposureConfig;

/// Dealer positioning implied by the net delta exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerBias {
    /// Dealers net long: they sell futures to hedge, downward pressure
    NetLong,
    /// Dealers net short: they buy futures to hedge, upward pressure
    NetShort,
    /// No meaningful net exposure
    Neutral,
}

/// Exposure record for one strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeExposure {
    /// Strike price
    pub strike: f64,
    /// Call delta exposure, as given
    pub call_delta_exposure: f64,
    /// Put delta exposure after the sign convention (negated)
    pub put_delta_exposure: f64,
    /// Net delta exposure at this strike
    pub net_delta_exposure: f64,
    /// Gamma exposure summed across both sides, unflipped
    pub gamma_exposure: f64,
    /// Call open interest
    pub call_open_interest: f64,
    /// Put open interest
    pub put_open_interest: f64,
}

/// A high-|GEX| strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GammaWall {
    /// Strike price
    pub strike: f64,
    /// Gamma exposure at the strike
    pub gamma_exposure: f64,
    /// Positive GEX pins price to the strike; negative accelerates moves
    pub stabilizing: bool,
}

/// Chain-wide exposure profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeksExposureProfile {
    /// Per-strike exposures, ascending by strike
    pub strikes: Vec<StrikeExposure>,
    /// Sum of net delta exposure across all strikes
    pub total_net_delta_exposure: f64,
    /// Dealer bias implied by the total
    pub dealer_bias: DealerBias,
    /// Top strikes by |gamma exposure|, descending
    pub gamma_walls: Vec<GammaWall>,
    /// Strike where cumulative net delta exposure crosses zero, nearest
    /// to spot, linearly interpolated; `None` when it never crosses
    pub delta_flip: Option<f64>,
}

impl GreeksExposureProfile {
    /// Empty profile, the "no data" result
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strikes: Vec::new(),
            total_net_delta_exposure: 0.0,
            dealer_bias: DealerBias::Neutral,
            gamma_walls: Vec::new(),
            delta_flip: None,
        }
    }
}

/// Aggregate a chain into its per-strike exposure profile
#[must_use]
pub fn aggregate_exposure(chain: &OptionsChain, config: &ExposureConfig) -> GreeksExposureProfile {
    if chain.is_empty() {
        debug!(underlying = %chain.underlying, "empty chain, empty exposure profile");
        return GreeksExposureProfile::empty();
    }
    let multiplier = config.contract_multiplier;

    // strike key (micro-units) -> exposure accumulator
    let mut by_strike: FxHashMap<i64, StrikeExposure> = FxHashMap::default();

    for call in &chain.calls {
        if !call.strike.is_finite() || call.strike <= 0.0 {
            continue;
        }
        let oi = sanitize_quantity(call.open_interest);
        let delta = if call.delta.is_finite() { call.delta } else { 0.0 };
        let gamma = if call.gamma.is_finite() { call.gamma } else { 0.0 };
        let exposure = entry_for(&mut by_strike, call.strike);
        exposure.call_delta_exposure += delta * oi * multiplier;
        exposure.gamma_exposure += gamma * oi * multiplier;
        exposure.call_open_interest += oi;
    }
    for put in &chain.puts {
        if !put.strike.is_finite() || put.strike <= 0.0 {
            continue;
        }
        let oi = sanitize_quantity(put.open_interest);
        let delta = if put.delta.is_finite() { put.delta } else { 0.0 };
        let gamma = if put.gamma.is_finite() { put.gamma } else { 0.0 };
        let exposure = entry_for(&mut by_strike, put.strike);
        // Sign convention: put DE is negated before netting
        exposure.put_delta_exposure += -(delta * oi * multiplier);
        exposure.gamma_exposure += gamma * oi * multiplier;
        exposure.put_open_interest += oi;
    }

    let mut strikes: Vec<StrikeExposure> = by_strike.into_values().collect();
    for exposure in &mut strikes {
        exposure.net_delta_exposure = exposure.call_delta_exposure + exposure.put_delta_exposure;
    }
    strikes.sort_by(|a, b| a.strike.partial_cmp(&b.strike).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = strikes.iter().map(|s| s.net_delta_exposure).sum();
    let dealer_bias = if total > EPSILON {
        DealerBias::NetLong
    } else if total < -EPSILON {
        DealerBias::NetShort
    } else {
        DealerBias::Neutral
    };

    let mut walls: Vec<GammaWall> = strikes
        .iter()
        .filter(|s| s.gamma_exposure.abs() > 0.0)
        .map(|s| GammaWall {
            strike: s.strike,
            gamma_exposure: s.gamma_exposure,
            stabilizing: s.gamma_exposure >= 0.0,
        })
        .collect();
    walls.sort_by(|a, b| {
        b.gamma_exposure
            .abs()
            .partial_cmp(&a.gamma_exposure.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    walls.truncate(config.wall_count);

    let delta_flip = delta_flip_strike(&strikes, chain.spot_price);

    GreeksExposureProfile {
        total_net_delta_exposure: total,
        dealer_bias,
        gamma_walls: walls,
        delta_flip,
        strikes,
    }
}

/// Accumulator lookup keyed by strike in micro-units
fn entry_for(map: &mut FxHashMap<i64, StrikeExposure>, strike: f64) -> &mut StrikeExposure {
    #[allow(clippy::cast_possible_truncation)]
    let key = (strike * 1e6).round() as i64;
    map.entry(key).or_insert_with(|| StrikeExposure {
        strike,
        call_delta_exposure: 0.0,
        put_delta_exposure: 0.0,
        net_delta_exposure: 0.0,
        gamma_exposure: 0.0,
        call_open_interest: 0.0,
        put_open_interest: 0.0,
    })
}

/// Zero crossing of cumulative net DE over ascending strikes, nearest spot
fn delta_flip_strike(strikes: &[StrikeExposure], spot: f64) -> Option<f64> {
    let mut crossings = Vec::new();
    let mut cumulative = 0.0;
    let mut prev: Option<(f64, f64)> = None; // (strike, cumulative)

    for exposure in strikes {
        let next = cumulative + exposure.net_delta_exposure;
        if let Some((prev_strike, prev_cum)) = prev {
            if prev_cum != 0.0 && next != 0.0 && prev_cum.signum() != next.signum() {
                // Interpolate the crossing between the two strikes
                let span = next - prev_cum;
                let fraction = if span.abs() > EPSILON { -prev_cum / span } else { 0.5 };
                crossings.push(prev_strike + fraction * (exposure.strike - prev_strike));
            } else if next == 0.0 {
                crossings.push(exposure.strike);
            }
        }
        prev = Some((exposure.strike, next));
        cumulative = next;
    }

    crossings.into_iter().min_by(|a, b| {
        let da = (a - spot).abs();
        let db = (b - spot).abs();
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    })
}
