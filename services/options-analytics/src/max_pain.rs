//! Max pain and the ATM-straddle expected move
//!
//! Max pain runs the O(N^2) writer-loss scan over candidate strikes; N is
//! a few hundred at most, and the quadratic scan keeps the lowest-strike
//! tie-break exact. Expected move requires both ATM contracts and fails
//! loudly when they are missing, since that indicates malformed upstream
//! data rather than an empty market.

use serde::{Deserialize, Serialize};
use services_common::constants::PERCENT;
use services_common::types::market::sanitize_quantity;
use services_common::{AnalyticsError, OptionsChain, Result};

/// Max pain scan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxPainResult {
    /// Strike minimizing aggregate writer loss
    pub strike: f64,
    /// Writer loss at that strike
    pub pain: f64,
    /// Signed distance from spot to max pain, percent of spot
    pub distance_pct: f64,
}

/// Expected move implied by the ATM straddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedMove {
    /// ATM strike the straddle is priced at
    pub atm_strike: f64,
    /// Call mark plus put mark at the ATM strike
    pub straddle_price: f64,
    /// Expected absolute move in quote units
    pub absolute: f64,
    /// Expected move as percent of spot
    pub percent_of_spot: f64,
}

/// Writer loss if price settles at `settle`
fn pain_at(chain: &OptionsChain, strikes: &[f64], settle: f64) -> f64 {
    let mut pain = 0.0;
    for &strike in strikes {
        if strike < settle {
            if let Some(put) = chain.put_at(strike) {
                pain += sanitize_quantity(put.open_interest) * (settle - strike);
            }
        } else if strike > settle {
            if let Some(call) = chain.call_at(strike) {
                pain += sanitize_quantity(call.open_interest) * (strike - settle);
            }
        }
    }
    pain
}

/// Find the strike minimizing aggregate option-writer loss
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyChain`] when the chain has no strikes.
pub fn max_pain(chain: &OptionsChain) -> Result<MaxPainResult> {
    let strikes = chain.strikes();
    if strikes.is_empty() {
        return Err(AnalyticsError::EmptyChain(chain.underlying.clone()));
    }

    // Linear scan; strict < keeps the lowest strike on ties
    let mut best_strike = strikes[0];
    let mut best_pain = pain_at(chain, &strikes, strikes[0]);
    for &candidate in &strikes[1..] {
        let pain = pain_at(chain, &strikes, candidate);
        if pain < best_pain {
            best_pain = pain;
            best_strike = candidate;
        }
    }

    let distance_pct = if chain.spot_price > 0.0 {
        (best_strike - chain.spot_price) / chain.spot_price * PERCENT
    } else {
        0.0
    };

    Ok(MaxPainResult {
        strike: best_strike,
        pain: best_pain,
        distance_pct,
    })
}

/// Expected move priced by the ATM straddle
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyChain`] for a chain with no strikes,
/// [`AnalyticsError::MissingAtmContract`] when either ATM side is absent,
/// and [`AnalyticsError::InvalidSnapshot`] for a non-positive spot.
pub fn expected_move(chain: &OptionsChain) -> Result<ExpectedMove> {
    let atm_strike = chain
        .atm_strike()
        .ok_or_else(|| AnalyticsError::EmptyChain(chain.underlying.clone()))?;

    let missing = || AnalyticsError::MissingAtmContract {
        underlying: chain.underlying.clone(),
        strike: atm_strike,
    };
    let call = chain.call_at(atm_strike).ok_or_else(|| missing())?;
    let put = chain.put_at(atm_strike).ok_or_else(|| missing())?;
    if !call.mark_price.is_finite() || !put.mark_price.is_finite() {
        return Err(missing());
    }

    if !chain.spot_price.is_finite() || chain.spot_price <= 0.0 {
        return Err(AnalyticsError::InvalidSnapshot(format!(
            "non-positive spot {} for {}",
            chain.spot_price, chain.underlying
        )));
    }

    let straddle_price = call.mark_price + put.mark_price;
    Ok(ExpectedMove {
        atm_strike,
        straddle_price,
        absolute: straddle_price,
        percent_of_spot: straddle_price / chain.spot_price * PERCENT,
    })
}
