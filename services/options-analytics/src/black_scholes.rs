//! Black-Scholes fill-in for missing exchange Greeks
//!
//! Exchange snapshots occasionally deliver contracts with NaN or null
//! Greeks while the mark IV is still usable. Before exposure aggregation
//! those contracts are backfilled with first-order Black-Scholes values
//! derived from the mark IV. This is deliberately not a pricing engine:
//! price, delta and gamma only.

use chrono::{DateTime, Utc};
use services_common::constants::SECS_PER_DAY;
use services_common::{OptionContract, OptionSide, OptionsChain};
use tracing::debug;

const SQRT_2PI: f64 = 2.5066282746310007;
const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes option mathematics
#[derive(Debug)]
pub struct BlackScholes;

impl BlackScholes {
    /// Standard normal cumulative distribution function
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
    }

    /// Standard normal probability density function
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / SQRT_2PI
    }

    /// d1 parameter
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, sigma: f64, time: f64) -> f64 {
        ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * time) / (sigma * time.sqrt())
    }

    /// d2 parameter
    #[must_use]
    pub fn d2(spot: f64, strike: f64, rate: f64, sigma: f64, time: f64) -> f64 {
        Self::d1(spot, strike, rate, sigma, time) - sigma * time.sqrt()
    }

    /// Theoretical option price; intrinsic value at or past expiry
    #[must_use]
    pub fn price(side: OptionSide, spot: f64, strike: f64, rate: f64, sigma: f64, time: f64) -> f64 {
        if time <= 0.0 || sigma <= 0.0 {
            return match side {
                OptionSide::Call => (spot - strike).max(0.0),
                OptionSide::Put => (strike - spot).max(0.0),
            };
        }
        let d1 = Self::d1(spot, strike, rate, sigma, time);
        let d2 = Self::d2(spot, strike, rate, sigma, time);
        let discount = (-rate * time).exp();
        match side {
            OptionSide::Call => spot * Self::norm_cdf(d1) - strike * discount * Self::norm_cdf(d2),
            OptionSide::Put => strike * discount * Self::norm_cdf(-d2) - spot * Self::norm_cdf(-d1),
        }
    }

    /// First-order delta
    #[must_use]
    pub fn delta(side: OptionSide, spot: f64, strike: f64, rate: f64, sigma: f64, time: f64) -> f64 {
        if time <= 0.0 || sigma <= 0.0 {
            let itm = match side {
                OptionSide::Call => spot > strike,
                OptionSide::Put => spot < strike,
            };
            return match (side, itm) {
                (OptionSide::Call, true) => 1.0,
                (OptionSide::Call, false) => 0.0,
                (OptionSide::Put, true) => -1.0,
                (OptionSide::Put, false) => 0.0,
            };
        }
        let nd1 = Self::norm_cdf(Self::d1(spot, strike, rate, sigma, time));
        match side {
            OptionSide::Call => nd1,
            OptionSide::Put => nd1 - 1.0,
        }
    }

    /// Gamma, identical for both sides
    #[must_use]
    pub fn gamma(spot: f64, strike: f64, rate: f64, sigma: f64, time: f64) -> f64 {
        if time <= 0.0 || sigma <= 0.0 || spot <= 0.0 {
            return 0.0;
        }
        Self::norm_pdf(Self::d1(spot, strike, rate, sigma, time)) / (spot * sigma * time.sqrt())
    }
}

/// Backfill non-finite delta/gamma marks from the contract's mark IV
///
/// Contracts whose IV is itself unusable get zeroed Greeks so they drop
/// out of exposure sums. Pure: `now` is an explicit input.
#[must_use]
pub fn backfill_chain(chain: &OptionsChain, rate: f64, now: DateTime<Utc>) -> OptionsChain {
    let time = (chain.expiry - now).num_seconds() as f64 / (DAYS_PER_YEAR * SECS_PER_DAY as f64);

    let fill = |contract: &OptionContract| -> OptionContract {
        if contract.delta.is_finite() && contract.gamma.is_finite() {
            return contract.clone();
        }
        let mut filled = contract.clone();
        let sigma = contract.implied_volatility;
        if sigma.is_finite() && sigma > 0.0 && chain.spot_price > 0.0 && contract.strike > 0.0 {
            debug!(symbol = %contract.symbol, "backfilling Greeks from mark IV");
            if !filled.delta.is_finite() {
                filled.delta =
                    BlackScholes::delta(contract.side, chain.spot_price, contract.strike, rate, sigma, time);
            }
            if !filled.gamma.is_finite() {
                filled.gamma = BlackScholes::gamma(chain.spot_price, contract.strike, rate, sigma, time);
            }
        } else {
            if !filled.delta.is_finite() {
                filled.delta = 0.0;
            }
            if !filled.gamma.is_finite() {
                filled.gamma = 0.0;
            }
        }
        filled
    };

    OptionsChain {
        underlying: chain.underlying.clone(),
        spot_price: chain.spot_price,
        expiry: chain.expiry,
        calls: chain.calls.iter().map(|c| fill(c)).collect(),
        puts: chain.puts.iter().map(|p| fill(p)).collect(),
    }
}
