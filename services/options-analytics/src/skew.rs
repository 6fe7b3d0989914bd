//! Volatility smile skew and IV regime
//!
//! Two skew reads: the ATM put/call IV difference, and a curve-level
//! variant comparing OTM-put and OTM-call bucket averages that is less
//! sensitive to the exact ATM strike. The IV regime ranks the current ATM
//! IV inside its own history and overrides by absolute level at the
//! extremes.

use serde::{Deserialize, Serialize};
use services_common::OptionsChain;
use services_common::constants::PERCENT;
use tracing::debug;

use crate::config::SkewConfig;

/// Which wing of the smile carries the premium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkewDirection {
    /// Downside protection bid: put IV rich versus calls
    PutSkew,
    /// Upside speculation bid: call IV rich versus puts
    CallSkew,
    /// No meaningful wing premium
    Balanced,
}

impl SkewDirection {
    fn classify(skew: f64, threshold: f64) -> Self {
        if skew > threshold {
            SkewDirection::PutSkew
        } else if skew < -threshold {
            SkewDirection::CallSkew
        } else {
            SkewDirection::Balanced
        }
    }
}

/// Curve-level skew from the OTM buckets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtmSkew {
    /// Average IV of the OTM put bucket (lowest-percentile strikes)
    pub put_bucket_iv: f64,
    /// Average IV of the OTM call bucket (highest-percentile strikes)
    pub call_bucket_iv: f64,
    /// Put bucket IV minus call bucket IV
    pub skew: f64,
    /// Classification at the same threshold as the ATM read
    pub direction: SkewDirection,
}

/// Smile skew analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileSkew {
    /// ATM strike the read is anchored to
    pub atm_strike: f64,
    /// Average of ATM call and put IV
    pub atm_iv: f64,
    /// ATM put IV
    pub atm_put_iv: f64,
    /// ATM call IV
    pub atm_call_iv: f64,
    /// ATM put IV minus ATM call IV
    pub skew: f64,
    /// Classification of the ATM read
    pub direction: SkewDirection,
    /// Curve-level OTM-bucket read, when both buckets are populated
    pub otm: Option<OtmSkew>,
}

/// Analyze the smile skew of a chain
///
/// Returns `None` when the chain is empty or the ATM strike lacks either
/// side; that is a "no signal" state, not an error.
#[must_use]
pub fn analyze_skew(chain: &OptionsChain, config: &SkewConfig) -> Option<SmileSkew> {
    let atm_strike = chain.atm_strike()?;
    let atm_call = chain.call_at(atm_strike)?;
    let atm_put = chain.put_at(atm_strike)?;
    if !atm_call.implied_volatility.is_finite() || !atm_put.implied_volatility.is_finite() {
        debug!(underlying = %chain.underlying, "non-finite ATM IV, no skew read");
        return None;
    }

    let atm_call_iv = atm_call.implied_volatility;
    let atm_put_iv = atm_put.implied_volatility;
    let skew = atm_put_iv - atm_call_iv;

    Some(SmileSkew {
        atm_strike,
        atm_iv: (atm_call_iv + atm_put_iv) / 2.0,
        atm_put_iv,
        atm_call_iv,
        skew,
        direction: SkewDirection::classify(skew, config.skew_threshold),
        otm: otm_skew(chain, config),
    })
}

/// OTM-bucket skew: average put IV at the lowest-percentile strikes vs
/// average call IV at the highest-percentile strikes
fn otm_skew(chain: &OptionsChain, config: &SkewConfig) -> Option<OtmSkew> {
    let strikes = chain.strikes();
    if strikes.len() < 3 {
        return None;
    }
    let last = strikes.len() - 1;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let low_cut = strikes[(last as f64 * config.otm_percentile).floor() as usize];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let high_cut = strikes[(last as f64 * (1.0 - config.otm_percentile)).ceil() as usize];

    let put_bucket: Vec<f64> = chain
        .puts
        .iter()
        .filter(|p| p.strike <= low_cut && p.implied_volatility.is_finite())
        .map(|p| p.implied_volatility)
        .collect();
    let call_bucket: Vec<f64> = chain
        .calls
        .iter()
        .filter(|c| c.strike >= high_cut && c.implied_volatility.is_finite())
        .map(|c| c.implied_volatility)
        .collect();
    if put_bucket.is_empty() || call_bucket.is_empty() {
        return None;
    }

    let put_bucket_iv = put_bucket.iter().sum::<f64>() / put_bucket.len() as f64;
    let call_bucket_iv = call_bucket.iter().sum::<f64>() / call_bucket.len() as f64;
    let skew = put_bucket_iv - call_bucket_iv;
    Some(OtmSkew {
        put_bucket_iv,
        call_bucket_iv,
        skew,
        direction: SkewDirection::classify(skew, config.skew_threshold),
    })
}

/// IV regime labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IvRegimeLabel {
    /// Absolute IV above the expansion threshold
    Expansion,
    /// IV rich versus its own history
    Elevated,
    /// Mid-range IV
    Normal,
    /// IV cheap versus its own history
    Subdued,
    /// Absolute IV below the collapse threshold
    Collapse,
}

impl IvRegimeLabel {
    /// Trading implication of the regime
    #[must_use]
    pub const fn implication(&self) -> &'static str {
        match self {
            IvRegimeLabel::Expansion => {
                "Options are pricing a violent move; selling premium is picking up pennies in front of it"
            }
            IvRegimeLabel::Elevated => "Premium is rich; favor spreads over outright longs",
            IvRegimeLabel::Normal => "Premium is fairly priced; direction matters more than vega",
            IvRegimeLabel::Subdued => "Premium is cheap; outright option buys are viable",
            IvRegimeLabel::Collapse => {
                "Volatility is washed out; long-vol structures are attractively priced ahead of expansion"
            }
        }
    }
}

/// IV regime classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvRegime {
    /// Current ATM IV
    pub current_iv: f64,
    /// Position of the current IV in the sorted history
    pub rank: usize,
    /// Percent of historical samples strictly below the current IV
    pub percentile: f64,
    /// Regime label
    pub label: IvRegimeLabel,
    /// Human-readable trading implication
    pub implication: String,
}

/// Rank the current ATM IV against its history and label the regime
///
/// An empty history is neutral: rank 0, 50th percentile. Absolute IV
/// thresholds override the rank at the extremes.
#[must_use]
pub fn classify_iv_regime(current_iv: f64, history: &[f64], config: &SkewConfig) -> IvRegime {
    let finite: Vec<f64> = history.iter().copied().filter(|v| v.is_finite()).collect();
    let (rank, percentile) = if finite.is_empty() {
        (0, 50.0)
    } else {
        let below = finite.iter().filter(|v| **v < current_iv).count();
        (below, below as f64 / finite.len() as f64 * PERCENT)
    };

    let label = if current_iv > config.expansion_iv {
        IvRegimeLabel::Expansion
    } else if current_iv < config.collapse_iv {
        IvRegimeLabel::Collapse
    } else if percentile > 80.0 {
        IvRegimeLabel::Elevated
    } else if percentile < 20.0 {
        IvRegimeLabel::Subdued
    } else {
        IvRegimeLabel::Normal
    };

    IvRegime {
        current_iv,
        rank,
        percentile,
        label,
        implication: label.implication().to_string(),
    }
}
