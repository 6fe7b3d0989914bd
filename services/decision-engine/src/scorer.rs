//! Multi-factor market scoring
//!
//! Each factor is computed from its own lookback window and contributes
//! a signed score inside its weight band: price momentum and OI/price
//! alignment carry the most, funding the least. Bullish minus bearish
//! contributions sum into one signed score; fixed thresholds pick the
//! action and confidence tier. Funding is read contrarian: persistent
//! positive funding means a crowded long side.

use serde::{Deserialize, Serialize};
use services_common::types::market::sanitize_quantity;
use services_common::{Candle, FundingRatePoint, TakerFlowPoint, TopTraderRatioPoint};
use tracing::debug;

use market_analytics::align::AlignedBar;
use market_analytics::config::DivergenceConfig;
use market_analytics::divergence::{DivergenceKind, detect_divergences};
use market_analytics::volatility::{StrategyHint, TrustLevel, VolatilityAssessment};
use options_analytics::exposure::{DealerBias, GreeksExposureProfile};
use orderbook_analytics::liquidity::{BookDominance, ImbalanceMetrics};

use crate::config::ScoreConfig;

/// Actionable call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Net score clears the bullish threshold
    Buy,
    /// Net score clears the bearish threshold
    Sell,
    /// No edge, or the volatility gate fired
    Wait,
}

/// Confidence tier of the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// |score| cleared the strong threshold
    High,
    /// |score| cleared the action threshold only
    Medium,
    /// Waiting; no directional conviction
    Low,
}

/// Scored factor identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Factor {
    /// Relative close change over the lookback
    PriceMomentum,
    /// OI/price co-movement class from the divergence detector
    OiAlignment,
    /// Top-trader long/short positioning
    SmartMoney,
    /// Aggressive taker buy/sell balance
    TakerFlow,
    /// Funding-rate sign, contrarian
    Funding,
}

/// One factor's contribution to the net score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    /// Which factor
    pub factor: Factor,
    /// Signed score inside the factor's weight band
    pub score: f64,
    /// Human-readable computation summary
    pub detail: String,
}

/// Final decision record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingDecision {
    /// The call
    pub action: Action,
    /// Confidence tier
    pub confidence: Confidence,
    /// Net signed score, clamped to [-100, 100]
    pub score: f64,
    /// Per-factor breakdown
    pub contributions: Vec<FactorContribution>,
    /// Position-size multiplier inherited from the volatility regime
    pub size_multiplier: f64,
    /// Volatility-regime warnings plus book/dealer cross-check warnings
    pub warnings: Vec<String>,
}

/// Immutable inputs to one scoring pass
#[derive(Debug, Clone, Copy)]
pub struct MarketInputs<'a> {
    /// Candle history, oldest first
    pub candles: &'a [Candle],
    /// Aligned candle+OI series for the alignment factor
    pub aligned: &'a [AlignedBar],
    /// Top-trader long/short ratio samples
    pub top_trader_ratio: &'a [TopTraderRatioPoint],
    /// Taker flow samples
    pub taker_flow: &'a [TakerFlowPoint],
    /// Funding rate samples
    pub funding: &'a [FundingRatePoint],
    /// Volatility assessment gating the decision, when available
    pub volatility: Option<&'a VolatilityAssessment>,
    /// Orderbook imbalance read, cross-checked against the call
    pub book_imbalance: Option<&'a ImbalanceMetrics>,
    /// Dealer Greeks exposure, cross-checked against the call
    pub greeks: Option<&'a GreeksExposureProfile>,
}

/// Score a market snapshot into a trading decision
#[must_use]
pub fn score_market(inputs: &MarketInputs<'_>, config: &ScoreConfig) -> TradingDecision {
    let contributions = vec![
        momentum_factor(inputs.candles, config),
        alignment_factor(inputs.aligned, config),
        smart_money_factor(inputs.top_trader_ratio, config),
        taker_flow_factor(inputs.taker_flow, config),
        funding_factor(inputs.funding, config),
    ];

    let score: f64 = contributions
        .iter()
        .map(|c| c.score)
        .sum::<f64>()
        .clamp(-100.0, 100.0);

    let (action, confidence) = if score >= config.action_threshold {
        (Action::Buy, tier(score, config))
    } else if score <= -config.action_threshold {
        (Action::Sell, tier(score, config))
    } else {
        (Action::Wait, Confidence::Low)
    };

    // The volatility regime gates the call and sizes the position
    let mut size_multiplier = 1.0;
    let mut warnings = Vec::new();
    let mut gated_action = action;
    let mut gated_confidence = confidence;
    if let Some(assessment) = inputs.volatility {
        size_multiplier = assessment.size_multiplier;
        warnings.clone_from(&assessment.warnings);
        if assessment.strategy == StrategyHint::StayOut || assessment.trust == TrustLevel::Low {
            if gated_action != Action::Wait {
                debug!(regime = ?assessment.regime, "volatility gate overrides directional call");
                warnings.push("Directional call suppressed by the volatility regime".to_string());
            }
            gated_action = Action::Wait;
            gated_confidence = Confidence::Low;
        }
    }

    // Book and dealer positioning do not move the score; they warn when
    // they stand against the directional call
    if let Some(book) = inputs.book_imbalance {
        match (gated_action, book.dominance) {
            (Action::Buy, BookDominance::SellerDominant) => {
                warnings.push("Resting book is seller-dominant against the long call".to_string());
            }
            (Action::Sell, BookDominance::BuyerDominant) => {
                warnings.push("Resting book is buyer-dominant against the short call".to_string());
            }
            _ => {}
        }
    }
    if let Some(greeks) = inputs.greeks {
        match (gated_action, greeks.dealer_bias) {
            (Action::Buy, DealerBias::NetLong) => {
                warnings.push("Dealer hedging pressure points down against the long call".to_string());
            }
            (Action::Sell, DealerBias::NetShort) => {
                warnings.push("Dealer hedging pressure points up against the short call".to_string());
            }
            _ => {}
        }
    }

    TradingDecision {
        action: gated_action,
        confidence: gated_confidence,
        score,
        contributions,
        size_multiplier,
        warnings,
    }
}

fn tier(score: f64, config: &ScoreConfig) -> Confidence {
    if score.abs() >= config.strong_threshold {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// Relative close change over the lookback, saturating at full scale
fn momentum_factor(candles: &[Candle], config: &ScoreConfig) -> FactorContribution {
    let (score, detail) = if candles.len() > config.lookback {
        let base = candles[candles.len() - 1 - config.lookback].close;
        let last = candles[candles.len() - 1].close;
        if base > 0.0 && last.is_finite() {
            let change = (last - base) / base;
            let score = (change / config.momentum_full_scale).clamp(-1.0, 1.0)
                * config.momentum_weight;
            (score, format!("close change {:+.2}% over {} bars", change * 100.0, config.lookback))
        } else {
            (0.0, "invalid close prices".to_string())
        }
    } else {
        (0.0, "insufficient candle history".to_string())
    };
    FactorContribution {
        factor: Factor::PriceMomentum,
        score,
        detail,
    }
}

/// Latest divergence class mapped onto the alignment weight
fn alignment_factor(aligned: &[AlignedBar], config: &ScoreConfig) -> FactorContribution {
    let divergence_config = DivergenceConfig {
        lookback: config.lookback,
        ..DivergenceConfig::default()
    };
    let signals = detect_divergences(aligned, &divergence_config);
    let (score, detail) = match signals.last() {
        Some(signal) => {
            let score = match signal.kind {
                DivergenceKind::BullishTrap | DivergenceKind::BullishContinuation => {
                    config.alignment_weight
                }
                DivergenceKind::BearishTrap | DivergenceKind::BearishContinuation => {
                    -config.alignment_weight
                }
            };
            (score, signal.kind.description().to_string())
        }
        None => (0.0, "no OI/price divergence inside thresholds".to_string()),
    };
    FactorContribution {
        factor: Factor::OiAlignment,
        score,
        detail,
    }
}

/// Mean top-trader ratio deviation from balance, saturating at full scale
fn smart_money_factor(points: &[TopTraderRatioPoint], config: &ScoreConfig) -> FactorContribution {
    let window = tail(points, config.lookback);
    let ratios: Vec<f64> = window
        .iter()
        .map(|p| p.long_short_ratio)
        .filter(|r| r.is_finite() && *r > 0.0)
        .collect();
    let (score, detail) = if ratios.is_empty() {
        (0.0, "no top-trader data".to_string())
    } else {
        let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
        let score = ((mean - 1.0) / config.smart_money_full_scale).clamp(-1.0, 1.0)
            * config.smart_money_weight;
        (score, format!("mean top-trader long/short ratio {mean:.2}"))
    };
    FactorContribution {
        factor: Factor::SmartMoney,
        score,
        detail,
    }
}

/// Taker buy share of total flow, saturating at the window extremes
fn taker_flow_factor(points: &[TakerFlowPoint], config: &ScoreConfig) -> FactorContribution {
    let window = tail(points, config.lookback);
    let mut buys = 0.0;
    let mut sells = 0.0;
    for point in window {
        buys += sanitize_quantity(point.buy_volume);
        sells += sanitize_quantity(point.sell_volume);
    }
    let total = buys + sells;
    let (score, detail) = if total > 0.0 {
        let share = buys / total;
        let score = ((share - 0.5) * 2.0).clamp(-1.0, 1.0) * config.taker_flow_weight;
        (score, format!("taker buy share {:.1}%", share * 100.0))
    } else {
        (0.0, "no taker flow".to_string())
    };
    FactorContribution {
        factor: Factor::TakerFlow,
        score,
        detail,
    }
}

/// Latest funding-rate sign, read contrarian
fn funding_factor(points: &[FundingRatePoint], config: &ScoreConfig) -> FactorContribution {
    let (score, detail) = match points.last() {
        Some(point) if point.rate.is_finite() => {
            if point.rate > config.funding_neutral_band {
                (
                    -config.funding_weight,
                    format!("positive funding {:+.4}%: crowded longs", point.rate * 100.0),
                )
            } else if point.rate < -config.funding_neutral_band {
                (
                    config.funding_weight,
                    format!("negative funding {:+.4}%: crowded shorts", point.rate * 100.0),
                )
            } else {
                (0.0, "funding near flat".to_string())
            }
        }
        _ => (0.0, "no funding data".to_string()),
    };
    FactorContribution {
        factor: Factor::Funding,
        score,
        detail,
    }
}

fn tail<T>(items: &[T], count: usize) -> &[T] {
    &items[items.len().saturating_sub(count)..]
}
