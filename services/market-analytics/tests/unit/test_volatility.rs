//! Unit tests for the volatility regime classifier

use approx::assert_relative_eq;
use market_analytics::config::VolatilityConfig;
use market_analytics::volatility::{
    StrategyHint, TrustLevel, VolatilityRegime, assess_volatility,
};
use rstest::rstest;
use services_common::{Candle, Interval};

use crate::fixtures::candle;

/// Alternating +/- swing series with a fixed bar range
fn swing_candles(bars: usize, base: f64, swing: f64, range: f64) -> Vec<Candle> {
    (0..bars)
        .map(|i| {
            let close = if i % 2 == 0 { base } else { base * (1.0 + swing) };
            candle(i as i64, close, range, 1.0)
        })
        .collect()
}

#[test]
fn short_history_is_degraded_not_an_error() {
    let candles = swing_candles(10, 100.0, 0.01, 1.0);
    let assessment = assess_volatility(&candles, Interval::M5, &VolatilityConfig::default());

    assert_eq!(assessment.regime, VolatilityRegime::Insufficient);
    assert_eq!(assessment.strategy, StrategyHint::StayOut);
    assert_eq!(assessment.trust, TrustLevel::Low);
    assert_eq!(assessment.size_multiplier, 0.0);
    assert!(!assessment.warnings.is_empty());
}

#[test]
fn wide_ranges_classify_extreme() {
    // 10% bar ranges push ATR% far past the extreme threshold
    let candles = swing_candles(60, 100.0, 0.08, 10.0);
    let assessment = assess_volatility(&candles, Interval::M5, &VolatilityConfig::default());

    assert!(assessment.atr_pct > 5.0);
    assert_eq!(assessment.regime, VolatilityRegime::Extreme);
    assert_eq!(assessment.strategy, StrategyHint::StayOut);
    assert_eq!(assessment.trust, TrustLevel::Low);
    assert_relative_eq!(assessment.size_multiplier, 0.3);
    assert!(!assessment.warnings.is_empty());
}

#[test]
fn quiet_tail_after_volatile_head_classifies_low() {
    // 35 volatile bars, then a uniformly drifting quiet tail: the current
    // window's vol ranks near the bottom of the rolling history
    let mut candles: Vec<Candle> = (0..35)
        .map(|i| {
            let close = if i % 2 == 0 { 100.0 } else { 103.0 };
            candle(i as i64, close, 5.0, 1.0)
        })
        .collect();
    let mut price = 100.0;
    for i in 35..60 {
        price *= 1.0005;
        candles.push(candle(i as i64, price, 0.1, 1.0));
    }

    let assessment = assess_volatility(&candles, Interval::M5, &VolatilityConfig::default());
    assert!(assessment.atr_pct < 1.5);
    assert!(assessment.percentile < 30.0);
    assert_eq!(assessment.regime, VolatilityRegime::Low);
    assert_eq!(assessment.strategy, StrategyHint::MeanReversion);
    assert_relative_eq!(assessment.size_multiplier, 0.8);
}

#[rstest]
#[case(0.005, 0.5)]
#[case(0.02, 2.0)]
#[case(0.06, 6.0)]
fn regime_mapping_is_consistent_with_outputs(#[case] swing: f64, #[case] range: f64) {
    let config = VolatilityConfig::default();
    let candles = swing_candles(80, 100.0, swing, range);
    let a = assess_volatility(&candles, Interval::M5, &config);

    let expected = if a.percentile > config.extreme_percentile || a.atr_pct > config.extreme_atr_pct
    {
        VolatilityRegime::Extreme
    } else if a.percentile > config.high_percentile || a.atr_pct > config.high_atr_pct {
        VolatilityRegime::High
    } else if a.percentile > config.medium_percentile || a.atr_pct > config.medium_atr_pct {
        VolatilityRegime::Medium
    } else {
        VolatilityRegime::Low
    };
    assert_eq!(a.regime, expected);
    assert!((0.0..=100.0).contains(&a.percentile));
}

#[test]
fn annualization_scales_with_interval_cadence() {
    let candles = swing_candles(60, 100.0, 0.02, 1.0);
    let m5 = assess_volatility(&candles, Interval::M5, &VolatilityConfig::default());
    let h1 = assess_volatility(&candles, Interval::H1, &VolatilityConfig::default());

    assert!(m5.realized_vol > 0.0);
    // sqrt(288) / sqrt(24) = sqrt(12)
    assert_relative_eq!(
        m5.realized_vol / h1.realized_vol,
        12.0_f64.sqrt(),
        epsilon = 1e-9
    );
}
