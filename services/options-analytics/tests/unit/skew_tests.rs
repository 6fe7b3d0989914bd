//! Unit tests for smile skew and IV regime

use approx::assert_relative_eq;
use options_analytics::config::SkewConfig;
use options_analytics::skew::{IvRegimeLabel, SkewDirection, analyze_skew, classify_iv_regime};
use services_common::OptionSide;

use crate::fixtures::{chain_from, contract};

#[test]
fn rich_atm_puts_classify_put_skew() {
    let chain = chain_from(
        100.0,
        vec![
            contract(100.0, OptionSide::Call, 0.60, 0.5, 0.02, 5.0, 100.0),
            contract(100.0, OptionSide::Put, 0.70, -0.5, 0.02, 5.0, 100.0),
        ],
    );
    let skew = analyze_skew(&chain, &SkewConfig::default()).expect("atm pair present");

    assert_relative_eq!(skew.atm_iv, 0.65);
    assert_relative_eq!(skew.skew, 0.10, epsilon = 1e-12);
    assert_eq!(skew.direction, SkewDirection::PutSkew);
}

#[test]
fn small_differences_classify_balanced() {
    let chain = chain_from(
        100.0,
        vec![
            contract(100.0, OptionSide::Call, 0.60, 0.5, 0.02, 5.0, 100.0),
            contract(100.0, OptionSide::Put, 0.62, -0.5, 0.02, 5.0, 100.0),
        ],
    );
    let skew = analyze_skew(&chain, &SkewConfig::default()).unwrap();
    assert_eq!(skew.direction, SkewDirection::Balanced);
}

#[test]
fn rich_atm_calls_classify_call_skew() {
    let chain = chain_from(
        100.0,
        vec![
            contract(100.0, OptionSide::Call, 0.62, 0.5, 0.02, 5.0, 100.0),
            contract(100.0, OptionSide::Put, 0.55, -0.5, 0.02, 5.0, 100.0),
        ],
    );
    let skew = analyze_skew(&chain, &SkewConfig::default()).unwrap();
    assert_eq!(skew.direction, SkewDirection::CallSkew);
}

#[test]
fn missing_atm_side_means_no_read() {
    let chain = chain_from(
        100.0,
        vec![contract(100.0, OptionSide::Call, 0.60, 0.5, 0.02, 5.0, 100.0)],
    );
    assert!(analyze_skew(&chain, &SkewConfig::default()).is_none());
}

#[test]
fn otm_buckets_compare_wing_averages() {
    let mut contracts = Vec::new();
    for strike in [80.0, 90.0, 100.0, 110.0, 120.0] {
        let put_iv = if strike <= 80.0 { 0.80 } else { 0.62 };
        let call_iv = if strike >= 120.0 { 0.60 } else { 0.61 };
        contracts.push(contract(strike, OptionSide::Put, put_iv, -0.4, 0.02, 5.0, 100.0));
        contracts.push(contract(strike, OptionSide::Call, call_iv, 0.4, 0.02, 5.0, 100.0));
    }
    let chain = chain_from(100.0, contracts);
    let skew = analyze_skew(&chain, &SkewConfig::default()).unwrap();

    let otm = skew.otm.expect("both wings populated");
    assert_relative_eq!(otm.put_bucket_iv, 0.80);
    assert_relative_eq!(otm.call_bucket_iv, 0.60);
    assert_relative_eq!(otm.skew, 0.20, epsilon = 1e-12);
    assert_eq!(otm.direction, SkewDirection::PutSkew);
}

#[test]
fn iv_regime_ranks_against_history() {
    let config = SkewConfig::default();
    let history = [0.2, 0.3, 0.4];

    let regime = classify_iv_regime(0.35, &history, &config);
    assert_eq!(regime.rank, 2);
    assert_relative_eq!(regime.percentile, 200.0 / 3.0, epsilon = 1e-9);
    assert_eq!(regime.label, IvRegimeLabel::Normal);
}

#[test]
fn absolute_thresholds_override_rank() {
    let config = SkewConfig::default();
    let history = [0.2, 0.3, 0.4];

    assert_eq!(
        classify_iv_regime(0.9, &history, &config).label,
        IvRegimeLabel::Expansion
    );
    assert_eq!(
        classify_iv_regime(0.1, &history, &config).label,
        IvRegimeLabel::Collapse
    );
}

#[test]
fn rank_extremes_classify_elevated_and_subdued() {
    let config = SkewConfig::default();
    let history = [0.30, 0.35, 0.40, 0.45, 0.50];

    assert_eq!(
        classify_iv_regime(0.60, &history, &config).label,
        IvRegimeLabel::Elevated
    );
    assert_eq!(
        classify_iv_regime(0.25, &history, &config).label,
        IvRegimeLabel::Subdued
    );
}

#[test]
fn empty_history_is_neutral() {
    let regime = classify_iv_regime(0.4, &[], &SkewConfig::default());
    assert_eq!(regime.rank, 0);
    assert_relative_eq!(regime.percentile, 50.0);
    assert_eq!(regime.label, IvRegimeLabel::Normal);
    assert!(!regime.implication.is_empty());
}
