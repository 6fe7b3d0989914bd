//! Unit tests for the Black-Scholes fill-in

use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{TimeZone, Utc};
use options_analytics::black_scholes::{BlackScholes, backfill_chain};
use rstest::*;
use services_common::OptionSide;

use crate::fixtures::{chain_from, contract};

/// spot, strike, rate, volatility, time
#[fixture]
fn atm_params() -> (f64, f64, f64, f64, f64) {
    (100.0, 100.0, 0.05, 0.2, 0.25)
}

/// Central-difference delta for cross-checking the closed form
fn numerical_delta(side: OptionSide, s: f64, k: f64, r: f64, v: f64, t: f64, ds: f64) -> f64 {
    let up = BlackScholes::price(side, s + ds, k, r, v, t);
    let down = BlackScholes::price(side, s - ds, k, r, v, t);
    (up - down) / (2.0 * ds)
}

#[test]
fn norm_cdf_is_symmetric_around_zero() {
    assert_relative_eq!(BlackScholes::norm_cdf(0.0), 0.5);
    for x in [0.3, 1.0, 2.5] {
        assert_relative_eq!(
            BlackScholes::norm_cdf(-x),
            1.0 - BlackScholes::norm_cdf(x),
            epsilon = 1e-12
        );
    }
}

#[rstest]
fn put_call_parity_holds(atm_params: (f64, f64, f64, f64, f64)) {
    let (s, k, r, v, t) = atm_params;
    let call = BlackScholes::price(OptionSide::Call, s, k, r, v, t);
    let put = BlackScholes::price(OptionSide::Put, s, k, r, v, t);
    assert_relative_eq!(call - put, s - k * (-r * t).exp(), epsilon = 1e-9);
}

#[rstest]
#[case(90.0)]
#[case(100.0)]
#[case(115.0)]
fn delta_bounds_hold(#[case] strike: f64) {
    let call = BlackScholes::delta(OptionSide::Call, 100.0, strike, 0.05, 0.3, 0.25);
    let put = BlackScholes::delta(OptionSide::Put, 100.0, strike, 0.05, 0.3, 0.25);
    assert!((0.0..=1.0).contains(&call));
    assert!((-1.0..=0.0).contains(&put));
    // Call and put delta differ by exactly one under the same inputs
    assert_relative_eq!(call - put, 1.0, epsilon = 1e-12);
}

#[rstest]
fn closed_form_delta_matches_numerical(atm_params: (f64, f64, f64, f64, f64)) {
    let (s, k, r, v, t) = atm_params;
    for side in [OptionSide::Call, OptionSide::Put] {
        let closed = BlackScholes::delta(side, s, k, r, v, t);
        let numerical = numerical_delta(side, s, k, r, v, t, 0.01);
        assert_abs_diff_eq!(closed, numerical, epsilon = 1e-4);
    }
}

#[rstest]
fn gamma_is_positive_atm(atm_params: (f64, f64, f64, f64, f64)) {
    let (s, k, r, v, t) = atm_params;
    assert!(BlackScholes::gamma(s, k, r, v, t) > 0.0);
}

#[test]
fn expired_options_price_at_intrinsic() {
    assert_relative_eq!(
        BlackScholes::price(OptionSide::Call, 110.0, 100.0, 0.05, 0.2, 0.0),
        10.0
    );
    assert_relative_eq!(
        BlackScholes::price(OptionSide::Put, 110.0, 100.0, 0.05, 0.2, 0.0),
        0.0
    );
}

#[test]
fn backfill_replaces_only_non_finite_greeks() {
    let chain = chain_from(
        100.0,
        vec![
            contract(100.0, OptionSide::Call, 0.5, f64::NAN, f64::NAN, 5.0, 100.0),
            contract(110.0, OptionSide::Call, 0.5, 0.35, 0.02, 2.0, 100.0),
        ],
    );
    let now = Utc.with_ymd_and_hms(2026, 2, 27, 8, 0, 0).unwrap();
    let filled = backfill_chain(&chain, 0.05, now);

    let atm = &filled.calls[0];
    assert!(atm.delta.is_finite());
    assert!((0.0..=1.0).contains(&atm.delta));
    assert!(atm.gamma > 0.0);

    // Finite marks pass through untouched
    assert_relative_eq!(filled.calls[1].delta, 0.35);
    assert_relative_eq!(filled.calls[1].gamma, 0.02);
}

#[test]
fn backfill_zeroes_greeks_when_iv_is_unusable() {
    let chain = chain_from(
        100.0,
        vec![contract(100.0, OptionSide::Put, f64::NAN, f64::NAN, f64::NAN, 5.0, 100.0)],
    );
    let now = Utc.with_ymd_and_hms(2026, 2, 27, 8, 0, 0).unwrap();
    let filled = backfill_chain(&chain, 0.05, now);
    assert_eq!(filled.puts[0].delta, 0.0);
    assert_eq!(filled.puts[0].gamma, 0.0);
}
