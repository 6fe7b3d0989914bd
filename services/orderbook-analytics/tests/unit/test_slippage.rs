//! Unit tests for the slippage walk

use approx::{assert_abs_diff_eq, assert_relative_eq};
use orderbook_analytics::slippage::{TradeDirection, estimate_slippage};

use crate::fixtures::book;

#[test]
fn small_orders_fill_at_the_best_level_with_no_slippage() {
    let book = book(&[(99.0, 10.0)], &[(101.0, 10.0)]);
    // 101 quote units buys 1.0 at the best ask
    let estimate = estimate_slippage(&book, TradeDirection::Buy, 101.0).unwrap();

    assert!(estimate.fully_filled);
    assert_relative_eq!(estimate.average_price, 101.0);
    assert_abs_diff_eq!(estimate.slippage_pct, 0.0, epsilon = 1e-12);
}

#[test]
fn walking_multiple_levels_lifts_the_average_price() {
    let book = book(&[], &[(100.0, 1.0), (110.0, 1.0)]);
    // Consume all of level one (100) and half of level two (55)
    let estimate = estimate_slippage(&book, TradeDirection::Buy, 155.0).unwrap();

    assert!(estimate.fully_filled);
    assert_relative_eq!(estimate.filled_quantity, 1.5);
    assert_relative_eq!(estimate.average_price, 155.0 / 1.5, epsilon = 1e-12);
    assert!(estimate.slippage_pct > 0.0);
}

#[test]
fn sell_side_walks_the_bids_downward() {
    let book = book(&[(100.0, 1.0), (90.0, 1.0)], &[]);
    let estimate = estimate_slippage(&book, TradeDirection::Sell, 145.0).unwrap();

    assert!(estimate.fully_filled);
    assert_relative_eq!(estimate.filled_quantity, 1.5);
    // Average below best bid: positive slippage for the seller
    assert!(estimate.average_price < 100.0);
    assert!(estimate.slippage_pct > 0.0);
}

#[test]
fn exhausted_books_report_partial_fills_without_error() {
    let book = book(&[], &[(100.0, 1.0)]);
    let estimate = estimate_slippage(&book, TradeDirection::Buy, 1_000_000.0).unwrap();

    assert!(!estimate.fully_filled);
    assert_relative_eq!(estimate.filled_notional, 100.0);
    assert_relative_eq!(estimate.filled_quantity, 1.0);
    assert_relative_eq!(estimate.average_price, 100.0);
}

#[test]
fn empty_sides_and_bad_notional_yield_no_estimate() {
    let book_empty = book(&[(99.0, 1.0)], &[]);
    assert!(estimate_slippage(&book_empty, TradeDirection::Buy, 100.0).is_none());

    let book_ok = book(&[(99.0, 1.0)], &[(101.0, 1.0)]);
    assert!(estimate_slippage(&book_ok, TradeDirection::Buy, 0.0).is_none());
    assert!(estimate_slippage(&book_ok, TradeDirection::Buy, f64::NAN).is_none());
    assert!(estimate_slippage(&book_ok, TradeDirection::Buy, -5.0).is_none());
}

#[test]
fn nan_quantity_levels_are_skipped_in_the_walk() {
    let book = book(&[], &[(100.0, f64::NAN), (110.0, 2.0)]);
    let estimate = estimate_slippage(&book, TradeDirection::Buy, 110.0).unwrap();
    assert_relative_eq!(estimate.average_price, 110.0);
    // Best price anchors at the top level even when it holds no quantity
    assert_relative_eq!(estimate.best_price, 100.0);
    assert!(estimate.slippage_pct > 0.0);
}
