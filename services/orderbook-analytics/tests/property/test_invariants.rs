//! Property-based invariants for book analytics

use proptest::prelude::*;

use orderbook_analytics::liquidity::cumulative_depth;
use orderbook_analytics::slippage::{TradeDirection, estimate_slippage};

use crate::fixtures::book;

/// Strategy: a plausible ask ladder (ascending prices, positive sizes)
fn ask_ladder() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.01f64..10.0, 0.1f64..50.0), 1..20).prop_map(|raw| {
        let mut price = 100.0;
        raw.into_iter()
            .map(|(step, quantity)| {
                price += step;
                (price, quantity)
            })
            .collect()
    })
}

proptest! {
    /// Cumulative depth is non-decreasing from the top of book
    #[test]
    fn cumulative_depth_is_monotonic(asks in ask_ladder()) {
        let book = book(&[], &asks);
        let depth = cumulative_depth(&book, usize::MAX);
        for pair in depth.asks.windows(2) {
            prop_assert!(pair[1].cumulative >= pair[0].cumulative);
        }
    }

    /// Buy slippage is never negative and grows with order size
    #[test]
    fn slippage_is_monotonic_in_size(asks in ask_ladder(), notional in 1.0f64..100_000.0) {
        let book = book(&[], &asks);
        let small = estimate_slippage(&book, TradeDirection::Buy, notional).unwrap();
        let large = estimate_slippage(&book, TradeDirection::Buy, notional * 2.0).unwrap();

        prop_assert!(small.slippage_pct >= -1e-9);
        prop_assert!(large.slippage_pct >= small.slippage_pct - 1e-9);
    }

    /// The walk never fills more notional than requested or than the book holds
    #[test]
    fn fills_are_bounded(asks in ask_ladder(), notional in 1.0f64..1_000_000.0) {
        let book_total: f64 = asks.iter().map(|&(p, q)| p * q).sum();
        let book = book(&[], &asks);
        let estimate = estimate_slippage(&book, TradeDirection::Buy, notional).unwrap();

        prop_assert!(estimate.filled_notional <= notional + 1e-6);
        prop_assert!(estimate.filled_notional <= book_total + 1e-6);
        prop_assert_eq!(estimate.fully_filled, notional <= book_total + 1e-9);
    }
}
