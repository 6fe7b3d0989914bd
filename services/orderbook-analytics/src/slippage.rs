//! Notional slippage estimation
//!
//! Walks the opposite side of the book consuming levels until a target
//! notional fills, then compares the average fill price to the best
//! price. A book too thin for the full notional reports a partial fill
//! with whatever liquidity existed; it never extrapolates or errors.

use serde::{Deserialize, Serialize};
use services_common::constants::PERCENT;
use services_common::types::market::sanitize_quantity;
use services_common::{OrderbookLevel, OrderbookSnapshot};
use tracing::debug;

/// Aggressor direction of the hypothetical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeDirection {
    /// Market buy consuming asks
    Buy,
    /// Market sell consuming bids
    Sell,
}

/// Result of a slippage walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlippageEstimate {
    /// Notional the walk tried to fill
    pub requested_notional: f64,
    /// Notional actually filled
    pub filled_notional: f64,
    /// Base quantity actually filled
    pub filled_quantity: f64,
    /// Average fill price
    pub average_price: f64,
    /// Best price on the consumed side
    pub best_price: f64,
    /// Adverse move of the average fill versus the best price, percent
    pub slippage_pct: f64,
    /// False when the book ran out before the notional filled
    pub fully_filled: bool,
}

/// Estimate slippage for a market order of `notional` quote units
///
/// Returns `None` when the consumed side is empty or the notional is not
/// a positive finite number.
#[must_use]
pub fn estimate_slippage(
    book: &OrderbookSnapshot,
    direction: TradeDirection,
    notional: f64,
) -> Option<SlippageEstimate> {
    if !notional.is_finite() || notional <= 0.0 {
        return None;
    }
    let levels: &[OrderbookLevel] = match direction {
        TradeDirection::Buy => &book.asks,
        TradeDirection::Sell => &book.bids,
    };
    let best_price = levels.first().map(|l| l.price)?;
    if !best_price.is_finite() || best_price <= 0.0 {
        return None;
    }

    let mut remaining = notional;
    let mut filled_notional = 0.0;
    let mut filled_quantity = 0.0;
    for level in levels {
        if remaining <= 0.0 {
            break;
        }
        let quantity = sanitize_quantity(level.quantity);
        if quantity == 0.0 || !level.price.is_finite() || level.price <= 0.0 {
            continue;
        }
        let level_notional = quantity * level.price;
        let take_notional = level_notional.min(remaining);
        filled_notional += take_notional;
        filled_quantity += take_notional / level.price;
        remaining -= take_notional;
    }

    if filled_quantity <= 0.0 {
        debug!("no fillable liquidity on the consumed side");
        return None;
    }

    let average_price = filled_notional / filled_quantity;
    let slippage_pct = match direction {
        TradeDirection::Buy => (average_price - best_price) / best_price * PERCENT,
        TradeDirection::Sell => (best_price - average_price) / best_price * PERCENT,
    };

    Some(SlippageEstimate {
        requested_notional: notional,
        filled_notional,
        filled_quantity,
        average_price,
        best_price,
        slippage_pct,
        fully_filled: remaining <= 1e-9,
    })
}
