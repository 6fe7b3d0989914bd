//! Depth, spread, imbalance and wall metrics

use serde::{Deserialize, Serialize};
use services_common::OrderbookSnapshot;
use services_common::constants::PERCENT;
use services_common::types::market::sanitize_quantity;

use crate::config::BookAnalyzerConfig;

/// Side of the book a level belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookSide {
    /// Resting buy interest
    Bid,
    /// Resting sell interest
    Ask,
}

/// One level annotated with running depth from the top of book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Level price
    pub price: f64,
    /// Quantity at the level
    pub quantity: f64,
    /// Quantity accumulated from the best price through this level
    pub cumulative: f64,
}

/// Cumulative depth per side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthProfile {
    /// Bid depth, best first
    pub bids: Vec<DepthLevel>,
    /// Ask depth, best first
    pub asks: Vec<DepthLevel>,
}

/// Running-sum depth over the first `max_levels` of each side
#[must_use]
pub fn cumulative_depth(book: &OrderbookSnapshot, max_levels: usize) -> DepthProfile {
    let accumulate = |levels: &[services_common::OrderbookLevel]| {
        let mut cumulative = 0.0;
        levels
            .iter()
            .take(max_levels)
            .map(|level| {
                cumulative += sanitize_quantity(level.quantity);
                DepthLevel {
                    price: level.price,
                    quantity: level.quantity,
                    cumulative,
                }
            })
            .collect()
    };
    DepthProfile {
        bids: accumulate(&book.bids),
        asks: accumulate(&book.asks),
    }
}

/// Spread metrics off the top of book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpreadMetrics {
    /// Best ask minus best bid
    pub spread: f64,
    /// Spread as percent of mid
    pub spread_pct: f64,
    /// Mid price
    pub mid_price: f64,
}

/// Spread off the best levels, `None` when either side is empty
#[must_use]
pub fn spread_metrics(book: &OrderbookSnapshot) -> Option<SpreadMetrics> {
    let bid = book.best_bid()?;
    let ask = book.best_ask()?;
    let mid = (bid.price + ask.price) / 2.0;
    if !mid.is_finite() || mid <= 0.0 {
        return None;
    }
    let spread = ask.price - bid.price;
    Some(SpreadMetrics {
        spread,
        spread_pct: spread / mid * PERCENT,
        mid_price: mid,
    })
}

/// Which side of the window carries more resting liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookDominance {
    /// Bid liquidity dominates
    BuyerDominant,
    /// Ask liquidity dominates
    SellerDominant,
    /// Neither side dominates
    Balanced,
}

/// Bid/ask liquidity balance over a depth window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceMetrics {
    /// Total bid quantity inside the window
    pub bid_liquidity: f64,
    /// Total ask quantity inside the window
    pub ask_liquidity: f64,
    /// Bid minus ask liquidity
    pub imbalance: f64,
    /// Imbalance over total, as percent (-100 to 100)
    pub imbalance_pct: f64,
    /// Dominance classification
    pub dominance: BookDominance,
}

/// Liquidity imbalance over the configured depth window
///
/// An empty or zero-quantity window yields zero imbalance and Balanced
/// rather than a division by zero.
#[must_use]
pub fn imbalance(book: &OrderbookSnapshot, config: &BookAnalyzerConfig) -> ImbalanceMetrics {
    let sum = |levels: &[services_common::OrderbookLevel]| -> f64 {
        levels
            .iter()
            .take(config.depth_window)
            .map(|l| sanitize_quantity(l.quantity))
            .sum()
    };
    let bid_liquidity = sum(&book.bids);
    let ask_liquidity = sum(&book.asks);
    let total = bid_liquidity + ask_liquidity;

    let imbalance = bid_liquidity - ask_liquidity;
    let imbalance_pct = if total > 0.0 {
        imbalance / total * PERCENT
    } else {
        0.0
    };

    let dominance = if imbalance_pct > config.dominance_threshold {
        BookDominance::BuyerDominant
    } else if imbalance_pct < -config.dominance_threshold {
        BookDominance::SellerDominant
    } else {
        BookDominance::Balanced
    };

    ImbalanceMetrics {
        bid_liquidity,
        ask_liquidity,
        imbalance,
        imbalance_pct,
        dominance,
    }
}

/// A level carrying outsized resting quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityWall {
    /// Level price
    pub price: f64,
    /// Quantity at the level
    pub quantity: f64,
    /// Side the wall sits on
    pub side: BookSide,
    /// Quantity as percent of that side's total
    pub percent_of_side: f64,
}

/// Top levels by raw quantity across both sides, descending
#[must_use]
pub fn liquidity_walls(book: &OrderbookSnapshot, config: &BookAnalyzerConfig) -> Vec<LiquidityWall> {
    let side_total = |levels: &[services_common::OrderbookLevel]| -> f64 {
        levels.iter().map(|l| sanitize_quantity(l.quantity)).sum()
    };
    let bid_total = side_total(&book.bids);
    let ask_total = side_total(&book.asks);

    let mut walls: Vec<LiquidityWall> = Vec::with_capacity(book.bids.len() + book.asks.len());
    for (levels, side, total) in [
        (&book.bids, BookSide::Bid, bid_total),
        (&book.asks, BookSide::Ask, ask_total),
    ] {
        for level in levels.iter() {
            let quantity = sanitize_quantity(level.quantity);
            if quantity == 0.0 {
                continue;
            }
            walls.push(LiquidityWall {
                price: level.price,
                quantity,
                side,
                percent_of_side: if total > 0.0 { quantity / total * PERCENT } else { 0.0 },
            });
        }
    }

    walls.sort_by(|a, b| b.quantity.partial_cmp(&a.quantity).unwrap_or(std::cmp::Ordering::Equal));
    walls.truncate(config.wall_count);
    walls
}
