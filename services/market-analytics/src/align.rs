//! Nearest-timestamp alignment of open interest onto candles
//!
//! OI polling runs on its own cadence, so the join is approximate: each
//! candle takes the OI sample closest to its open time, provided the gap
//! is inside a tolerance window. Candles with no sample inside tolerance
//! are dropped from the aligned series. Implemented over a sorted sample
//! array with binary search; semantics match a linear nearest scan.

use chrono::Duration;
use services_common::types::market::sanitize_quantity;
use services_common::{Candle, OpenInterestPoint};
use tracing::debug;

/// Candle joined with its nearest open-interest sample
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBar {
    /// The candle
    pub candle: Candle,
    /// Open interest nearest to the candle open time
    pub open_interest: f64,
}

/// Half the typical OI polling period, derived from the sample gaps
///
/// Falls back to 150 seconds (half a 5-minute poll) when fewer than two
/// samples exist.
#[must_use]
pub fn default_tolerance(points: &[OpenInterestPoint]) -> Duration {
    let mut gaps: Vec<i64> = points
        .windows(2)
        .map(|w| (w[1].ts - w[0].ts).num_milliseconds().abs())
        .filter(|gap| *gap > 0)
        .collect();
    if gaps.is_empty() {
        return Duration::seconds(150);
    }
    gaps.sort_unstable();
    Duration::milliseconds(gaps[gaps.len() / 2] / 2)
}

/// Join OI samples onto candles by nearest timestamp within `tolerance`
#[must_use]
pub fn align_open_interest(
    candles: &[Candle],
    points: &[OpenInterestPoint],
    tolerance: Duration,
) -> Vec<AlignedBar> {
    if candles.is_empty() || points.is_empty() {
        debug!("empty candle or OI series, nothing to align");
        return Vec::new();
    }

    let mut sorted: Vec<&OpenInterestPoint> = points.iter().collect();
    sorted.sort_by_key(|p| p.ts);

    let mut aligned = Vec::with_capacity(candles.len());
    for candle in candles {
        if !candle.has_valid_prices() {
            continue;
        }
        let idx = sorted.partition_point(|p| p.ts < candle.open_time);
        let below = idx.checked_sub(1).map(|i| sorted[i]);
        let above = sorted.get(idx).copied();

        let nearest = match (below, above) {
            (Some(b), Some(a)) => {
                let db = (candle.open_time - b.ts).num_milliseconds().abs();
                let da = (a.ts - candle.open_time).num_milliseconds().abs();
                if db <= da { b } else { a }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => continue,
        };

        let gap = (nearest.ts - candle.open_time).num_milliseconds().abs();
        if gap <= tolerance.num_milliseconds().abs() {
            aligned.push(AlignedBar {
                candle: candle.clone(),
                open_interest: sanitize_quantity(nearest.value),
            });
        }
    }

    debug!(
        candles = candles.len(),
        aligned = aligned.len(),
        "aligned open interest onto candles"
    );
    aligned
}
