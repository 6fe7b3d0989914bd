//! Price-bucketed volume profile
//!
//! Builds a histogram of traded volume by price bucket, then derives the
//! point of control, the 70% value area and volume-weighted Gaussian
//! bands. The bands feed two consumers: price-zone classification with
//! mean-reversion setups, and the low-volume nodes used by liquidation
//! hunting-zone analysis.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use services_common::Candle;
use services_common::constants::PERCENT;
use services_common::types::market::sanitize_quantity;
use tracing::debug;

use crate::config::ProfileConfig;

/// One price bucket of the histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLevel {
    /// Bucket price (lower bound of the bucket)
    pub price: f64,
    /// Accumulated volume in the bucket
    pub volume: f64,
    /// Bucket volume as a percentage of total volume
    pub percentage: f64,
}

/// Volume-weighted Gaussian bands around the profile mean
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SigmaBands {
    /// Mean + 1 standard deviation
    pub plus_one: f64,
    /// Mean - 1 standard deviation
    pub minus_one: f64,
    /// Mean + 2 standard deviations
    pub plus_two: f64,
    /// Mean - 2 standard deviations
    pub minus_two: f64,
    /// Mean + 3 standard deviations
    pub plus_three: f64,
    /// Mean - 3 standard deviations
    pub minus_three: f64,
}

/// Volume profile over a candle window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    /// Histogram levels, ascending by price
    pub levels: Vec<VolumeLevel>,
    /// Point of control: bucket with maximum volume (lowest price on ties)
    pub poc: f64,
    /// Lower bound of the value area
    pub value_area_low: f64,
    /// Upper bound of the value area
    pub value_area_high: f64,
    /// Total volume across all buckets
    pub total_volume: f64,
    /// Volume-weighted mean bucket price
    pub mean: f64,
    /// Volume-weighted standard deviation of bucket prices
    pub std_dev: f64,
    /// Gaussian bands at 1, 2 and 3 standard deviations
    pub bands: SigmaBands,
}

impl VolumeProfile {
    /// Empty profile, the "no data" result
    #[must_use]
    pub fn empty() -> Self {
        Self {
            levels: Vec::new(),
            poc: 0.0,
            value_area_low: 0.0,
            value_area_high: 0.0,
            total_volume: 0.0,
            mean: 0.0,
            std_dev: 0.0,
            bands: SigmaBands::default(),
        }
    }

    /// True when no volume was bucketed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels whose volume is below `fraction` of the average level volume
    ///
    /// These are the thin spots of the profile where price historically
    /// moved fast; liquidation hunting zones key off them.
    #[must_use]
    pub fn low_volume_nodes(&self, fraction: f64) -> Vec<VolumeLevel> {
        if self.levels.is_empty() {
            return Vec::new();
        }
        let avg = self.total_volume / self.levels.len() as f64;
        self.levels
            .iter()
            .filter(|l| l.volume < fraction * avg)
            .cloned()
            .collect()
    }

    /// Profile level nearest to `price`, `None` for an empty profile
    #[must_use]
    pub fn nearest_level(&self, price: f64) -> Option<&VolumeLevel> {
        self.levels.iter().min_by(|a, b| {
            let da = (a.price - price).abs();
            let db = (b.price - price).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

/// Build a volume profile from candles with the given price bucket size
///
/// Each candle contributes its full volume to the bucket containing its
/// typical price `(high+low+close)/3`, with bucket boundaries at
/// `floor(tp / bucket_size) * bucket_size`. An empty candle window, a
/// non-positive bucket size or all-invalid bars produce the empty profile.
#[must_use]
pub fn build_profile(candles: &[Candle], bucket_size: f64, config: &ProfileConfig) -> VolumeProfile {
    if candles.is_empty() || !bucket_size.is_finite() || bucket_size <= 0.0 {
        debug!("no candles or invalid bucket size, returning empty profile");
        return VolumeProfile::empty();
    }

    let mut buckets: FxHashMap<i64, f64> = FxHashMap::default();
    for candle in candles {
        if !candle.has_valid_prices() {
            continue;
        }
        let volume = sanitize_quantity(candle.volume);
        if volume == 0.0 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let key = (candle.typical_price() / bucket_size).floor() as i64;
        *buckets.entry(key).or_insert(0.0) += volume;
    }

    if buckets.is_empty() {
        return VolumeProfile::empty();
    }

    let total_volume: f64 = buckets.values().sum();
    let mut levels: Vec<VolumeLevel> = buckets
        .into_iter()
        .map(|(key, volume)| VolumeLevel {
            price: key as f64 * bucket_size,
            volume,
            percentage: volume / total_volume * PERCENT,
        })
        .collect();
    levels.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));

    let poc_index = poc_index(&levels);
    let (va_low_index, va_high_index) =
        value_area(&levels, poc_index, total_volume, config.value_area_fraction);

    let mean = levels.iter().map(|l| l.price * l.volume).sum::<f64>() / total_volume;
    let variance = levels
        .iter()
        .map(|l| l.volume * (l.price - mean).powi(2))
        .sum::<f64>()
        / total_volume;
    let std_dev = variance.sqrt();

    VolumeProfile {
        poc: levels[poc_index].price,
        value_area_low: levels[va_low_index].price,
        value_area_high: levels[va_high_index].price,
        total_volume,
        mean,
        std_dev,
        bands: SigmaBands {
            plus_one: mean + std_dev,
            minus_one: mean - std_dev,
            plus_two: mean + 2.0 * std_dev,
            minus_two: mean - 2.0 * std_dev,
            plus_three: mean + 3.0 * std_dev,
            minus_three: mean - 3.0 * std_dev,
        },
        levels,
    }
}

/// Index of the maximum-volume level; ties resolve to the lowest price
fn poc_index(levels: &[VolumeLevel]) -> usize {
    let mut best = 0;
    for (i, level) in levels.iter().enumerate() {
        if level.volume > levels[best].volume {
            best = i;
        }
    }
    best
}

/// Greedy symmetric value-area expansion from the POC
///
/// Expands toward the neighboring bucket with the larger volume until the
/// accumulated volume first reaches the target fraction; exact ties prefer
/// the upward neighbor.
fn value_area(
    levels: &[VolumeLevel],
    poc_index: usize,
    total_volume: f64,
    fraction: f64,
) -> (usize, usize) {
    let target = fraction * total_volume;
    // Relative tolerance so float dust in `fraction * total` cannot force
    // one expansion past the first crossing
    let tolerance = 1e-9 * total_volume.max(1.0);
    let mut low = poc_index;
    let mut high = poc_index;
    let mut accumulated = levels[poc_index].volume;

    while accumulated + tolerance < target {
        let above = (high + 1 < levels.len()).then(|| levels[high + 1].volume);
        let below = (low > 0).then(|| levels[low - 1].volume);

        match (above, below) {
            (Some(up), Some(down)) => {
                if up >= down {
                    high += 1;
                    accumulated += up;
                } else {
                    low -= 1;
                    accumulated += down;
                }
            }
            (Some(up), None) => {
                high += 1;
                accumulated += up;
            }
            (None, Some(down)) => {
                low -= 1;
                accumulated += down;
            }
            (None, None) => break,
        }
    }

    (low, high)
}

/// Position of the current price relative to the Gaussian bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceZone {
    /// At or below mean - 2 sigma
    ExtremeDiscount,
    /// Between mean - 2 sigma and mean - 1 sigma
    Discount,
    /// Inside one sigma of the mean
    Fair,
    /// Between mean + 1 sigma and mean + 2 sigma
    Premium,
    /// At or above mean + 2 sigma
    ExtremePremium,
}

impl PriceZone {
    /// Classify a price against the profile bands
    #[must_use]
    pub fn classify(price: f64, bands: &SigmaBands) -> Self {
        if price <= bands.minus_two {
            PriceZone::ExtremeDiscount
        } else if price <= bands.minus_one {
            PriceZone::Discount
        } else if price >= bands.plus_two {
            PriceZone::ExtremePremium
        } else if price >= bands.plus_one {
            PriceZone::Premium
        } else {
            PriceZone::Fair
        }
    }
}

/// Trade direction of a mean-reversion setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetupDirection {
    /// Buy the discount, target the mean
    Long,
    /// Sell the premium, target the mean
    Short,
}

/// Mean-reversion trade idea derived from the band zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReversionSetup {
    /// Zone the current price sits in
    pub zone: PriceZone,
    /// Trade direction
    pub direction: SetupDirection,
    /// Entry price (current price)
    pub entry: f64,
    /// Target: the mean, or the nearer band in extreme zones
    pub target: f64,
    /// Stop: the next band out
    pub stop: f64,
    /// |target - entry| / |entry - stop|
    pub risk_reward: f64,
}

impl MeanReversionSetup {
    /// Derive a setup for the current price, `None` inside the fair zone
    /// or when the profile is degenerate (zero deviation)
    #[must_use]
    pub fn derive(profile: &VolumeProfile, current_price: f64) -> Option<Self> {
        if profile.is_empty() || profile.std_dev <= 0.0 || !current_price.is_finite() {
            return None;
        }
        let bands = &profile.bands;
        let zone = PriceZone::classify(current_price, bands);

        let (direction, target, stop) = match zone {
            PriceZone::Fair => return None,
            PriceZone::Discount => (SetupDirection::Long, profile.mean, bands.minus_two),
            PriceZone::ExtremeDiscount => (SetupDirection::Long, bands.minus_one, bands.minus_three),
            PriceZone::Premium => (SetupDirection::Short, profile.mean, bands.plus_two),
            PriceZone::ExtremePremium => (SetupDirection::Short, bands.plus_one, bands.plus_three),
        };

        let risk = (current_price - stop).abs();
        if risk <= 0.0 {
            return None;
        }
        Some(Self {
            zone,
            direction,
            entry: current_price,
            target,
            stop,
            risk_reward: (target - current_price).abs() / risk,
        })
    }
}
