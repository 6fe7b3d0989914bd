//! Liquidation clustering and hunting-zone analysis
//!
//! Buckets forced-liquidation prints by price, classifies each bucket by
//! the long/short mix, and cross-references cluster intensity with the
//! volume profile's low-volume nodes to flag the zones price is most
//! likely to be pushed into.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use services_common::constants::PERCENT;
use services_common::types::market::sanitize_quantity;
use services_common::{LiquidationEvent, LiquidationSide};
use tracing::debug;

use crate::config::ClusterConfig;
use crate::volume_profile::VolumeProfile;

/// Cluster classification by long/short liquidation mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterKind {
    /// Too small to matter
    Minimal,
    /// Longs were flushed here (forced selling)
    LongSqueeze,
    /// Shorts were flushed here (forced buying)
    ShortSqueeze,
    /// Mixed two-sided liquidation
    Balanced,
}

/// Accumulated liquidations inside one price bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationCluster {
    /// Bucket price (lower bound)
    pub price: f64,
    /// Liquidated long quantity
    pub long_quantity: f64,
    /// Liquidated short quantity
    pub short_quantity: f64,
    /// Total notional value (sum of quantity x price)
    pub total_value: f64,
    /// Short minus long liquidated quantity (positive = net forced buying)
    pub net_flow: f64,
    /// Notional relative to the largest cluster, 0-100
    pub intensity: f64,
    /// Cluster classification
    pub kind: ClusterKind,
}

/// Bucket liquidation events by price and classify each bucket
#[must_use]
pub fn cluster_liquidations(
    events: &[LiquidationEvent],
    bucket_size: f64,
    config: &ClusterConfig,
) -> Vec<LiquidationCluster> {
    if events.is_empty() || !bucket_size.is_finite() || bucket_size <= 0.0 {
        debug!("no liquidation events or invalid bucket size");
        return Vec::new();
    }

    // key -> (long qty, short qty, notional)
    let mut buckets: FxHashMap<i64, (f64, f64, f64)> = FxHashMap::default();
    for event in events {
        if !event.price.is_finite() || event.price <= 0.0 {
            continue;
        }
        let quantity = sanitize_quantity(event.quantity);
        if quantity == 0.0 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let key = (event.price / bucket_size).floor() as i64;
        let entry = buckets.entry(key).or_insert((0.0, 0.0, 0.0));
        match event.side {
            LiquidationSide::Long => entry.0 += quantity,
            LiquidationSide::Short => entry.1 += quantity,
        }
        entry.2 += quantity * event.price;
    }

    if buckets.is_empty() {
        return Vec::new();
    }

    let max_value = buckets
        .values()
        .map(|(_, _, value)| *value)
        .fold(0.0_f64, f64::max);

    let mut clusters: Vec<LiquidationCluster> = buckets
        .into_iter()
        .map(|(key, (long_quantity, short_quantity, total_value))| {
            let intensity = if max_value > 0.0 {
                total_value / max_value * PERCENT
            } else {
                0.0
            };
            LiquidationCluster {
                price: key as f64 * bucket_size,
                long_quantity,
                short_quantity,
                total_value,
                net_flow: short_quantity - long_quantity,
                intensity,
                kind: classify_cluster(long_quantity, short_quantity, intensity, config),
            }
        })
        .collect();
    clusters.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(std::cmp::Ordering::Equal));
    clusters
}

fn classify_cluster(
    long_quantity: f64,
    short_quantity: f64,
    intensity: f64,
    config: &ClusterConfig,
) -> ClusterKind {
    if intensity < config.minimal_intensity {
        return ClusterKind::Minimal;
    }
    let total = long_quantity + short_quantity;
    if total <= 0.0 {
        return ClusterKind::Balanced;
    }
    let long_ratio = long_quantity / total;
    if long_ratio > config.long_squeeze_ratio {
        ClusterKind::LongSqueeze
    } else if long_ratio < config.short_squeeze_ratio {
        ClusterKind::ShortSqueeze
    } else {
        ClusterKind::Balanced
    }
}

/// Stop-hunt risk of a cluster location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HuntRisk {
    /// Neither thin volume nor heavy liquidations
    Low,
    /// Thin volume or heavy liquidations, not both
    Medium,
    /// Heavy liquidations sitting on a low-volume node
    High,
}

/// A liquidation cluster scored against the volume profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HuntingZone {
    /// Cluster bucket price
    pub price: f64,
    /// Cluster intensity, 0-100
    pub intensity: f64,
    /// True when the nearest profile level is a low-volume node
    pub at_low_volume_node: bool,
    /// Combined stop-hunt risk
    pub risk: HuntRisk,
}

/// Score clusters against the profile's low-volume nodes
///
/// A cluster sitting where the profile is thin AND with intensity above
/// the hunting threshold is High risk; either condition alone is Medium.
#[must_use]
pub fn hunting_zones(
    clusters: &[LiquidationCluster],
    profile: &VolumeProfile,
    config: &ClusterConfig,
) -> Vec<HuntingZone> {
    let avg_volume = if profile.levels.is_empty() {
        0.0
    } else {
        profile.total_volume / profile.levels.len() as f64
    };

    clusters
        .iter()
        .map(|cluster| {
            let at_low_volume_node = profile
                .nearest_level(cluster.price)
                .is_some_and(|level| level.volume < config.low_volume_fraction * avg_volume);
            let intense = cluster.intensity > config.hunting_intensity;
            let risk = match (at_low_volume_node, intense) {
                (true, true) => HuntRisk::High,
                (false, false) => HuntRisk::Low,
                _ => HuntRisk::Medium,
            };
            HuntingZone {
                price: cluster.price,
                intensity: cluster.intensity,
                at_low_volume_node,
                risk,
            }
        })
        .collect()
}
