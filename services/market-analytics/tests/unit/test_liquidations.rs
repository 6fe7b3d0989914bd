//! Unit tests for liquidation clustering and hunting zones

use chrono::{TimeZone, Utc};
use market_analytics::config::{ClusterConfig, ProfileConfig};
use market_analytics::liquidations::{
    ClusterKind, HuntRisk, cluster_liquidations, hunting_zones,
};
use market_analytics::volume_profile::build_profile;
use services_common::{LiquidationEvent, LiquidationSide};

use crate::fixtures::candle;

fn event(price: f64, quantity: f64, side: LiquidationSide) -> LiquidationEvent {
    LiquidationEvent {
        ts: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        price,
        quantity,
        side,
    }
}

#[test]
fn events_bucket_by_price_floor() {
    let events = vec![
        event(100.5, 1.0, LiquidationSide::Long),
        event(101.2, 2.0, LiquidationSide::Long),
        event(115.0, 4.0, LiquidationSide::Short),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].price, 100.0);
    assert_eq!(clusters[0].long_quantity, 3.0);
    assert_eq!(clusters[1].price, 110.0);
    assert_eq!(clusters[1].short_quantity, 4.0);
}

#[test]
fn long_heavy_cluster_is_a_long_squeeze() {
    let events = vec![
        event(100.0, 8.0, LiquidationSide::Long),
        event(100.5, 1.0, LiquidationSide::Short),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, ClusterKind::LongSqueeze);
    assert_eq!(clusters[0].intensity, 100.0);
    // net flow is short minus long: negative means net forced selling
    assert!(clusters[0].net_flow < 0.0);
}

#[test]
fn short_heavy_cluster_is_a_short_squeeze_with_positive_flow() {
    let events = vec![
        event(100.0, 1.0, LiquidationSide::Long),
        event(100.5, 9.0, LiquidationSide::Short),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());

    assert_eq!(clusters[0].kind, ClusterKind::ShortSqueeze);
    assert!(clusters[0].net_flow > 0.0);
}

#[test]
fn tiny_clusters_classify_minimal() {
    let events = vec![
        event(100.0, 100.0, LiquidationSide::Long),
        event(200.0, 0.1, LiquidationSide::Long),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());

    let small = clusters.iter().find(|c| c.price == 200.0).unwrap();
    assert!(small.intensity < 20.0);
    assert_eq!(small.kind, ClusterKind::Minimal);
}

#[test]
fn balanced_mix_classifies_balanced() {
    let events = vec![
        event(100.0, 5.0, LiquidationSide::Long),
        event(100.5, 5.0, LiquidationSide::Short),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());
    assert_eq!(clusters[0].kind, ClusterKind::Balanced);
}

#[test]
fn invalid_events_are_dropped() {
    let events = vec![
        event(f64::NAN, 5.0, LiquidationSide::Long),
        event(100.0, f64::NAN, LiquidationSide::Long),
        event(100.0, 5.0, LiquidationSide::Long),
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].long_quantity, 5.0);
}

#[test]
fn no_events_yield_no_clusters() {
    assert!(cluster_liquidations(&[], 10.0, &ClusterConfig::default()).is_empty());
}

#[test]
fn hunting_risk_combines_intensity_and_thin_volume() {
    // Profile: thick at 100 and 120, thin at 110
    let candles = vec![
        candle(0, 105.0, 0.0, 10.0),
        candle(1, 115.0, 0.0, 1.0),
        candle(2, 125.0, 0.0, 10.0),
    ];
    let profile = build_profile(&candles, 10.0, &ProfileConfig::default());

    let events = vec![
        event(110.5, 10.0, LiquidationSide::Long),  // thin node, max notional
        event(120.5, 8.0, LiquidationSide::Long),   // thick node, still intense
        event(100.5, 1.0, LiquidationSide::Short),  // thick node, weak
    ];
    let clusters = cluster_liquidations(&events, 10.0, &ClusterConfig::default());
    let zones = hunting_zones(&clusters, &profile, &ClusterConfig::default());

    let at = |price: f64| zones.iter().find(|z| z.price == price).unwrap();
    assert_eq!(at(110.0).risk, HuntRisk::High);
    assert!(at(110.0).at_low_volume_node);
    assert_eq!(at(120.0).risk, HuntRisk::Medium);
    assert_eq!(at(100.0).risk, HuntRisk::Low);
}
