//! Shared numeric constants
//!
//! Single source of truth for magic numbers used across the analytics
//! crates.

// Time constants
/// Seconds per minute
pub const SECS_PER_MIN: u64 = 60;
/// Minutes per hour
pub const MINS_PER_HOUR: u64 = 60;
/// Hours per day
pub const HOURS_PER_DAY: u64 = 24;
/// Seconds per hour
pub const SECS_PER_HOUR: u64 = SECS_PER_MIN * MINS_PER_HOUR;
/// Seconds per day
pub const SECS_PER_DAY: u64 = SECS_PER_HOUR * HOURS_PER_DAY;

// Scaling
/// Percent scale factor (fraction -> percent)
pub const PERCENT: f64 = 100.0;

// Numeric tolerances
/// Generic float comparison tolerance
pub const EPSILON: f64 = 1e-9;
/// Tolerance when matching strikes across chain sides
pub const STRIKE_TOLERANCE: f64 = 1e-6;
