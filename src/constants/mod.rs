//! Constants module for position and animation calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Milliseconds in a day
pub const DAY_MS: f64 = DAY_S * 1_000.0;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;
/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Degrees in a full turn
pub const FULL_TURN_DEG: f64 = 360.0;
/// Width of one zodiac sign in degrees
pub const SIGN_WIDTH_DEG: f64 = 30.0;

/// Obliquity of the ecliptic at J2000 (IAU 1976), used to rotate
/// equatorial J2000 vectors into the ecliptic plane
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291_1;
/// Mean obliquity used by the ascendant formula
pub const MEAN_OBLIQUITY_DEG: f64 = 23.4366;

// Display geometry
/// Radius given to the innermost orbit in the orbit view
pub const MIN_ORBIT_RADIUS: f64 = 50.0;
/// Radius given to the outermost orbit in the orbit view
pub const MAX_ORBIT_RADIUS: f64 = 300.0;
/// Radius of the natal-chart wheel
pub const WHEEL_RADIUS: f64 = 150.0;
/// Points sampled around each orbit path
pub const ORBIT_PATH_SAMPLES: usize = 360;

// Animation
/// Length of a date transition in milliseconds
pub const ANIMATION_DURATION_MS: u64 = 5_000;
/// Nominal display refresh rate used when none is given
pub const DEFAULT_REFRESH_HZ: f64 = 60.0;

// Retrograde lookback windows
/// Lookback for the fast inner planets, in days
pub const INNER_LOOKBACK_DAYS: f64 = 1.0;
/// Lookback for the slow outer planets, in days
pub const OUTER_LOOKBACK_DAYS: f64 = 7.0;

/// Pacific/Auckland daylight-time offset, the default input zone
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 13 * 60;
