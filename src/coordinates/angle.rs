//! # Angle helpers
//!
//! Wheel angles, ecliptic longitudes and sidereal angles are all carried as
//! plain `f64` degrees. This module owns the two normalisations every consumer
//! relies on:
//!
//! - [`normalize_degrees`] folds any finite angle into `[0, 360)`
//! - [`signed_delta_degrees`] gives the shortest signed rotation between two
//!   angles, in `(-180, 180]`
//!
//! ```rust
//! use skywheel::coordinates::angle::{normalize_degrees, signed_delta_degrees};
//!
//! assert_eq!(normalize_degrees(-90.0), 270.0);
//! assert_eq!(signed_delta_degrees(1.0, 359.0), 2.0);
//! ```

use crate::constants::FULL_TURN_DEG;

/// Fold an angle in degrees into `[0, 360)`
///
/// Non-finite input is returned unchanged so that callers can detect it with
/// their own validity check.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let folded = degrees.rem_euclid(FULL_TURN_DEG);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if folded >= FULL_TURN_DEG {
        0.0
    } else {
        folded
    }
}

/// Shortest signed rotation taking `from` to `to`, in `(-180, 180]` degrees
///
/// A positive result is eastward (increasing longitude) motion.
pub fn signed_delta_degrees(to: f64, from: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > FULL_TURN_DEG / 2.0 {
        delta - FULL_TURN_DEG
    } else {
        delta
    }
}
