//! # Coordinate projection
//!
//! Turns the 3-D vectors produced by an [`Ephemeris`](crate::ephemeris::Ephemeris)
//! into the 2-D coordinates the two views draw with.
//!
//! Oracle vectors are expressed in the equatorial J2000 frame. Both views first
//! rotate them into the ecliptic frame with [`ecliptic_rotation`]:
//!
//! - the **orbit view** drops the ecliptic-normal axis and multiplies the
//!   remaining two by a per-body scale factor ([`project`])
//! - the **wheel view** only keeps the ecliptic longitude of the geocentric
//!   vector ([`wheel_angle`]) and places the body on a circle of fixed
//!   radius ([`wheel_point`])

pub mod angle;

use crate::constants::{DEG2RAD, OBLIQUITY_J2000_DEG, RAD2DEG};
use lazy_static::lazy_static;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use self::angle::normalize_degrees;

lazy_static! {
    /// Rotation from equatorial J2000 into ecliptic J2000
    static ref EQJ_TO_ECL: Rotation3<f64> =
        Rotation3::from_axis_angle(&Vector3::x_axis(), -OBLIQUITY_J2000_DEG * DEG2RAD);
}

/// A point in display space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The fixed equatorial-to-ecliptic J2000 rotation
pub fn ecliptic_rotation() -> &'static Rotation3<f64> {
    &EQJ_TO_ECL
}

/// Rotate an equatorial J2000 vector into the ecliptic frame
pub fn to_ecliptic(equatorial: &Vector3<f64>) -> Vector3<f64> {
    ecliptic_rotation() * equatorial
}

/// Rotate an ecliptic J2000 vector back into the equatorial frame
pub fn to_equatorial(ecliptic: &Vector3<f64>) -> Vector3<f64> {
    ecliptic_rotation().inverse() * ecliptic
}

/// Project an equatorial vector onto the ecliptic plane and scale it
pub fn project(equatorial: &Vector3<f64>, scale_factor: f64) -> Point2 {
    let ecliptic = to_ecliptic(equatorial);
    Point2::new(ecliptic.x * scale_factor, ecliptic.y * scale_factor)
}

/// Ecliptic longitude of an equatorial vector, in `[0, 360)` degrees
///
/// A vector with no extent in the ecliptic plane has no defined longitude;
/// it is reported as 0°.
pub fn wheel_angle(equatorial: &Vector3<f64>) -> f64 {
    let ecliptic = to_ecliptic(equatorial);
    if ecliptic.x == 0.0 && ecliptic.y == 0.0 {
        return 0.0;
    }
    normalize_degrees(ecliptic.y.atan2(ecliptic.x) * RAD2DEG)
}

/// Place an angle on the wheel of the given radius
pub fn wheel_point(angle_deg: f64, radius: f64) -> Point2 {
    let rad = angle_deg * DEG2RAD;
    Point2::new(radius * rad.cos(), radius * rad.sin())
}
