//! Ephemeris oracle interface
//!
//! The engine never computes planetary positions itself: it asks an
//! [`Ephemeris`] for vectors and angles at an instant. Implementations must be
//! deterministic and side-effect free; the same `(body, time)` query has to
//! return bit-identical results every time.
//!
//! [`KeplerianEphemeris`] is the bundled implementation built on mean
//! orbital elements.

pub mod kepler;

pub use self::kepler::KeplerianEphemeris;

use crate::coordinates::wheel_angle;
use crate::time::Time;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for ephemeris queries
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    /// The requested date is outside the range the ephemeris covers
    #[error("Date {jd} is outside ephemeris range ({start_jd}..{end_jd})")]
    OutOfRange {
        /// The Julian date that was requested
        jd: f64,
        /// The start of the ephemeris range
        start_jd: f64,
        /// The end of the ephemeris range
        end_jd: f64,
    },

    /// The ephemeris has no data for this body
    #[error("Body not supported by this ephemeris: {0}")]
    UnsupportedBody(Body),

    /// A computation produced a value that is not a finite number
    #[error("Invalid result for {body}: {detail}")]
    InvalidResult { body: Body, detail: String },
}

/// Result type for ephemeris queries
pub type Result<T> = std::result::Result<T, EphemerisError>;

/// Enum representing the major solar system bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Body {
    /// Every body, ordered outward from the Sun with the Moon beside it
    pub const ALL: [Body; 11] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Moon => "Moon",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Body {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown body '{}'", s))
    }
}

/// Source of positions and angles for solar-system bodies
///
/// Vectors are in AU, expressed in the equatorial J2000 frame; use
/// [`crate::coordinates::to_ecliptic`] before projecting them.
pub trait Ephemeris {
    /// Position of `body` relative to the Sun
    fn heliocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>>;

    /// Position of `body` relative to the Earth
    fn geocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>>;

    /// Geocentric ecliptic longitude of `body` in `[0, 360)` degrees
    fn ecliptic_longitude(&self, body: Body, time: &Time) -> Result<f64> {
        Ok(wheel_angle(&self.geocentric_vector(body, time)?))
    }

    /// Greenwich sidereal time in hours
    fn sidereal_time(&self, time: &Time) -> Result<f64>;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn heliocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>> {
        (**self).heliocentric_vector(body, time)
    }

    fn geocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>> {
        (**self).geocentric_vector(body, time)
    }

    fn ecliptic_longitude(&self, body: Body, time: &Time) -> Result<f64> {
        (**self).ecliptic_longitude(body, time)
    }

    fn sidereal_time(&self, time: &Time) -> Result<f64> {
        (**self).sidereal_time(time)
    }
}
