//! Per-body position assembly
//!
//! Combines the projector and the astrological deriver into one
//! [`ProjectedPosition`] for a body at an instant. Positions are produced
//! fresh for every query and never mutated afterwards.

use crate::astrology::{is_retrograde, RetrogradeDeltaPolicy, ZodiacSign};
use crate::bodies::CelestialBody;
use crate::coordinates::{project, wheel_point, Point2};
use crate::ephemeris::{Body, Ephemeris, EphemerisError};
use crate::time::Time;
use serde::Serialize;
use thiserror::Error;

/// Error type for position computation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PositionError {
    /// A derived coordinate came out as NaN or infinite
    #[error("Non-finite {quantity} for {body}")]
    NonFinite { body: Body, quantity: &'static str },

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
}

impl PositionError {
    /// The oracle rejected the instant as outside its range
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            PositionError::Ephemeris(EphemerisError::OutOfRange { .. })
        )
    }
}

/// Result type for position computation
pub type Result<T> = std::result::Result<T, PositionError>;

/// Placement of a body on the chart wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelPosition {
    /// Geocentric ecliptic longitude in `[0, 360)`
    pub angle_deg: f64,
    pub point: Point2,
    pub zodiac_sign: ZodiacSign,
    pub retrograde: bool,
}

/// Where a body is drawn at one instant
///
/// Each view is `None` when the body is not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPosition {
    /// Scaled heliocentric position
    pub orbit: Option<Point2>,
    pub wheel: Option<WheelPosition>,
}

impl ProjectedPosition {
    /// Shown in neither view
    pub fn is_empty(&self) -> bool {
        self.orbit.is_none() && self.wheel.is_none()
    }
}

fn finite(body: Body, quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PositionError::NonFinite { body, quantity })
    }
}

/// Compute the projected position of `body` at `time`
///
/// `orbit_scale` is the body's orbit-view scale factor; the orbit coordinate
/// is left empty when it is `None` or the body is not in the orbit view.
/// The wheel placement is left empty for bodies not in the wheel view.
pub fn compute_position<E: Ephemeris>(
    ephemeris: &E,
    body: &CelestialBody,
    orbit_scale: Option<f64>,
    time: &Time,
    wheel_radius: f64,
    policy: RetrogradeDeltaPolicy,
) -> Result<ProjectedPosition> {
    let id = body.body;

    let orbit = match orbit_scale.filter(|_| body.included_in_orbit_view) {
        Some(scale) => {
            let point = project(&ephemeris.heliocentric_vector(id, time)?, scale);
            finite(id, "orbit x", point.x)?;
            finite(id, "orbit y", point.y)?;
            Some(point)
        }
        None => None,
    };

    let wheel = if body.included_in_wheel_view {
        Some(wheel_position(ephemeris, id, time, wheel_radius, policy)?)
    } else {
        None
    };

    Ok(ProjectedPosition { orbit, wheel })
}

fn wheel_position<E: Ephemeris>(
    ephemeris: &E,
    id: Body,
    time: &Time,
    wheel_radius: f64,
    policy: RetrogradeDeltaPolicy,
) -> Result<WheelPosition> {
    let angle_deg = finite(id, "ecliptic longitude", ephemeris.ecliptic_longitude(id, time)?)?;
    let point = wheel_point(angle_deg, wheel_radius);
    if !point.is_finite() {
        return Err(PositionError::NonFinite {
            body: id,
            quantity: "wheel point",
        });
    }

    Ok(WheelPosition {
        angle_deg,
        point,
        zodiac_sign: ZodiacSign::from_longitude(angle_deg),
        retrograde: is_retrograde(ephemeris, id, time, policy)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyCatalog;
    use crate::constants::WHEEL_RADIUS;
    use crate::ephemeris::{self, KeplerianEphemeris};
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    /// Oracle that reports NaN for Mars and otherwise defers to the Kepler model
    struct NanMars(KeplerianEphemeris);

    impl Ephemeris for NanMars {
        fn heliocentric_vector(&self, body: Body, time: &Time) -> ephemeris::Result<Vector3<f64>> {
            if body == Body::Mars {
                return Ok(Vector3::new(f64::NAN, 0.0, 0.0));
            }
            self.0.heliocentric_vector(body, time)
        }

        fn geocentric_vector(&self, body: Body, time: &Time) -> ephemeris::Result<Vector3<f64>> {
            self.0.geocentric_vector(body, time)
        }

        fn ecliptic_longitude(&self, body: Body, time: &Time) -> ephemeris::Result<f64> {
            if body == Body::Mars {
                return Ok(f64::NAN);
            }
            self.0.ecliptic_longitude(body, time)
        }

        fn sidereal_time(&self, time: &Time) -> ephemeris::Result<f64> {
            self.0.sidereal_time(time)
        }
    }

    #[test]
    fn test_position_fields_are_consistent() {
        let eph = KeplerianEphemeris::new();
        let catalog = BodyCatalog::default();
        let jupiter = catalog.get(Body::Jupiter).unwrap();
        let t = Time::j2000();

        let pos = compute_position(&eph, jupiter, Some(10.0), &t, WHEEL_RADIUS, Default::default())
            .unwrap();
        assert!(pos.orbit.is_some());
        let wheel = pos.wheel.unwrap();
        assert!((0.0..360.0).contains(&wheel.angle_deg));
        assert_eq!(wheel.zodiac_sign, ZodiacSign::from_longitude(wheel.angle_deg));

        let r = (wheel.point.x.powi(2) + wheel.point.y.powi(2)).sqrt();
        assert_abs_diff_eq!(r, WHEEL_RADIUS, epsilon = 1e-9);
    }

    #[test]
    fn test_wheel_only_body_has_no_orbit_point() {
        let eph = KeplerianEphemeris::new();
        let catalog = BodyCatalog::default();
        let moon = catalog.get(Body::Moon).unwrap();

        let pos = compute_position(&eph, moon, Some(10.0), &Time::j2000(), 150.0, Default::default())
            .unwrap();
        assert!(pos.orbit.is_none());
        assert!(!pos.wheel.unwrap().retrograde);
    }

    #[test]
    fn test_earth_has_no_wheel_placement() {
        let eph = KeplerianEphemeris::new();
        let catalog = BodyCatalog::default();
        let earth = catalog.get(Body::Earth).unwrap();

        let pos = compute_position(&eph, earth, Some(100.0), &Time::j2000(), 150.0, Default::default())
            .unwrap();
        assert!(pos.wheel.is_none());
        assert!(pos.orbit.is_some());
        assert!(!pos.is_empty());
    }

    #[test]
    fn test_wheel_flag_controls_wheel_placement() {
        let eph = KeplerianEphemeris::new();
        let catalog = BodyCatalog::default();
        let mars = catalog.get(Body::Mars).unwrap().clone();
        let t = Time::j2000();

        let hidden = mars.clone().with_wheel_view(false);
        let pos = compute_position(&eph, &hidden, Some(10.0), &t, 150.0, Default::default()).unwrap();
        assert!(pos.wheel.is_none());

        let pos = compute_position(&eph, &mars, Some(10.0), &t, 150.0, Default::default()).unwrap();
        assert!(pos.wheel.is_some());
    }

    #[test]
    fn test_non_finite_values_are_reported() {
        let eph = NanMars(KeplerianEphemeris::new());
        let catalog = BodyCatalog::default();
        let mars = catalog.get(Body::Mars).unwrap();

        let err = compute_position(&eph, mars, Some(1.0), &Time::j2000(), 150.0, Default::default())
            .unwrap_err();
        assert!(matches!(err, PositionError::NonFinite { body: Body::Mars, .. }));

        let err = compute_position(&eph, mars, None, &Time::j2000(), 150.0, Default::default())
            .unwrap_err();
        assert_eq!(
            err,
            PositionError::NonFinite {
                body: Body::Mars,
                quantity: "ecliptic longitude"
            }
        );
    }

    #[test]
    fn test_out_of_range_is_classified() {
        let eph = KeplerianEphemeris::new();
        let catalog = BodyCatalog::default();
        let venus = catalog.get(Body::Venus).unwrap();

        let err = compute_position(&eph, venus, None, &Time::from_jd(1.0e6), 150.0, Default::default())
            .unwrap_err();
        assert!(err.is_out_of_range());
    }
}
