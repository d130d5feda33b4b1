//! Mean-element ephemeris
//!
//! Planet positions come from the JPL "Keplerian elements for approximate
//! positions of the major planets" (E. M. Standish): J2000 elements plus
//! linear rates per Julian century, solved on Kepler's equation. The table is
//! fitted to 1800–2050 AD; queries are answered from 1000 to 3000 AD so that
//! a full revolution of the outer planets can be traced, with accuracy
//! degrading slowly away from the fit interval.
//!
//! The Moon uses the leading terms of the Meeus lunar series and sidereal
//! time the IAU 1982 GMST expression. Accuracy is a few arcminutes for the
//! inner planets.

use super::{Body, Ephemeris, EphemerisError, Result};
use crate::constants::{DEG2RAD, J2000};
use crate::coordinates::angle::normalize_degrees;
use crate::coordinates::to_equatorial;
use crate::time::Time;
use nalgebra::Vector3;

/// Kilometres in one astronomical unit
const AU_KM: f64 = 149_597_870.700;

/// 1000-01-01T00:00 (Julian calendar) as a Julian date
const RANGE_START_JD: f64 = 2_086_307.5;
/// 3000-01-01T00:00 as a Julian date
const RANGE_END_JD: f64 = 2_816_787.5;

const KEPLER_TOLERANCE_DEG: f64 = 1e-9;
const KEPLER_MAX_ITERATIONS: usize = 32;

/// Mean elements at J2000 and their rates per Julian century
///
/// Order: a (AU), e, I (deg), L (deg), longitude of perihelion (deg),
/// longitude of ascending node (deg).
#[derive(Debug, Clone, Copy)]
struct MeanElements {
    at_epoch: [f64; 6],
    per_century: [f64; 6],
}

const MERCURY: MeanElements = MeanElements {
    at_epoch: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    per_century: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};

const VENUS: MeanElements = MeanElements {
    at_epoch: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    per_century: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};

const EARTH_MOON_BARYCENTER: MeanElements = MeanElements {
    at_epoch: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    per_century: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};

const MARS: MeanElements = MeanElements {
    at_epoch: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    per_century: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};

const JUPITER: MeanElements = MeanElements {
    at_epoch: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    per_century: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};

const SATURN: MeanElements = MeanElements {
    at_epoch: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    per_century: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};

const URANUS: MeanElements = MeanElements {
    at_epoch: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    per_century: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};

const NEPTUNE: MeanElements = MeanElements {
    at_epoch: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    per_century: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};

const PLUTO: MeanElements = MeanElements {
    at_epoch: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    per_century: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

impl MeanElements {
    /// Heliocentric position in the ecliptic J2000 frame, AU
    fn ecliptic_position(&self, centuries: f64) -> Vector3<f64> {
        let el: [f64; 6] =
            std::array::from_fn(|i| self.at_epoch[i] + self.per_century[i] * centuries);
        let (a, e, incl, mean_lon, peri_lon, node_lon) = (el[0], el[1], el[2], el[3], el[4], el[5]);

        let arg_peri = (peri_lon - node_lon) * DEG2RAD;
        let node = node_lon * DEG2RAD;
        let incl = incl * DEG2RAD;

        // Mean anomaly folded into (-180, 180]
        let mut mean_anomaly = normalize_degrees(mean_lon - peri_lon);
        if mean_anomaly > 180.0 {
            mean_anomaly -= 360.0;
        }
        let ecc_anomaly = solve_kepler(mean_anomaly, e) * DEG2RAD;

        // Position in the orbital plane, x towards perihelion
        let xp = a * (ecc_anomaly.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

        let (sw, cw) = arg_peri.sin_cos();
        let (so, co) = node.sin_cos();
        let (si, ci) = incl.sin_cos();

        Vector3::new(
            (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
            (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
            (sw * si) * xp + (cw * si) * yp,
        )
    }
}

/// Solve Kepler's equation `M = E - e sin E` for E, all angles in degrees
fn solve_kepler(mean_anomaly_deg: f64, e: f64) -> f64 {
    let e_star = e / DEG2RAD;
    let mut ecc = mean_anomaly_deg + e_star * (mean_anomaly_deg * DEG2RAD).sin();

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta_m = mean_anomaly_deg - (ecc - e_star * (ecc * DEG2RAD).sin());
        let delta_e = delta_m / (1.0 - e * (ecc * DEG2RAD).cos());
        ecc += delta_e;
        if delta_e.abs() <= KEPLER_TOLERANCE_DEG {
            break;
        }
    }
    ecc
}

/// Geocentric Moon position in the ecliptic J2000 frame, AU
fn moon_ecliptic_position(days: f64) -> Vector3<f64> {
    let mean_lon = 218.316 + 13.176_396 * days;
    let mean_anomaly = (134.963 + 13.064_993 * days) * DEG2RAD;
    let arg_lat = (93.272 + 13.229_350 * days) * DEG2RAD;

    let lon = (mean_lon + 6.289 * mean_anomaly.sin()) * DEG2RAD;
    let lat = (5.128 * arg_lat.sin()) * DEG2RAD;
    let dist = (385_001.0 - 20_905.0 * mean_anomaly.cos()) / AU_KM;

    let (slat, clat) = lat.sin_cos();
    Vector3::new(dist * clat * lon.cos(), dist * clat * lon.sin(), dist * slat)
}

/// Ephemeris built on JPL mean orbital elements
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        KeplerianEphemeris
    }

    /// Julian date range this ephemeris answers for
    pub fn valid_range(&self) -> (f64, f64) {
        (RANGE_START_JD, RANGE_END_JD)
    }

    fn check_range(&self, time: &Time) -> Result<()> {
        let jd = time.jd();
        if (RANGE_START_JD..RANGE_END_JD).contains(&jd) {
            Ok(())
        } else {
            Err(EphemerisError::OutOfRange {
                jd,
                start_jd: RANGE_START_JD,
                end_jd: RANGE_END_JD,
            })
        }
    }

    fn elements(body: Body) -> Option<&'static MeanElements> {
        match body {
            Body::Mercury => Some(&MERCURY),
            Body::Venus => Some(&VENUS),
            Body::Earth => Some(&EARTH_MOON_BARYCENTER),
            Body::Mars => Some(&MARS),
            Body::Jupiter => Some(&JUPITER),
            Body::Saturn => Some(&SATURN),
            Body::Uranus => Some(&URANUS),
            Body::Neptune => Some(&NEPTUNE),
            Body::Pluto => Some(&PLUTO),
            Body::Sun | Body::Moon => None,
        }
    }

    /// Heliocentric ecliptic position, AU
    fn helio_ecliptic(&self, body: Body, time: &Time) -> Result<Vector3<f64>> {
        self.check_range(time)?;
        let centuries = time.centuries_since_j2000();

        let position = match body {
            Body::Sun => Vector3::zeros(),
            Body::Moon => {
                EARTH_MOON_BARYCENTER.ecliptic_position(centuries)
                    + moon_ecliptic_position(time.days_since_j2000())
            }
            planet => match Self::elements(planet) {
                Some(elements) => elements.ecliptic_position(centuries),
                None => return Err(EphemerisError::UnsupportedBody(planet)),
            },
        };
        finite(body, position)
    }
}

fn finite(body: Body, v: Vector3<f64>) -> Result<Vector3<f64>> {
    if v.iter().all(|c| c.is_finite()) {
        Ok(v)
    } else {
        Err(EphemerisError::InvalidResult {
            body,
            detail: format!("non-finite vector {:?}", v),
        })
    }
}

impl Ephemeris for KeplerianEphemeris {
    fn heliocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>> {
        Ok(to_equatorial(&self.helio_ecliptic(body, time)?))
    }

    fn geocentric_vector(&self, body: Body, time: &Time) -> Result<Vector3<f64>> {
        let ecliptic = match body {
            Body::Earth => {
                self.check_range(time)?;
                Vector3::zeros()
            }
            Body::Moon => {
                self.check_range(time)?;
                moon_ecliptic_position(time.days_since_j2000())
            }
            _ => {
                let earth = self.helio_ecliptic(Body::Earth, time)?;
                self.helio_ecliptic(body, time)? - earth
            }
        };
        Ok(to_equatorial(&finite(body, ecliptic)?))
    }

    fn sidereal_time(&self, time: &Time) -> Result<f64> {
        let (whole, fraction) = time.jd_parts();
        let days = (whole - J2000) + fraction;
        let hours = (18.697_374_558 + 24.065_709_824_419_08 * days).rem_euclid(24.0);
        if hours.is_finite() {
            Ok(hours)
        } else {
            Err(EphemerisError::OutOfRange {
                jd: time.jd(),
                start_jd: f64::NEG_INFINITY,
                end_jd: f64::INFINITY,
            })
        }
    }
}
