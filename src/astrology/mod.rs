//! Astrological quantities derived from ephemeris output
//!
//! - [`ZodiacSign`]: twelve 30° sectors of ecliptic longitude starting at Aries
//! - retrograde detection by finite difference of geocentric longitude
//!   ([`is_retrograde`], [`probe_retrograde`])
//! - the ascendant and midheaven angles of an [`Observer`]
//!
//! Retrograde detection compares the longitude now with the longitude a short
//! lookback earlier. It is an approximation of the sign of the longitude rate,
//! not the rate itself: within roughly one lookback window of a station the
//! classification can lag the true motion.

use crate::constants::{
    DEG2RAD, FULL_TURN_DEG, INNER_LOOKBACK_DAYS, MEAN_OBLIQUITY_DEG, OUTER_LOOKBACK_DAYS,
    RAD2DEG, SIGN_WIDTH_DEG,
};
use crate::coordinates::angle::{normalize_degrees, signed_delta_degrees};
use crate::ephemeris::{Body, Ephemeris, Result};
use crate::time::Time;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the twelve 30° sectors of the ecliptic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Signs in ecliptic order, Aries at 0°
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude given in degrees
    ///
    /// Any finite angle is accepted; it is folded into `[0, 360)` first.
    pub fn from_longitude(longitude_deg: f64) -> ZodiacSign {
        let index = (normalize_degrees(longitude_deg) / SIGN_WIDTH_DEG).floor() as usize;
        // NaN casts to 0; 360 cannot occur after normalisation
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Unicode glyph for the sign
    pub fn symbol(&self) -> char {
        match self {
            ZodiacSign::Aries => '♈',
            ZodiacSign::Taurus => '♉',
            ZodiacSign::Gemini => '♊',
            ZodiacSign::Cancer => '♋',
            ZodiacSign::Leo => '♌',
            ZodiacSign::Virgo => '♍',
            ZodiacSign::Libra => '♎',
            ZodiacSign::Scorpio => '♏',
            ZodiacSign::Sagittarius => '♐',
            ZodiacSign::Capricorn => '♑',
            ZodiacSign::Aquarius => '♒',
            ZodiacSign::Pisces => '♓',
        }
    }

    /// Longitude at which the sign begins
    pub fn start_longitude(&self) -> f64 {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map_or(0.0, |i| i as f64 * SIGN_WIDTH_DEG)
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Sign containing `longitude_deg`
pub fn zodiac_sign(longitude_deg: f64) -> ZodiacSign {
    ZodiacSign::from_longitude(longitude_deg)
}

/// How the longitude difference is compared against zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrogradeDeltaPolicy {
    /// Fold the difference into `(-180, 180]` so a crossing of 0° reads as
    /// a small eastward step
    #[default]
    Normalized,
    /// Plain subtraction; a crossing of 0° reads as retrograde
    Raw,
}

impl RetrogradeDeltaPolicy {
    pub fn delta(&self, now_deg: f64, before_deg: f64) -> f64 {
        match self {
            RetrogradeDeltaPolicy::Normalized => signed_delta_degrees(now_deg, before_deg),
            RetrogradeDeltaPolicy::Raw => now_deg - before_deg,
        }
    }
}

/// Lookback window used for `body`, or `None` if it is never retrograde
///
/// The Sun, the Moon and the Earth itself never show retrograde motion.
pub fn retrograde_lookback_days(body: Body) -> Option<f64> {
    match body {
        Body::Mercury | Body::Venus => Some(INNER_LOOKBACK_DAYS),
        Body::Mars | Body::Jupiter | Body::Saturn | Body::Uranus | Body::Neptune | Body::Pluto => {
            Some(OUTER_LOOKBACK_DAYS)
        }
        Body::Sun | Body::Moon | Body::Earth => None,
    }
}

/// Longitudes behind a retrograde decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrogradeProbe {
    pub lookback_days: f64,
    pub longitude_before: f64,
    pub longitude_now: f64,
    pub delta: f64,
}

impl RetrogradeProbe {
    /// Westward apparent motion over the lookback window
    pub fn is_retrograde(&self) -> bool {
        self.delta < 0.0
    }
}

/// Sample the longitudes used to classify `body` at `time`
///
/// Returns `Ok(None)` for bodies that are never retrograde.
pub fn probe_retrograde<E: Ephemeris>(
    ephemeris: &E,
    body: Body,
    time: &Time,
    policy: RetrogradeDeltaPolicy,
) -> Result<Option<RetrogradeProbe>> {
    let Some(lookback_days) = retrograde_lookback_days(body) else {
        return Ok(None);
    };

    let longitude_now = ephemeris.ecliptic_longitude(body, time)?;
    let longitude_before = ephemeris.ecliptic_longitude(body, &(*time - lookback_days))?;
    let delta = policy.delta(longitude_now, longitude_before);

    let probe = RetrogradeProbe {
        lookback_days,
        longitude_before,
        longitude_now,
        delta,
    };
    if probe.is_retrograde() {
        debug!(
            "{} retrograde at {}: {:.4}° -> {:.4}° (Δ {:.4}°)",
            body, time, longitude_before, longitude_now, delta
        );
    }
    Ok(Some(probe))
}

/// Whether `body` shows westward apparent motion at `time`
pub fn is_retrograde<E: Ephemeris>(
    ephemeris: &E,
    body: Body,
    time: &Time,
    policy: RetrogradeDeltaPolicy,
) -> Result<bool> {
    Ok(probe_retrograde(ephemeris, body, time, policy)?.is_some_and(|p| p.is_retrograde()))
}

/// Geographic position of the chart's observer
///
/// Coordinates are taken as given; no range checking is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observer {
    /// Latitude in degrees, north positive
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive
    pub longitude_deg: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// Local sidereal time in degrees, `[0, 360)`
pub fn local_sidereal_degrees(sidereal_hours: f64, longitude_deg: f64) -> f64 {
    normalize_degrees(sidereal_hours * 15.0 + longitude_deg)
}

/// Ascendant for a local sidereal time, latitude and obliquity, all degrees
pub fn ascendant_from_lst(lst_deg: f64, latitude_deg: f64, obliquity_deg: f64) -> f64 {
    let lst = lst_deg * DEG2RAD;
    let lat = latitude_deg * DEG2RAD;
    let eps = obliquity_deg * DEG2RAD;

    let asc = (-lst.cos()).atan2(lat.tan() * eps.sin() + lst.sin() * eps.cos());
    normalize_degrees(asc * RAD2DEG)
}

/// Ascendant angle at `time` for `observer`, in `[0, 360)` degrees
pub fn ascendant<E: Ephemeris>(ephemeris: &E, time: &Time, observer: &Observer) -> Result<f64> {
    ascendant_with_obliquity(ephemeris, time, observer, MEAN_OBLIQUITY_DEG)
}

/// Ascendant angle using an explicit obliquity
pub fn ascendant_with_obliquity<E: Ephemeris>(
    ephemeris: &E,
    time: &Time,
    observer: &Observer,
    obliquity_deg: f64,
) -> Result<f64> {
    let lst = local_sidereal_degrees(ephemeris.sidereal_time(time)?, observer.longitude_deg);
    Ok(ascendant_from_lst(lst, observer.latitude_deg, obliquity_deg))
}

/// Midheaven angle at `time` for `observer`: the local sidereal time in degrees
pub fn midheaven<E: Ephemeris>(ephemeris: &E, time: &Time, observer: &Observer) -> Result<f64> {
    Ok(local_sidereal_degrees(
        ephemeris.sidereal_time(time)?,
        observer.longitude_deg,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, ZodiacSign::Aries)]
    #[case(29.999, ZodiacSign::Aries)]
    #[case(30.0, ZodiacSign::Taurus)]
    #[case(95.0, ZodiacSign::Cancer)]
    #[case(359.999, ZodiacSign::Pisces)]
    #[case(360.0, ZodiacSign::Aries)]
    #[case(-15.0, ZodiacSign::Pisces)]
    fn test_zodiac_boundaries(#[case] angle: f64, #[case] expected: ZodiacSign) {
        assert_eq!(zodiac_sign(angle), expected);
    }

    #[test]
    fn test_zodiac_periodic() {
        for k in -3..=3 {
            for base in [0.0, 12.5, 29.999, 30.0, 181.0, 345.0] {
                assert_eq!(
                    zodiac_sign(base + 360.0 * k as f64),
                    zodiac_sign(base),
                    "angle {} k {}",
                    base,
                    k
                );
            }
        }
    }

    #[test]
    fn test_sign_metadata() {
        assert_eq!(ZodiacSign::Libra.start_longitude(), 180.0);
        assert_eq!(ZodiacSign::Leo.symbol(), '♌');
        assert_eq!(ZodiacSign::Sagittarius.to_string(), "Sagittarius");
        for (i, sign) in ZodiacSign::ALL.iter().enumerate() {
            assert_eq!(zodiac_sign(sign.start_longitude() + 1.0), *sign, "sign {}", i);
        }
    }

    #[test]
    fn test_lookback_windows() {
        assert_eq!(retrograde_lookback_days(Body::Mercury), Some(1.0));
        assert_eq!(retrograde_lookback_days(Body::Venus), Some(1.0));
        assert_eq!(retrograde_lookback_days(Body::Saturn), Some(7.0));
        assert_eq!(retrograde_lookback_days(Body::Sun), None);
        assert_eq!(retrograde_lookback_days(Body::Moon), None);
        assert_eq!(retrograde_lookback_days(Body::Earth), None);
    }

    #[test]
    fn test_delta_policies_at_wrap() {
        // 359.8° a week ago, 0.3° now: eastward motion across Aries 0°
        assert!(RetrogradeDeltaPolicy::Normalized.delta(0.3, 359.8) > 0.0);
        assert!(RetrogradeDeltaPolicy::Raw.delta(0.3, 359.8) < 0.0);
    }

    #[test]
    fn test_ascendant_regression() {
        // Latitude 0, LST 0: atan2(-1, 0) = -90° -> 270°
        assert_abs_diff_eq!(ascendant_from_lst(0.0, 0.0, MEAN_OBLIQUITY_DEG), 270.0, epsilon = 1e-12);
        assert_eq!(local_sidereal_degrees(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_ascendant_equator_quadrants() {
        // On the equator the ascendant leads the midheaven by a quarter turn at
        // the equinoctial points
        let asc = ascendant_from_lst(90.0, 0.0, MEAN_OBLIQUITY_DEG);
        assert!(signed_delta_degrees(asc, 0.0).abs() < 1e-9, "ascendant {}", asc);
        let asc = ascendant_from_lst(270.0, 0.0, MEAN_OBLIQUITY_DEG);
        assert!(signed_delta_degrees(asc, 180.0).abs() < 1e-9, "ascendant {}", asc);
    }

    #[test]
    fn test_local_sidereal_wraps_west_longitudes() {
        assert_abs_diff_eq!(local_sidereal_degrees(1.0, -30.0), 345.0, epsilon = 1e-12);
        assert_abs_diff_eq!(local_sidereal_degrees(23.0, 30.0), 15.0, epsilon = 1e-12);
    }
}
