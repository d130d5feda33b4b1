//! Randomized property checks over catalogs, angles and retrograde detection

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use skywheel::astrology::{probe_retrograde, zodiac_sign, RetrogradeDeltaPolicy};
use skywheel::orbits::ScaleFactors;
use skywheel::{Body, BodyCatalog, CelestialBody, KeplerianEphemeris, Time};

const ORBITING: [Body; 9] = [
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

#[test]
fn scale_factors_match_random_catalogs() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let count = rng.gen_range(1..=ORBITING.len());
        let mut chosen = ORBITING.to_vec();
        chosen.shuffle(&mut rng);
        chosen.truncate(count);

        let bodies: Vec<CelestialBody> = chosen
            .iter()
            .map(|&body| {
                let axis = rng.gen_range(0.1..60.0);
                CelestialBody::orbiting(body, 10.0, "white", rng.gen_range(10.0..1e5), axis, 0.1)
            })
            .collect();
        let catalog = BodyCatalog::new(bodies).unwrap();

        let min = rng.gen_range(0.0..200.0);
        let max = min + rng.gen_range(1.0..400.0);
        let scales = ScaleFactors::compute(&catalog, min, max);

        assert_eq!(scales.entries().len(), count);
        for (entry, body) in scales.entries().iter().zip(catalog.orbit_bodies()) {
            assert_eq!(entry.body, body.body);
            let axis = body.semi_major_axis_au.unwrap();
            assert_eq!(entry.scale_factor, entry.target_radius / axis);
            assert!(entry.target_radius >= min && entry.target_radius <= max + 1e-9);
        }
        for pair in scales.entries().windows(2) {
            assert!(pair[1].target_radius >= pair[0].target_radius);
        }
    }
}

#[test]
fn zodiac_sign_is_periodic() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10_000 {
        // Stay clear of sign boundaries, where adding 360k can round across
        let sector = rng.gen_range(0..12) as f64 * 30.0;
        let angle = sector + rng.gen_range(0.001..29.999);
        let k = rng.gen_range(-5..=5) as f64;
        assert_eq!(zodiac_sign(angle + 360.0 * k), zodiac_sign(angle), "{} + 360*{}", angle, k);
    }
}

#[test]
fn retrograde_is_stable_away_from_stations() {
    let eph = KeplerianEphemeris::new();
    let mut rng = StdRng::seed_from_u64(23);
    let nudge = 0.01;
    let mut checked = 0;

    for _ in 0..300 {
        let t = Time::from_jd(rng.gen_range(2_451_545.0..2_466_154.0));
        for body in [Body::Mercury, Body::Venus, Body::Mars, Body::Jupiter, Body::Saturn] {
            let probe = probe_retrograde(&eph, body, &t, RetrogradeDeltaPolicy::Normalized)
                .unwrap()
                .unwrap();
            if probe.delta.abs() < 0.05 {
                // Within the tolerance band around a station
                continue;
            }
            for shifted in [t + nudge, t - nudge] {
                let other = probe_retrograde(&eph, body, &shifted, RetrogradeDeltaPolicy::Normalized)
                    .unwrap()
                    .unwrap();
                assert_eq!(
                    other.is_retrograde(),
                    probe.is_retrograde(),
                    "{} at JD {} (delta {})",
                    body,
                    t.jd(),
                    probe.delta
                );
            }
            checked += 1;
        }
    }
    assert!(checked > 1000);
}

#[test]
fn never_retrograde_bodies_have_no_probe() {
    let eph = KeplerianEphemeris::new();
    let t = Time::j2000();
    for body in [Body::Sun, Body::Moon, Body::Earth] {
        assert!(probe_retrograde(&eph, body, &t, RetrogradeDeltaPolicy::Raw)
            .unwrap()
            .is_none());
    }
}

#[test]
fn outer_planets_spend_time_retrograde() {
    let eph = KeplerianEphemeris::new();
    let start = Time::from_jd(2_460_000.5);
    let retrograde_days = (0..780)
        .filter(|day| {
            skywheel::astrology::is_retrograde(
                &eph,
                Body::Mars,
                &(start + *day as f64),
                RetrogradeDeltaPolicy::Normalized,
            )
            .unwrap()
        })
        .count();
    // Mars is retrograde for roughly 60 to 80 days of each 780-day synodic period
    assert!((40..=110).contains(&retrograde_days), "{} days", retrograde_days);
}
