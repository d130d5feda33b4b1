//! Static body table shared by both views
//!
//! A [`BodyCatalog`] is loaded once at startup, either from the built-in
//! [`BodyCatalog::default`] table or from JSON, and is immutable afterwards.
//! Catalog order matters: orbit-view bodies are spaced outward in the order
//! they appear here.

use crate::ephemeris::Body;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for body catalog construction
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid body {name}: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("Body listed twice: {0}")]
    Duplicate(Body),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Static description of one body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Which body the ephemeris is asked about
    pub body: Body,
    /// Display name
    pub name: String,
    /// Sidereal orbital period in days
    #[serde(default)]
    pub orbital_period_days: Option<f64>,
    /// Semi-major axis in AU
    #[serde(default)]
    pub semi_major_axis_au: Option<f64>,
    /// Orbital eccentricity
    #[serde(default)]
    pub eccentricity: Option<f64>,
    /// Drawn size in display units
    pub size: f64,
    /// CSS color used for labels and fallbacks
    pub color: String,
    /// Image asset drawn for the body
    #[serde(default)]
    pub image: Option<String>,
    /// Drawn in the heliocentric orbit view
    pub included_in_orbit_view: bool,
    /// Drawn on the natal-chart wheel
    pub included_in_wheel_view: bool,
}

impl CelestialBody {
    /// Create a body that only appears on the wheel
    pub fn wheel_only(body: Body, size: f64, color: &str) -> Self {
        Self {
            body,
            name: body.name().to_string(),
            orbital_period_days: None,
            semi_major_axis_au: None,
            eccentricity: None,
            size,
            color: color.to_string(),
            image: Some(format!("images/{}.png", body.name().to_lowercase())),
            included_in_orbit_view: false,
            included_in_wheel_view: true,
        }
    }

    /// Create a body with orbital elements, shown in both views
    pub fn orbiting(
        body: Body,
        size: f64,
        color: &str,
        orbital_period_days: f64,
        semi_major_axis_au: f64,
        eccentricity: f64,
    ) -> Self {
        Self {
            orbital_period_days: Some(orbital_period_days),
            semi_major_axis_au: Some(semi_major_axis_au),
            eccentricity: Some(eccentricity),
            included_in_orbit_view: true,
            ..Self::wheel_only(body, size, color)
        }
    }

    /// Builder-style toggle for the wheel view flag
    pub fn with_wheel_view(mut self, included: bool) -> Self {
        self.included_in_wheel_view = included;
        self
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| CatalogError::InvalidBody {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        for (label, value) in [
            ("orbital period", self.orbital_period_days),
            ("semi-major axis", self.semi_major_axis_au),
        ] {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(invalid(&format!("{} must be positive, got {}", label, v)));
                }
            }
        }

        if self.included_in_orbit_view
            && (self.orbital_period_days.is_none() || self.semi_major_axis_au.is_none())
        {
            return Err(invalid(
                "orbit-view bodies need an orbital period and a semi-major axis",
            ));
        }

        if let Some(e) = self.eccentricity {
            if !(0.0..1.0).contains(&e) {
                return Err(invalid(&format!("eccentricity {} outside [0, 1)", e)));
            }
        }
        Ok(())
    }
}

/// Validated, ordered set of bodies
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCatalog {
    bodies: Vec<CelestialBody>,
}

impl BodyCatalog {
    /// Build a catalog, checking every body's invariants
    pub fn new(bodies: Vec<CelestialBody>) -> Result<Self> {
        let mut seen = Vec::with_capacity(bodies.len());
        for b in &bodies {
            b.validate()?;
            if seen.contains(&b.body) {
                return Err(CatalogError::Duplicate(b.body));
            }
            seen.push(b.body);
        }
        Ok(Self { bodies })
    }

    /// Parse a JSON array of bodies
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a JSON array of bodies from disk
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// All bodies, in catalog order
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// Bodies drawn in the orbit view, in orbit order
    pub fn orbit_bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|b| b.included_in_orbit_view)
    }

    /// Bodies drawn on the wheel
    pub fn wheel_bodies(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|b| b.included_in_wheel_view)
    }

    /// Look a body up by its ephemeris identifier
    pub fn get(&self, body: Body) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.body == body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Default for BodyCatalog {
    /// Sun and Moon on the wheel only, Earth in the orbit view only, and the
    /// planets Mercury through Pluto in both
    fn default() -> Self {
        Self {
            bodies: vec![
                CelestialBody::wheel_only(Body::Sun, 100.0, "yellow"),
                CelestialBody::wheel_only(Body::Moon, 30.0, "silver"),
                CelestialBody::orbiting(Body::Mercury, 26.0, "#8c8c8c", 87.97, 0.3871, 0.2056),
                CelestialBody::orbiting(Body::Venus, 26.0, "#e39e1c", 224.7, 0.7233, 0.0068),
                CelestialBody::orbiting(Body::Earth, 26.0, "#2b82c9", 365.26, 1.0, 0.0167)
                    .with_wheel_view(false),
                CelestialBody::orbiting(Body::Mars, 26.0, "#c1440e", 686.98, 1.5273, 0.0934),
                CelestialBody::orbiting(Body::Jupiter, 55.0, "#e0ae6f", 4332.59, 5.2028, 0.0484),
                CelestialBody::orbiting(Body::Saturn, 110.0, "#f4d47a", 10759.22, 9.5388, 0.0542),
                CelestialBody::orbiting(Body::Uranus, 95.0, "#82b3d1", 30688.5, 19.1914, 0.0472),
                CelestialBody::orbiting(Body::Neptune, 42.0, "#3f54ba", 60182.0, 30.0611, 0.0086),
                CelestialBody::orbiting(Body::Pluto, 20.0, "#b3b3b3", 90560.0, 39.482, 0.2488),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = BodyCatalog::default();
        assert_eq!(BodyCatalog::new(catalog.bodies().to_vec()).unwrap(), catalog);
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog.orbit_bodies().count(), 9);
        assert_eq!(catalog.wheel_bodies().count(), 10);

        let earth = catalog.get(Body::Earth).unwrap();
        assert!(earth.included_in_orbit_view);
        assert!(!earth.included_in_wheel_view);

        let first = catalog.orbit_bodies().next().unwrap();
        assert_eq!(first.body, Body::Mercury);
    }

    #[test]
    fn test_orbit_body_needs_elements() {
        let mut mars = CelestialBody::orbiting(Body::Mars, 26.0, "red", 686.98, 1.5273, 0.09);
        mars.semi_major_axis_au = None;
        let err = BodyCatalog::new(vec![mars]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBody { .. }));
    }

    #[test]
    fn test_non_positive_period_rejected() {
        let venus = CelestialBody::orbiting(Body::Venus, 26.0, "gold", 0.0, 0.72, 0.0);
        assert!(BodyCatalog::new(vec![venus]).is_err());

        let mut sun = CelestialBody::wheel_only(Body::Sun, 100.0, "yellow");
        sun.semi_major_axis_au = Some(-1.0);
        assert!(BodyCatalog::new(vec![sun]).is_err());
    }

    #[test]
    fn test_duplicates_rejected() {
        let moon = CelestialBody::wheel_only(Body::Moon, 30.0, "silver");
        let err = BodyCatalog::new(vec![moon.clone(), moon]).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(Body::Moon)));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let catalog = BodyCatalog::default();
        let json = serde_json::to_string_pretty(catalog.bodies()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = BodyCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_json_minimal_wheel_body() {
        let json = r#"[{
            "body": "moon",
            "name": "Luna",
            "size": 30,
            "color": "silver",
            "included_in_orbit_view": false,
            "included_in_wheel_view": true
        }]"#;
        let catalog = BodyCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.get(Body::Moon).unwrap().name, "Luna");
        assert_eq!(catalog.orbit_bodies().count(), 0);
    }
}
