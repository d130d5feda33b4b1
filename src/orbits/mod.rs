//! Orbit-view scaling and orbit path sampling
//!
//! Real semi-major axes span two orders of magnitude, so the orbit view does
//! not use a common scale. Each orbit-view body instead gets a target radius,
//! spaced evenly between a minimum and maximum radius in orbit order, and its
//! own scale factor `target_radius / semi_major_axis`.
//!
//! Orbit paths are decorative traces: one revolution sampled forward from the
//! moment the engine starts, computed once and never re-sampled during
//! animation.

use crate::bodies::{BodyCatalog, CelestialBody};
use crate::coordinates::{project, Point2};
use crate::ephemeris::{Body, Ephemeris, EphemerisError};
use crate::time::Time;
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Error type for orbit path sampling
#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("{0} has no orbital period")]
    MissingPeriod(Body),

    #[error("Orbit path needs at least one sample")]
    NoSamples,

    #[error("Non-finite orbit point for {body} at sample {index}")]
    NonFinitePoint { body: Body, index: usize },

    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] EphemerisError),
}

/// Result type for orbit operations
pub type Result<T> = std::result::Result<T, OrbitError>;

/// Scale data for one orbit-view body
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleEntry {
    pub body: Body,
    /// Display radius assigned to this orbit
    pub target_radius: f64,
    /// Multiplier from AU to display units
    pub scale_factor: f64,
}

/// Per-body scale factors for the orbit view, in orbit order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScaleFactors {
    entries: Vec<ScaleEntry>,
}

/// Radii spaced evenly from `min_radius` to `max_radius`
///
/// A single orbit sits at `min_radius`.
pub fn target_radii(count: usize, min_radius: f64, max_radius: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![min_radius; count];
    }
    let step = (max_radius - min_radius) / (count - 1) as f64;
    (0..count).map(|i| min_radius + step * i as f64).collect()
}

impl ScaleFactors {
    /// Compute scale factors for every orbit-view body in `catalog`
    pub fn compute(catalog: &BodyCatalog, min_radius: f64, max_radius: f64) -> Self {
        let orbiting: Vec<&CelestialBody> = catalog.orbit_bodies().collect();
        let radii = target_radii(orbiting.len(), min_radius, max_radius);

        let entries = orbiting
            .iter()
            .zip(radii)
            .filter_map(|(body, target_radius)| {
                // Catalog validation guarantees a positive axis for orbit-view bodies
                body.semi_major_axis_au.map(|axis| ScaleEntry {
                    body: body.body,
                    target_radius,
                    scale_factor: target_radius / axis,
                })
            })
            .collect();

        Self { entries }
    }

    /// Scale factor for `body`, if it is in the orbit view
    pub fn get(&self, body: Body) -> Option<f64> {
        self.entry(body).map(|e| e.scale_factor)
    }

    /// Full scale entry for `body`
    pub fn entry(&self, body: Body) -> Option<&ScaleEntry> {
        self.entries.iter().find(|e| e.body == body)
    }

    pub fn entries(&self) -> &[ScaleEntry] {
        &self.entries
    }
}

/// Closed polyline tracing one revolution of a body's orbit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitPath {
    pub body: Body,
    /// Projected points; the last implicitly connects back to the first
    pub points: Vec<Point2>,
}

impl OrbitPath {
    /// SVG path data (`M x,y L x,y ... Z`) for the closed trace
    pub fn svg_path_data(&self) -> String {
        if self.points.is_empty() {
            return String::new();
        }
        let coords: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("{:.3},{:.3}", p.x, p.y))
            .collect();
        format!("M {} Z", coords.join(" L "))
    }
}

/// Sample one revolution of `body`'s heliocentric orbit
///
/// Starting at `start`, steps forward `period / num_samples` days per sample
/// and projects each heliocentric vector with `scale_factor`.
pub fn sample_path<E: Ephemeris>(
    ephemeris: &E,
    body: &CelestialBody,
    scale_factor: f64,
    start: &Time,
    num_samples: usize,
) -> Result<OrbitPath> {
    let period = body
        .orbital_period_days
        .ok_or(OrbitError::MissingPeriod(body.body))?;
    if num_samples == 0 {
        return Err(OrbitError::NoSamples);
    }

    let step = period / num_samples as f64;
    debug!(
        "Sampling {} orbit: {} points, {:.4} days apart",
        body.name, num_samples, step
    );

    let mut points = Vec::with_capacity(num_samples);
    for index in 0..num_samples {
        let t = *start + index as f64 * step;
        let v = ephemeris.heliocentric_vector(body.body, &t)?;
        let point = project(&v, scale_factor);
        if !point.is_finite() {
            return Err(OrbitError::NonFinitePoint {
                body: body.body,
                index,
            });
        }
        points.push(point);
    }

    Ok(OrbitPath {
        body: body.body,
        points,
    })
}

/// Sample every orbit-view body in the catalog
///
/// Bodies whose path cannot be sampled are skipped with a warning; their
/// errors are returned alongside the successful paths.
pub fn sample_all<E: Ephemeris>(
    ephemeris: &E,
    catalog: &BodyCatalog,
    scales: &ScaleFactors,
    start: &Time,
    num_samples: usize,
) -> (Vec<OrbitPath>, Vec<(Body, OrbitError)>) {
    let mut paths = Vec::new();
    let mut failures = Vec::new();

    for body in catalog.orbit_bodies() {
        let Some(scale) = scales.get(body.body) else {
            continue;
        };
        match sample_path(ephemeris, body, scale, start, num_samples) {
            Ok(path) => paths.push(path),
            Err(err) => {
                log::warn!("Skipping orbit path for {}: {}", body.name, err);
                failures.push((body.body, err));
            }
        }
    }
    (paths, failures)
}
