//! Skywheel: planetary positions for an animated orbit view and natal-chart wheel
//!
//! This crate computes where solar-system bodies are drawn in two views at
//! any instant:
//!
//! - a heliocentric **orbit view**, with each orbit scaled onto its own
//!   display radius
//! - a geocentric **wheel view**, placing bodies by ecliptic longitude and
//!   tagging them with zodiac sign and retrograde motion
//!
//! together with the ascendant and midheaven of an observer, and animates a
//! smooth eased transition between two instants.
//!
//! Positions come from an [`ephemeris::Ephemeris`]; the bundled
//! [`ephemeris::KeplerianEphemeris`] uses mean orbital elements.
//! [`chart::ChartEngine`] ties the pieces together.

use thiserror::Error;

pub mod animation;
pub mod astrology;
pub mod bodies;
pub mod chart;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod ephemeris;
pub mod input;
pub mod orbits;
pub mod positions;
pub mod time;

// Re-export commonly used types
pub use astrology::{Observer, ZodiacSign};
pub use bodies::{BodyCatalog, CelestialBody};
pub use chart::{ChartEngine, DisplayFrame};
pub use config::EngineConfig;
pub use ephemeris::{Body, Ephemeris, KeplerianEphemeris};
pub use positions::{ProjectedPosition, WheelPosition};
pub use time::Time;

/// Main error type for the skywheel library
#[derive(Debug, Error)]
pub enum SkywheelError {
    #[error("Ephemeris error: {0}")]
    Ephemeris(#[from] ephemeris::EphemerisError),

    #[error("Position error: {0}")]
    Position(#[from] positions::PositionError),

    #[error("Orbit error: {0}")]
    Orbit(#[from] orbits::OrbitError),

    #[error("Input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] bodies::CatalogError),

    #[error("Time error: {0}")]
    Time(#[from] time::TimeError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for skywheel operations
pub type Result<T> = std::result::Result<T, SkywheelError>;

/// Engine over the bundled ephemeris, default catalog and default configuration
///
/// Orbit paths are traced from the wall clock, not from `now`.
pub fn default_engine(now: Time) -> Result<ChartEngine<KeplerianEphemeris>> {
    ChartEngine::new(
        KeplerianEphemeris::new(),
        BodyCatalog::default(),
        EngineConfig::default(),
        now,
    )
}
