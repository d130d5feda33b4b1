//! Chart engine
//!
//! [`ChartEngine`] owns everything a running chart needs: the ephemeris, the
//! body catalog, the configuration, the orbit-view scale factors and orbit
//! paths, and the animation state. Each published [`DisplayFrame`] is built
//! from scratch for one instant, so the display state is always a pure
//! function of that instant and the observer.

use crate::animation::frames::{FrameSource, FrameSubscriber};
use crate::animation::{AnimationState, TransitionRequest};
use crate::astrology::{ascendant_with_obliquity, midheaven, Observer};
use crate::bodies::BodyCatalog;
use crate::config::EngineConfig;
use crate::ephemeris::{Body, Ephemeris};
use crate::input::{self, InputError};
use crate::orbits::{self, OrbitError, OrbitPath, ScaleFactors};
use crate::positions::{compute_position, ProjectedPosition};
use crate::time::Time;
use crate::Result;
use chrono::FixedOffset;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Something that went wrong while building a frame
///
/// Failures never abort a frame; the affected quantity is left out and a
/// diagnostic is attached instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Body whose position could not be computed, `None` for chart angles
    pub body: Option<Body>,
    pub message: String,
}

/// Complete display state for one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFrame {
    pub instant: Time,
    pub positions: BTreeMap<Body, ProjectedPosition>,
    pub ascendant_deg: Option<f64>,
    pub midheaven_deg: Option<f64>,
    /// Eased progress of the transition that produced this frame
    pub progress: f64,
    /// Last frame of a transition, or a static frame
    pub finished: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl DisplayFrame {
    pub fn position(&self, body: Body) -> Option<&ProjectedPosition> {
        self.positions.get(&body)
    }
}

/// Positions, chart angles and animated transitions for a body catalog
pub struct ChartEngine<E: Ephemeris> {
    ephemeris: E,
    catalog: BodyCatalog,
    config: EngineConfig,
    utc_offset: FixedOffset,
    orbit_epoch: Time,
    scales: ScaleFactors,
    orbit_paths: Vec<OrbitPath>,
    orbit_failures: Vec<(Body, OrbitError)>,
    target: Time,
    animation: AnimationState,
    frame: DisplayFrame,
}

impl<E: Ephemeris> ChartEngine<E> {
    /// Build an engine resting at `now`
    ///
    /// Orbit paths are sampled forward from the current wall-clock instant,
    /// whatever `now` is; see [`ChartEngine::with_orbit_epoch`].
    pub fn new(ephemeris: E, catalog: BodyCatalog, config: EngineConfig, now: Time) -> Result<Self> {
        Self::with_orbit_epoch(ephemeris, catalog, config, now, Time::now())
    }

    /// Build an engine resting at `now` with orbit paths sampled from `orbit_epoch`
    ///
    /// Orbit paths stay fixed until the catalog or the radius bounds change.
    /// They do not follow the displayed instant.
    pub fn with_orbit_epoch(
        ephemeris: E,
        catalog: BodyCatalog,
        config: EngineConfig,
        now: Time,
        orbit_epoch: Time,
    ) -> Result<Self> {
        config.validate()?;
        let utc_offset = config.utc_offset()?;
        let animation = AnimationState::new(now, config.animation_duration());

        let mut engine = Self {
            ephemeris,
            catalog,
            config,
            utc_offset,
            orbit_epoch,
            scales: ScaleFactors::default(),
            orbit_paths: Vec::new(),
            orbit_failures: Vec::new(),
            target: now,
            animation,
            frame: DisplayFrame {
                instant: now,
                positions: BTreeMap::new(),
                ascendant_deg: None,
                midheaven_deg: None,
                progress: 1.0,
                finished: true,
                diagnostics: Vec::new(),
            },
        };
        engine.refresh_orbits();
        engine.frame = engine.frame_at(&now);

        info!(
            "Chart engine ready at {}: {} bodies, {} orbit paths from {}",
            now,
            engine.catalog.len(),
            engine.orbit_paths.len(),
            engine.orbit_epoch
        );
        Ok(engine)
    }

    fn refresh_orbits(&mut self) {
        self.scales = ScaleFactors::compute(
            &self.catalog,
            self.config.min_orbit_radius,
            self.config.max_orbit_radius,
        );
        let (paths, failures) = orbits::sample_all(
            &self.ephemeris,
            &self.catalog,
            &self.scales,
            &self.orbit_epoch,
            self.config.orbit_samples,
        );
        self.orbit_paths = paths;
        self.orbit_failures = failures;
    }

    /// Build the display state for `time` without touching the animation
    pub fn frame_at(&self, time: &Time) -> DisplayFrame {
        self.build_frame(time, 1.0, true)
    }

    fn build_frame(&self, time: &Time, progress: f64, finished: bool) -> DisplayFrame {
        let mut positions = BTreeMap::new();
        let mut diagnostics = Vec::new();

        let shown = self
            .catalog
            .bodies()
            .iter()
            .filter(|b| b.included_in_orbit_view || b.included_in_wheel_view);
        for body in shown {
            match compute_position(
                &self.ephemeris,
                body,
                self.scales.get(body.body),
                time,
                self.config.wheel_radius,
                self.config.retrograde_delta,
            ) {
                Ok(position) => {
                    positions.insert(body.body, position);
                }
                Err(err) => {
                    warn!("Dropping {} from frame at {}: {}", body.name, time, err);
                    diagnostics.push(Diagnostic {
                        body: Some(body.body),
                        message: err.to_string(),
                    });
                }
            }
        }

        let observer = &self.config.observer;
        let mut angle = |name: &str, value: crate::ephemeris::Result<f64>| match value {
            Ok(v) if v.is_finite() => Some(v),
            Ok(v) => {
                warn!("Non-finite {} at {}: {}", name, time, v);
                diagnostics.push(Diagnostic {
                    body: None,
                    message: format!("non-finite {}", name),
                });
                None
            }
            Err(err) => {
                warn!("No {} at {}: {}", name, time, err);
                diagnostics.push(Diagnostic {
                    body: None,
                    message: format!("{}: {}", name, err),
                });
                None
            }
        };
        let ascendant_deg = angle(
            "ascendant",
            ascendant_with_obliquity(&self.ephemeris, time, observer, self.config.obliquity_deg),
        );
        let midheaven_deg = angle("midheaven", midheaven(&self.ephemeris, time, observer));

        DisplayFrame {
            instant: *time,
            positions,
            ascendant_deg,
            midheaven_deg,
            progress,
            finished,
            diagnostics,
        }
    }

    /// Set the target from a local date-time string
    ///
    /// Unparseable input is rejected and the previous target kept.
    pub fn set_target_input(&mut self, text: &str) -> std::result::Result<Time, InputError> {
        match input::parse_local_datetime(text, self.utc_offset) {
            Ok(target) => {
                self.set_target(target);
                Ok(target)
            }
            Err(err) => {
                warn!("Rejected target '{}', keeping {}: {}", text, self.target, err);
                Err(err)
            }
        }
    }

    /// Set the instant the next transition will animate to
    pub fn set_target(&mut self, target: Time) {
        debug!("Target set to {}", target);
        self.target = target;
    }

    /// Pending target of the next transition
    pub fn target(&self) -> Time {
        self.target
    }

    /// Move the observer; the current frame is recomputed unless animating
    pub fn set_observer(&mut self, observer: Observer) {
        self.config.observer = observer;
        if !self.animation.is_running() {
            self.frame = self.frame_at(&self.animation.current());
        }
    }

    pub fn observer(&self) -> Observer {
        self.config.observer
    }

    /// Request a transition from the current instant to the pending target
    pub fn animate(&mut self, now: Duration) -> TransitionRequest {
        let (next, request) = self.animation.request_transition(self.target, now);
        if request == TransitionRequest::Ignored {
            warn!("Animation already running; request for {} ignored", self.target);
        }
        self.animation = next;
        request
    }

    /// Advance a running transition and publish its frame
    ///
    /// Returns `None` when no transition is running.
    pub fn tick(&mut self, now: Duration) -> Option<DisplayFrame> {
        let (next, sample) = self.animation.tick(now);
        self.animation = next;
        let sample = sample?;

        let frame = self.build_frame(&sample.interpolated, sample.eased, sample.finished);
        self.frame = frame.clone();
        Some(frame)
    }

    /// Stop a running transition where it is
    pub fn cancel(&mut self) {
        self.animation = self.animation.cancel();
    }

    /// Drive a transition to the pending target to completion
    ///
    /// Every tick's frame is published to `subscriber`; the number of frames
    /// published is returned.
    pub fn run<F, S>(&mut self, frames: &mut F, subscriber: &mut S) -> usize
    where
        F: FrameSource + ?Sized,
        S: FrameSubscriber + ?Sized,
    {
        self.animate(frames.now());

        let mut published = 0;
        while self.animation.is_running() {
            let Some(frame) = self.tick(frames.next_frame()) else {
                break;
            };
            subscriber.publish(&frame);
            published += 1;
        }
        debug!("Run finished after {} frames", published);
        published
    }

    /// Replace the body catalog, recomputing scale factors and orbit paths
    pub fn set_bodies(&mut self, catalog: BodyCatalog) {
        self.catalog = catalog;
        self.refresh_orbits();
        if !self.animation.is_running() {
            self.frame = self.frame_at(&self.animation.current());
        }
    }

    /// Change the orbit-view radius bounds, recomputing scale factors and paths
    pub fn set_radius_bounds(&mut self, min_radius: f64, max_radius: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.min_orbit_radius = min_radius;
        config.max_orbit_radius = max_radius;
        config.validate()?;

        self.config = config;
        self.refresh_orbits();
        if !self.animation.is_running() {
            self.frame = self.frame_at(&self.animation.current());
        }
        Ok(())
    }

    /// Most recently published frame
    pub fn current_frame(&self) -> &DisplayFrame {
        &self.frame
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Instant the orbit paths are sampled from
    pub fn orbit_epoch(&self) -> Time {
        self.orbit_epoch
    }

    pub fn orbit_paths(&self) -> &[OrbitPath] {
        &self.orbit_paths
    }

    /// Bodies whose orbit path could not be sampled
    pub fn orbit_failures(&self) -> &[(Body, OrbitError)] {
        &self.orbit_failures
    }

    pub fn scale_factors(&self) -> &ScaleFactors {
        &self.scales
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    /// Format an instant in the engine's input offset
    pub fn format_local(&self, time: &Time) -> Option<String> {
        input::format_local(time, self.utc_offset)
    }
}
