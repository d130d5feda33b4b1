//! Display-refresh scheduling
//!
//! A [`FrameSource`] hands out the timestamp of each display refresh. The
//! scheduler ticks once per refresh and derives progress from the timestamps
//! alone, so sources are free to deliver refreshes irregularly.

use crate::chart::DisplayFrame;
use crate::constants::DEFAULT_REFRESH_HZ;
use std::time::{Duration, Instant};

/// Producer of display-refresh timestamps
pub trait FrameSource {
    /// Wait for the next refresh and return its timestamp
    ///
    /// Timestamps are measured from an origin fixed by the source and never
    /// decrease.
    fn next_frame(&mut self) -> Duration;

    /// Timestamp of the most recent refresh
    fn now(&self) -> Duration;
}

/// Consumer of published display frames
pub trait FrameSubscriber {
    fn publish(&mut self, frame: &DisplayFrame);
}

/// Collects every frame, mostly for tests
impl FrameSubscriber for Vec<DisplayFrame> {
    fn publish(&mut self, frame: &DisplayFrame) {
        self.push(frame.clone());
    }
}

fn interval_for(refresh_hz: f64) -> Duration {
    let hz = if refresh_hz.is_finite() && refresh_hz > 0.0 {
        refresh_hz
    } else {
        DEFAULT_REFRESH_HZ
    };
    Duration::from_secs_f64(1.0 / hz)
}

/// Deterministic refreshes at a fixed interval, without sleeping
#[derive(Debug, Clone)]
pub struct SimulatedRefresh {
    interval: Duration,
    now: Duration,
}

impl SimulatedRefresh {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            now: Duration::ZERO,
        }
    }

    /// Refreshes at `refresh_hz`; non-positive rates fall back to 60 Hz
    pub fn with_rate(refresh_hz: f64) -> Self {
        Self::new(interval_for(refresh_hz))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SimulatedRefresh {
    fn default() -> Self {
        Self::with_rate(DEFAULT_REFRESH_HZ)
    }
}

impl FrameSource for SimulatedRefresh {
    fn next_frame(&mut self) -> Duration {
        self.now += self.interval;
        self.now
    }

    fn now(&self) -> Duration {
        self.now
    }
}

/// Wall-clock refreshes paced by sleeping out the rest of each frame budget
#[derive(Debug, Clone)]
pub struct RealtimeRefresh {
    origin: Instant,
    interval: Duration,
    last: Duration,
}

impl RealtimeRefresh {
    pub fn new(refresh_hz: f64) -> Self {
        Self {
            origin: Instant::now(),
            interval: interval_for(refresh_hz),
            last: Duration::ZERO,
        }
    }
}

impl Default for RealtimeRefresh {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_HZ)
    }
}

impl FrameSource for RealtimeRefresh {
    fn next_frame(&mut self) -> Duration {
        let deadline = self.last + self.interval;
        let elapsed = self.origin.elapsed();
        if elapsed < deadline {
            std::thread::sleep(deadline - elapsed);
        }
        // A slow frame pushes the next deadline back rather than bunching up
        self.last = self.origin.elapsed().max(deadline);
        self.last
    }

    fn now(&self) -> Duration {
        self.last
    }
}
