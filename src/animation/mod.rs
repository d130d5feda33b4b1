//! Animated transitions between two instants
//!
//! An [`AnimationState`] is a two-phase machine:
//!
//! ```text
//! Idle --request_transition(target)--> Running --tick(progress >= 1)--> Idle
//! ```
//!
//! Only one transition is in flight at a time. A request made while Running
//! is rejected and reported as [`TransitionRequest::Ignored`]; callers that
//! want to retarget must [`cancel`](AnimationState::cancel) first.
//!
//! Progress is driven by elapsed wall-clock time, not by the number of ticks,
//! so irregular refresh spacing only changes how many intermediate frames are
//! seen. Timestamps are [`Duration`]s since an arbitrary origin chosen by the
//! [`frames::FrameSource`] that drives the animation.
//!
//! State transitions are pure: [`AnimationState::tick`] and
//! [`AnimationState::request_transition`] return the successor state and the
//! caller replaces its copy wholesale.

pub mod easing;
pub mod frames;

pub use self::easing::ease_in_out_cubic;

use crate::constants::ANIMATION_DURATION_MS;
use crate::time::Time;
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// Phase of the transition machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnimationPhase {
    Idle,
    Running,
}

/// Outcome of a transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    /// The machine is now Running towards the requested target
    Started,
    /// A transition was already in flight; nothing changed
    Ignored,
}

/// One step of a running transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickSample {
    /// Instant to compute positions at
    pub interpolated: Time,
    /// Elapsed fraction of the duration, clamped to `[0, 1]`
    pub raw_progress: f64,
    /// `raw_progress` after easing
    pub eased: f64,
    /// This sample ends the transition
    pub finished: bool,
}

/// Scheduler state for animated transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    phase: AnimationPhase,
    start: Time,
    target: Time,
    started_at: Option<Duration>,
    current: Time,
    duration: Duration,
}

impl AnimationState {
    /// Idle state resting at `current`
    pub fn new(current: Time, duration: Duration) -> Self {
        Self {
            phase: AnimationPhase::Idle,
            start: current,
            target: current,
            started_at: None,
            current,
            duration,
        }
    }

    /// Idle state with the default transition length
    pub fn with_default_duration(current: Time) -> Self {
        Self::new(current, Duration::from_millis(ANIMATION_DURATION_MS))
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AnimationPhase::Running
    }

    /// Start of the current or most recent transition
    pub fn start(&self) -> Time {
        self.start
    }

    /// Target of the current or most recent transition
    pub fn target(&self) -> Time {
        self.target
    }

    /// Last instant published by [`tick`](Self::tick)
    pub fn current(&self) -> Time {
        self.current
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Request a transition from the current instant to `target`
    ///
    /// Rejected while a transition is running.
    pub fn request_transition(&self, target: Time, now: Duration) -> (Self, TransitionRequest) {
        if self.is_running() {
            debug!("Transition to {} ignored: already running", target);
            return (*self, TransitionRequest::Ignored);
        }

        debug!("Transition {} -> {} over {:?}", self.current, target, self.duration);
        let next = Self {
            phase: AnimationPhase::Running,
            start: self.current,
            target,
            started_at: Some(now),
            current: self.current,
            duration: self.duration,
        };
        (next, TransitionRequest::Started)
    }

    /// Advance a running transition to wall-clock time `now`
    ///
    /// Returns the successor state and the sample to publish. An Idle state
    /// is returned unchanged with no sample. When the transition completes
    /// the published instant is the target itself, not an eased value.
    pub fn tick(&self, now: Duration) -> (Self, Option<TickSample>) {
        let Some(started_at) = self.started_at.filter(|_| self.is_running()) else {
            return (*self, None);
        };

        let raw_progress = if self.duration.is_zero() || self.start == self.target {
            1.0
        } else {
            let elapsed = now.saturating_sub(started_at);
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };

        if raw_progress >= 1.0 {
            debug!("Transition to {} finished", self.target);
            let next = Self {
                phase: AnimationPhase::Idle,
                start: self.target,
                started_at: None,
                current: self.target,
                ..*self
            };
            let sample = TickSample {
                interpolated: self.target,
                raw_progress: 1.0,
                eased: 1.0,
                finished: true,
            };
            return (next, Some(sample));
        }

        let eased = ease_in_out_cubic(raw_progress);
        let interpolated = self.start.lerp(&self.target, eased);
        let next = Self {
            current: interpolated,
            ..*self
        };
        let sample = TickSample {
            interpolated,
            raw_progress,
            eased,
            finished: false,
        };
        (next, Some(sample))
    }

    /// Abandon a running transition
    ///
    /// The machine returns to Idle and the last published instant becomes the
    /// baseline for the next request.
    pub fn cancel(&self) -> Self {
        if self.is_running() {
            debug!("Transition to {} cancelled at {}", self.target, self.current);
        }
        Self {
            phase: AnimationPhase::Idle,
            start: self.current,
            target: self.current,
            started_at: None,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn state() -> AnimationState {
        AnimationState::new(Time::from_jd(2_460_000.0), ms(1000))
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let s = state();
        let (next, sample) = s.tick(ms(500));
        assert_eq!(next, s);
        assert!(sample.is_none());
    }

    #[test]
    fn test_full_transition() {
        let target = Time::from_jd(2_460_010.0);
        let (s, req) = state().request_transition(target, ms(100));
        assert_eq!(req, TransitionRequest::Started);
        assert!(s.is_running());

        let (s, sample) = s.tick(ms(100));
        let sample = sample.unwrap();
        assert_eq!(sample.raw_progress, 0.0);
        assert_eq!(sample.interpolated, Time::from_jd(2_460_000.0));

        let (s, sample) = s.tick(ms(600));
        let sample = sample.unwrap();
        assert_abs_diff_eq!(sample.raw_progress, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sample.eased, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sample.interpolated.jd(), 2_460_005.0, epsilon = 1e-6);
        assert!(!sample.finished);

        let (s, sample) = s.tick(ms(1300));
        let sample = sample.unwrap();
        assert!(sample.finished);
        assert_eq!(sample.interpolated.jd_parts(), target.jd_parts());
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert_eq!(s.current(), target);
        assert_eq!(s.start(), target);
    }

    #[test]
    fn test_request_while_running_is_ignored() {
        let (s, _) = state().request_transition(Time::from_jd(2_460_010.0), ms(0));
        let (again, req) = s.request_transition(Time::from_jd(2_470_000.0), ms(10));
        assert_eq!(req, TransitionRequest::Ignored);
        assert_eq!(again, s);
        assert_eq!(again.target(), Time::from_jd(2_460_010.0));
    }

    #[test]
    fn test_transition_to_current_instant_finishes_at_once() {
        let s = state();
        let here = s.current();
        let (s, _) = s.request_transition(here, ms(50));
        let (s, sample) = s.tick(ms(50));
        let sample = sample.unwrap();
        assert!(sample.finished);
        assert_eq!(sample.raw_progress, 1.0);
        assert_eq!(sample.interpolated, here);
        assert!(!s.is_running());
    }

    #[test]
    fn test_zero_duration_finishes_at_once() {
        let s = AnimationState::new(Time::from_jd(2_460_000.0), Duration::ZERO);
        let target = Time::from_jd(2_460_100.0);
        let (s, _) = s.request_transition(target, ms(0));
        let (s, sample) = s.tick(ms(0));
        assert!(sample.unwrap().finished);
        assert_eq!(s.current(), target);
    }

    #[test]
    fn test_clock_before_start_clamps_to_zero() {
        let (s, _) = state().request_transition(Time::from_jd(2_460_010.0), ms(500));
        let (_, sample) = s.tick(ms(100));
        assert_eq!(sample.unwrap().raw_progress, 0.0);
    }

    #[test]
    fn test_progress_is_monotonic_over_irregular_ticks() {
        let (mut s, _) = state().request_transition(Time::from_jd(2_460_365.0), ms(0));
        let mut last = -1.0;
        let mut now = 0;
        for step in [3, 40, 1, 17, 250, 16, 16, 90, 700] {
            now += step;
            let (next, sample) = s.tick(ms(now));
            let sample = sample.unwrap();
            assert!(sample.eased >= last);
            last = sample.eased;
            s = next;
        }
        assert!(!s.is_running());
    }

    #[test]
    fn test_cancel_keeps_last_published_instant() {
        let (s, _) = state().request_transition(Time::from_jd(2_460_010.0), ms(0));
        let (s, sample) = s.tick(ms(500));
        let reached = sample.unwrap().interpolated;

        let s = s.cancel();
        assert_eq!(s.phase(), AnimationPhase::Idle);
        assert_eq!(s.current(), reached);
        assert_eq!(s.start(), reached);

        let (s, req) = s.request_transition(Time::from_jd(2_459_000.0), ms(600));
        assert_eq!(req, TransitionRequest::Started);
        assert_eq!(s.start(), reached);
    }
}
