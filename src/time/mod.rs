//! Time module for the instants the engine computes positions at
//!
//! A [`Time`] is an opaque point on a continuous, UTC-equivalent time axis
//! stored as a Julian date split into whole and fractional days. Instants are
//! comparable, can be offset by a number of days and subtract to a duration in
//! days. Calendar handling stays at the edges: conversion to and from
//! `chrono::DateTime<Utc>` is provided for the input layer and for display.

use crate::constants::{DAYS_PER_CENTURY, DAY_MS, DAY_S, J2000, UNIX_EPOCH_JD};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Error type for time operations
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("Time out of range: {0}")]
    OutOfRange(String),

    #[error("Non-finite Julian date: {0}")]
    NonFinite(f64),
}

/// Result type for time operations
pub type Result<T> = std::result::Result<T, TimeError>;

/// A point in time, stored as a two-part Julian date
///
/// Keeping the whole days apart from the fraction preserves sub-millisecond
/// resolution for dates far from the epoch, the same way skyfield splits its
/// Julian dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Time {
    whole: f64,
    fraction: f64,
}

impl Time {
    /// Create a time from a single Julian date
    pub fn from_jd(jd: f64) -> Self {
        let whole = jd.floor();
        Self::from_jd_parts(whole, jd - whole)
    }

    /// Create a time from a Julian date given as whole days plus a fraction
    ///
    /// Any integral part of the fraction is carried into the whole days.
    pub fn from_jd_parts(whole: f64, fraction: f64) -> Self {
        let carry = fraction.floor();
        let (mut whole, mut fraction) = (whole + carry, fraction - carry);
        // A tiny negative fraction rounds up to exactly 1.0
        if fraction >= 1.0 {
            whole += 1.0;
            fraction -= 1.0;
        }
        Time { whole, fraction }
    }

    /// Create a time from a validated Julian date
    pub fn try_from_jd(jd: f64) -> Result<Self> {
        if jd.is_finite() {
            Ok(Self::from_jd(jd))
        } else {
            Err(TimeError::NonFinite(jd))
        }
    }

    /// Create a time from a UTC datetime
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp();
        let days = seconds.div_euclid(DAY_S as i64);
        let rem_s = seconds.rem_euclid(DAY_S as i64);
        let fraction = (rem_s as f64 + dt.timestamp_subsec_nanos() as f64 * 1e-9) / DAY_S;
        Self::from_jd_parts(UNIX_EPOCH_JD + days as f64, fraction)
    }

    /// Get the current time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// The J2000.0 epoch
    pub fn j2000() -> Self {
        Self::from_jd(J2000)
    }

    /// Get the Julian date
    pub fn jd(&self) -> f64 {
        self.whole + self.fraction
    }

    /// Whole and fractional parts of the Julian date
    pub fn jd_parts(&self) -> (f64, f64) {
        (self.whole, self.fraction)
    }

    /// Days elapsed since J2000.0
    pub fn days_since_j2000(&self) -> f64 {
        (self.whole - J2000) + self.fraction
    }

    /// Julian centuries elapsed since J2000.0
    pub fn centuries_since_j2000(&self) -> f64 {
        self.days_since_j2000() / DAYS_PER_CENTURY
    }

    /// Linear interpolation towards `other`
    ///
    /// `fraction = 0` returns `self` exactly; `fraction = 1` returns a value
    /// equal to `other` up to rounding, so callers needing the exact endpoint
    /// should use `other` directly.
    pub fn lerp(&self, other: &Time, fraction: f64) -> Time {
        if fraction == 0.0 {
            return *self;
        }
        *self + fraction * (*other - *self)
    }

    /// Convert to a UTC datetime, rounded to the millisecond
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let days = (self.whole - UNIX_EPOCH_JD) + self.fraction;
        let millis = (days * DAY_MS).round();
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return Err(TimeError::OutOfRange(format!("JD {}", self.jd())));
        }
        Utc.timestamp_millis_opt(millis as i64)
            .single()
            .ok_or_else(|| TimeError::OutOfRange(format!("JD {}", self.jd())))
    }

    /// Format as an ISO 8601 UTC string
    pub fn utc_iso(&self) -> Result<String> {
        Ok(self
            .to_datetime()?
            .to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Ok(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            Err(_) => write!(f, "<Time jd={:.6}>", self.jd()),
        }
    }
}

impl Add<f64> for Time {
    type Output = Time;

    fn add(self, days: f64) -> Self::Output {
        let whole_days = days.floor();
        Time::from_jd_parts(self.whole + whole_days, self.fraction + (days - whole_days))
    }
}

impl Sub<f64> for Time {
    type Output = Time;

    fn sub(self, days: f64) -> Self::Output {
        self + (-days)
    }
}

impl Sub<Time> for Time {
    type Output = f64;

    /// Difference in days
    fn sub(self, other: Time) -> Self::Output {
        (self.whole - other.whole) + (self.fraction - other.fraction)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.whole == other.whole && self.fraction == other.fraction
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match self.whole.partial_cmp(&other.whole) {
            Some(std::cmp::Ordering::Equal) => self.fraction.partial_cmp(&other.fraction),
            ord => ord,
        }
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}
