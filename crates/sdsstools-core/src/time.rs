//! SDSS date utilities.
//!
//! The SJD (SDSS MJD) is the MJD plus an observatory-dependent fraction of a
//! day, truncated to an integer, so that a whole night shares a single SJD.

use crate::util::process::fqdn;
use chrono::{Datelike, NaiveDateTime, Timelike, Utc};
use sdsstools_types::{Observatory, ProcessEnv, Result, ToolsError, VarSource};
use std::time::{Duration, Instant};
use tracing::warn;

/// Julian Date of the MJD epoch.
pub const MJD_EPOCH: f64 = 2_400_000.5;

/// Convert a sexagesimal time to decimal hours.
pub fn sex2dec(hour: u32, minute: u32, second: f64, microsecond: f64) -> f64 {
    f64::from(hour) + f64::from(minute) / 60.0 + (second + microsecond / 1e6) / 3600.0
}

/// Julian Date at 0h of a Gregorian calendar date.
///
/// From "Practical Astronomy with your Calculator" (Duffett-Smith, p. 7).
/// Dates before 1582-10-15 are taken as Julian calendar dates.
pub fn ymd_to_jd(year: i32, month: u32, day: u32) -> f64 {
    let (yprime, mprime) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };

    let gregorian = year > 1582 || (year == 1582 && month >= 10 && day >= 15);
    let b = if gregorian {
        let a = yprime / 100;
        2 - a + a / 4
    } else {
        0
    };

    let c = if yprime < 0 {
        (365.25 * f64::from(yprime) - 0.75).trunc()
    } else {
        (365.25 * f64::from(yprime)).trunc()
    };
    let d = (30.6001 * f64::from(mprime + 1)).trunc();

    f64::from(b) + c + d + f64::from(day) + 1_720_994.5
}

/// Julian Date of a (UTC) date and time.
pub fn datetime_to_jd(date: &NaiveDateTime) -> f64 {
    let hours = sex2dec(
        date.hour(),
        date.minute(),
        f64::from(date.second()),
        f64::from(date.nanosecond() / 1_000),
    );
    ymd_to_jd(date.year(), date.month(), date.day()) + hours / 24.0
}

/// SJD of `date` at `observatory`.
pub fn sjd_for(observatory: Observatory, date: &NaiveDateTime) -> i64 {
    (datetime_to_jd(date) - MJD_EPOCH + observatory.sjd_offset()).floor() as i64
}

/// Observatory from `$OBSERVATORY`, else from the host's domain name.
pub fn current_observatory(vars: &dyn VarSource) -> Result<Option<Observatory>> {
    if let Some(name) = vars.var("OBSERVATORY") {
        return name.parse().map(Some);
    }
    Ok(fqdn().as_deref().and_then(Observatory::from_fqdn))
}

/// Return the SJD.
///
/// `observatory` must be `APO` or `LCO` (any case); when `None` it is taken
/// from [`current_observatory`]. `date` defaults to now (UTC). If the
/// observatory cannot be determined this fails with
/// [`ToolsError::UnknownObservatory`] when `raise_error`, otherwise it warns
/// and returns the MJD.
pub fn get_sjd(observatory: Option<&str>, date: Option<NaiveDateTime>, raise_error: bool) -> Result<i64> {
    get_sjd_with(observatory, date, raise_error, &ProcessEnv)
}

/// Like [`get_sjd`], reading `$OBSERVATORY` through `vars`.
pub fn get_sjd_with(
    observatory: Option<&str>,
    date: Option<NaiveDateTime>,
    raise_error: bool,
    vars: &dyn VarSource,
) -> Result<i64> {
    let date = date.unwrap_or_else(|| Utc::now().naive_utc());

    let observatory = match observatory {
        Some(name) => Some(name.parse::<Observatory>()?),
        None => current_observatory(vars)?,
    };

    match observatory {
        Some(observatory) => Ok(sjd_for(observatory, &date)),
        None if raise_error => Err(ToolsError::UnknownObservatory),
        None => {
            warn!("Cannot determine the current observatory. Returning MJD.");
            Ok((datetime_to_jd(&date) - MJD_EPOCH).floor() as i64)
        }
    }
}

/// Wall-clock timer.
///
/// ```
/// use sdsstools_core::time::Timer;
///
/// let mut timer = Timer::start();
/// let total: u64 = (0..1000).sum();
/// let elapsed = timer.stop();
/// assert_eq!(timer.elapsed(), elapsed);
/// # assert_eq!(total, 499500);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    interval: Option<Duration>,
}

impl Timer {
    /// Start timing.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            interval: None,
        }
    }

    /// Stop timing and return the interval. Later calls keep the first value.
    pub fn stop(&mut self) -> Duration {
        *self.interval.get_or_insert_with(|| self.start.elapsed())
    }

    /// Time since start, or the stopped interval.
    pub fn elapsed(&self) -> Duration {
        self.interval.unwrap_or_else(|| self.start.elapsed())
    }

    /// Whether [`Timer::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.interval.is_some()
    }

    /// Time a closure.
    pub fn measure<F, R>(f: F) -> (R, Duration)
    where
        F: FnOnce() -> R,
    {
        let mut timer = Self::start();
        let result = f();
        (result, timer.stop())
    }
}
