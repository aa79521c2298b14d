//! Daily quiet-hours window — generation and the active-time gate.
//!
//! Dispatch stops at a randomized minute of 23:xx and resumes at a
//! randomized minute of 06:xx or 07:xx. All comparisons happen in one
//! fixed reference zone; the window's hour/minute values mean nothing
//! outside it.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use rand::Rng;

/// Reference zone for all window math, regardless of deployment locale.
pub const REFERENCE_ZONE: Tz = chrono_tz::Asia::Ho_Chi_Minh;

/// Quiet hours always begin inside this hour; only the minute is drawn.
const STOP_HOUR: u32 = 23;

/// The boundary of one day's quiet period.
///
/// Immutable once generated: day rollover replaces the whole value, it is
/// never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyWindow {
    pub stop_hour: u32,
    pub stop_minute: u32,
    pub start_hour: u32,
    pub start_minute: u32,
    /// Reference-zone day this window was drawn for.
    pub generated_for: NaiveDate,
}

impl DailyWindow {
    /// Draw a fresh window for the given reference-zone day.
    pub fn generate(day: NaiveDate) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            stop_hour: STOP_HOUR,
            stop_minute: rng.gen_range(0..60),
            start_hour: rng.gen_range(6..=7),
            start_minute: rng.gen_range(0..60),
            generated_for: day,
        }
    }

    /// Whether dispatch is permitted at `now`.
    ///
    /// The quiet period wraps midnight (stop > start), so the active side
    /// is the conjunction of "not past tonight's stop" and "past this
    /// morning's start". Both boundary minutes count as active.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&REFERENCE_ZONE);
        let (hour, minute) = (local.hour(), local.minute());
        let before_stop =
            hour < self.stop_hour || (hour == self.stop_hour && minute <= self.stop_minute);
        let after_start =
            hour > self.start_hour || (hour == self.start_hour && minute >= self.start_minute);
        before_stop && after_start
    }
}

impl std::fmt::Display for DailyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stop {:02}:{:02}, resume {:02}:{:02}",
            self.stop_hour, self.stop_minute, self.start_hour, self.start_minute
        )
    }
}
