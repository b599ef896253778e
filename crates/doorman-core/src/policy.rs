// ── Access policy ──
//
// Who may operate the door, and when. Immutable for one invocation.
// Hours are compared in a fixed EST offset (UTC-5) with no daylight saving
// adjustment: in summer the window sits one hour later on the wall clock.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

/// Offset in hours between UTC and the policy's local time.
pub const EST_OFFSET_HOURS: i64 = 5;

/// Default start of the cleaner window (exclusive), EST.
pub const DEFAULT_EARLIEST_HOUR: u8 = 7;

/// Default end of the cleaner window (exclusive), EST.
pub const DEFAULT_LATEST_HOUR: u8 = 17;

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub cleaner_code: SecretString,
    pub family_code: SecretString,
    pub cleaner_day: Weekday,
    pub earliest_hour: u8,
    pub latest_hour: u8,
}

impl AccessPolicy {
    pub fn new(cleaner_code: SecretString, family_code: SecretString, cleaner_day: Weekday) -> Self {
        Self {
            cleaner_code,
            family_code,
            cleaner_day,
            earliest_hour: DEFAULT_EARLIEST_HOUR,
            latest_hour: DEFAULT_LATEST_HOUR,
        }
    }

    pub fn with_window(mut self, earliest_hour: u8, latest_hour: u8) -> Self {
        self.earliest_hour = earliest_hour;
        self.latest_hour = latest_hour;
        self
    }

    /// Reject policies that could match by accident or never match at all.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cleaner_code.expose_secret().is_empty() {
            return Err(CoreError::config("CLEANER_CODE must not be empty"));
        }
        if self.family_code.expose_secret().is_empty() {
            return Err(CoreError::config("FAMILY_CODE must not be empty"));
        }
        if self.latest_hour > 23 {
            return Err(CoreError::config(format!(
                "latest_hour must be within 0..=23, got {}",
                self.latest_hour
            )));
        }
        if self.earliest_hour >= self.latest_hour {
            return Err(CoreError::config(format!(
                "earliest_hour ({}) must be before latest_hour ({})",
                self.earliest_hour, self.latest_hour
            )));
        }
        Ok(())
    }

    /// UTC hour minus the fixed offset. Not wrapped: 02:00 UTC is -3.
    pub fn est_hour(now: DateTime<Utc>) -> i64 {
        i64::from(now.hour()) - EST_OFFSET_HOURS
    }

    /// Strictly inside the open `(earliest_hour, latest_hour)` interval.
    pub fn within_window(&self, est_hour: i64) -> bool {
        i64::from(self.earliest_hour) < est_hour && est_hour < i64::from(self.latest_hour)
    }

    /// Whether `now` (UTC calendar day) is the cleaner's day.
    pub fn is_cleaner_day(&self, now: DateTime<Utc>) -> bool {
        now.weekday() == self.cleaner_day
    }

    pub fn is_cleaner_code(&self, code: &str) -> bool {
        !code.is_empty() && code == self.cleaner_code.expose_secret()
    }

    pub fn is_family_code(&self, code: &str) -> bool {
        !code.is_empty() && code == self.family_code.expose_secret()
    }
}
