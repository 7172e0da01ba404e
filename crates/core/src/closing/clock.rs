//! Business-day clock.
//!
//! A business day starts at `cutoff_hour` local time, not at midnight:
//! activity between local midnight and the cutoff belongs to the previous
//! calendar date.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use mostrador_shared::config::{RegisterConfig, RegisterConfigError};
use serde::{Deserialize, Serialize};

use super::error::ClosingError;

/// UTC bounds of one business day, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDayWindow {
    /// Business date.
    pub date: NaiveDate,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

impl BusinessDayWindow {
    /// True if `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Maps instants to business dates for one shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessDayClock {
    cutoff_hour: u32,
    tz: Tz,
}

impl BusinessDayClock {
    /// Builds a clock, rejecting hours outside 0..=23.
    pub fn new(cutoff_hour: u32, tz: Tz) -> Result<Self, ClosingError> {
        let config = RegisterConfig {
            cutoff_hour,
            timezone: tz.name().to_string(),
            ..RegisterConfig::default()
        };
        Self::from_config(&config)
    }

    /// Builds a clock from register settings.
    pub fn from_config(config: &RegisterConfig) -> Result<Self, ClosingError> {
        config.validate()?;
        Ok(Self {
            cutoff_hour: config.cutoff_hour,
            tz: config.tz()?,
        })
    }

    /// Configured cutoff hour.
    #[must_use]
    pub const fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// Business date an instant belongs to.
    ///
    /// `hour == cutoff_hour` already counts as the new day.
    #[must_use]
    pub fn business_day(&self, at: DateTime<Utc>) -> NaiveDate {
        let local = at.with_timezone(&self.tz);
        let date = local.date_naive();
        if local.hour() >= self.cutoff_hour {
            date
        } else {
            date.pred_opt().unwrap_or(date)
        }
    }

    /// UTC window of a business date.
    pub fn window(&self, date: NaiveDate) -> Result<BusinessDayWindow, ClosingError> {
        let next = date.succ_opt().unwrap_or(date);
        Ok(BusinessDayWindow {
            date,
            start: self.local_cutoff(date)?,
            end: self.local_cutoff(next)?,
        })
    }

    /// Whole business days from `date` to the business day of `now`.
    #[must_use]
    pub fn days_since(&self, date: NaiveDate, now: DateTime<Utc>) -> i64 {
        (self.business_day(now) - date).num_days()
    }

    fn local_cutoff(&self, date: NaiveDate) -> Result<DateTime<Utc>, ClosingError> {
        let naive = date
            .and_hms_opt(self.cutoff_hour, 0, 0)
            .ok_or(ClosingError::Config(RegisterConfigError::InvalidCutoffHour(
                self.cutoff_hour,
            )))?;
        self.resolve_local(naive)
    }

    // DST gaps shift forward one hour; ambiguous times take the earlier instant.
    fn resolve_local(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>, ClosingError> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or(ClosingError::NonexistentLocalTime(naive)),
        }
    }
}
