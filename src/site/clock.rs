//! Wall-clock access for the synthetic routes and the `Date` header.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Local time of day, e.g. `14:05:09`.
pub fn format_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Local calendar date, e.g. `19 Oct 2026`.
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%d %b %Y").to_string()
}

/// ISO-8601 instant for the `Date` header, e.g. `2026-10-19T12:00:00.000Z`.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
