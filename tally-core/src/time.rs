//! Time utilities: the calendar "today" that date checks are relative to.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name like "Europe/Rome".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse().map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now` as seen in `tz`.
pub fn date_in(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Today's date in the IANA timezone `tz`.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    Ok(date_in(Utc::now(), parse_timezone(tz)?))
}
