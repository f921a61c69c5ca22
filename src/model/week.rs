//! GPS week number, wrapped modulo 1024 to mirror the broadcast almanac
//! rollover. Recomputed per ingestion run, never persisted.

use chrono::{DateTime, TimeZone, Utc};

const ROLLOVER_WEEKS: i64 = 1024;

/// GPS epoch: 1980-01-06 00:00:00 UTC.
fn gps_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1980, 1, 6, 0, 0, 0).unwrap()
}

/// Week number for the given instant, in [0, 1023].
pub fn week_number(at: DateTime<Utc>) -> u32 {
    let days = (at - gps_epoch()).num_days();
    ((days / 7).rem_euclid(ROLLOVER_WEEKS)) as u32
}

pub fn current_week_number() -> u32 {
    week_number(Utc::now())
}
