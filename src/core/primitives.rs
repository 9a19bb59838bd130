use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::error::{ChartError, ChartResult};

/// Parses a raw date string using a `strftime`-style format.
///
/// Date-only formats (no time fields) resolve to midnight.
pub fn parse_date(raw: &str, format: &str) -> ChartResult<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
        return Ok(parsed);
    }
    NaiveDate::parse_from_str(raw, format)
        .map(|date| date.and_time(NaiveTime::MIN))
        .or_else(|_| parse_year_only(raw, format))
        .map_err(|_| {
            ChartError::InvalidData(format!("date `{raw}` does not match format `{format}`"))
        })
}

// chrono refuses to build a `NaiveDate` from a bare `%Y`.
fn parse_year_only(raw: &str, format: &str) -> Result<NaiveDateTime, ()> {
    if format != "%Y" {
        return Err(());
    }
    let year: i32 = raw.parse().map_err(|_| ())?;
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or(())
}

#[must_use]
pub fn datetime_to_unix_seconds(time: NaiveDateTime) -> f64 {
    time.and_utc().timestamp_millis() as f64 / 1000.0
}

pub fn unix_seconds_to_datetime(seconds: f64) -> ChartResult<NaiveDateTime> {
    if !seconds.is_finite() {
        return Err(ChartError::InvalidData(
            "timestamp must be finite".to_owned(),
        ));
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
        .map(|time| time.naive_utc())
        .ok_or_else(|| ChartError::InvalidData(format!("timestamp {seconds} is out of range")))
}

const MAX_TICK_DECIMALS: u32 = 10;

/// Formats a tick value with the number of decimals implied by `step`.
///
/// Goes through `Decimal` so labels such as `0.3` never print as
/// `0.30000000000000004`.
#[must_use]
pub fn format_tick_value(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 && step < 1.0 {
        Decimal::from_f64(step)
            .map(|step| step.normalize().scale())
            .unwrap_or(MAX_TICK_DECIMALS)
            .min(MAX_TICK_DECIMALS)
    } else {
        0
    };
    match Decimal::from_f64(value) {
        Some(decimal) => decimal.round_dp(decimals).normalize().to_string(),
        None => format!("{value}"),
    }
}
