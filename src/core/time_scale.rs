use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::core::primitives::{datetime_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::scale::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Span applied when every date is identical.
pub const DEGENERATE_TIME_SPAN_SECONDS: f64 = 86_400.0;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Sub-week tick steps, aligned to multiples of the step since the epoch.
const FIXED_STEPS_SECONDS: [i64; 14] = [
    1,
    5,
    15,
    30,
    MINUTE,
    5 * MINUTE,
    15 * MINUTE,
    30 * MINUTE,
    HOUR,
    3 * HOUR,
    6 * HOUR,
    12 * HOUR,
    DAY,
    2 * DAY,
];

const WEEK_SECONDS: f64 = 7.0 * DAY as f64;
const MONTH_STEPS: [u32; 3] = [1, 3, 6];

/// Date axis mapping built directly from the observed date extent.
///
/// Unlike numeric value axes there is no zero anchoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let (start, end) = normalize_range(
            datetime_to_unix_seconds(start),
            datetime_to_unix_seconds(end),
        );
        Ok(Self {
            linear: LinearScale::new(start, end, range_start, range_end)?,
        })
    }

    /// Fits the scale to the min/max of `dates`.
    pub fn from_dates(
        dates: &[NaiveDateTime],
        range_start: f64,
        range_end: f64,
    ) -> ChartResult<Self> {
        let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
            return Err(ChartError::InvalidData(
                "time scale cannot be built from empty data".to_owned(),
            ));
        };
        Self::new(*min, *max, range_start, range_end)
    }

    /// Domain bounds in unix seconds.
    #[must_use]
    pub fn domain_seconds(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn time_to_pixel(self, time: NaiveDateTime) -> f64 {
        self.linear.domain_to_pixel(datetime_to_unix_seconds(time))
    }

    pub fn pixel_to_time(self, pixel: f64) -> ChartResult<NaiveDateTime> {
        unix_seconds_to_datetime(self.linear.pixel_to_domain(pixel))
    }

    /// Calendar-aligned ticks across the domain.
    ///
    /// The step is picked from the span: whole seconds, minutes, hours or
    /// days up to two days, then Monday-aligned weeks, then months starting
    /// on the 1st, then January 1st of every `n` years with `n` in 1, 2, 5,
    /// 10 and so on.
    pub fn ticks(self, count: usize) -> ChartResult<Vec<NaiveDateTime>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let (start, end) = self.linear.domain();
        let start = unix_seconds_to_datetime(start)?;
        let end = unix_seconds_to_datetime(end)?;
        Ok(match CalendarStep::choose(start, end, count) {
            CalendarStep::Seconds(step) => fixed_ticks(start, end, step),
            CalendarStep::Weeks => week_ticks(start, end),
            CalendarStep::Months(step) => month_ticks(start, end, step),
            CalendarStep::Years(step) => year_ticks(start, end, step),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalendarStep {
    Seconds(i64),
    Weeks,
    Months(u32),
    Years(i32),
}

impl CalendarStep {
    fn choose(start: NaiveDateTime, end: NaiveDateTime, count: usize) -> Self {
        let count = count as f64;
        let target = (end - start).num_milliseconds() as f64 / 1000.0 / count;
        if let Some(step) = FIXED_STEPS_SECONDS
            .iter()
            .copied()
            .find(|step| *step as f64 >= target)
        {
            return Self::Seconds(step);
        }
        if target <= WEEK_SECONDS {
            return Self::Weeks;
        }
        let months = (fractional_months(end) - fractional_months(start)) / count;
        if let Some(step) = MONTH_STEPS.iter().copied().find(|step| f64::from(*step) >= months) {
            return Self::Months(step);
        }
        Self::Years(nice_year_step(months / 12.0))
    }
}

fn fractional_months(time: NaiveDateTime) -> f64 {
    let days_in_month = days_in_month(time.year(), time.month());
    let into_month =
        f64::from(time.day0()) + f64::from(time.num_seconds_from_midnight()) / DAY as f64;
    f64::from(time.year()) * 12.0 + f64::from(time.month0()) + into_month / days_in_month
}

fn days_in_month(year: i32, month: u32) -> f64 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (NaiveDate::from_ymd_opt(year, month, 1), next) {
        (Some(first), Some(next)) => (next - first).num_days() as f64,
        _ => 30.0,
    }
}

fn nice_year_step(target_years: f64) -> i32 {
    let mut magnitude = 1;
    while magnitude < 100_000 {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            if f64::from(step) >= target_years {
                return step;
            }
        }
        magnitude *= 10;
    }
    magnitude
}

fn fixed_ticks(start: NaiveDateTime, end: NaiveDateTime, step: i64) -> Vec<NaiveDateTime> {
    let first_second = start.and_utc().timestamp() + i64::from(start.nanosecond() > 0);
    let first = -((-first_second).div_euclid(step)) * step;
    let last = end.and_utc().timestamp();
    (0..)
        .map(|index| first + index * step)
        .take_while(|second| *second <= last)
        .filter_map(|second| DateTime::from_timestamp(second, 0))
        .map(|time| time.naive_utc())
        .collect()
}

fn week_ticks(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
    let mut day = start.date();
    if start.time() > NaiveTime::MIN {
        day = day.succ_opt().unwrap_or(day);
    }
    let offset = (7 - day.weekday().num_days_from_monday()) % 7;
    let Some(first) = day.checked_add_days(Days::new(u64::from(offset))) else {
        return Vec::new();
    };
    first
        .iter_weeks()
        .map(|day| day.and_time(NaiveTime::MIN))
        .take_while(|time| *time <= end)
        .collect()
}

fn month_ticks(start: NaiveDateTime, end: NaiveDateTime, step: u32) -> Vec<NaiveDateTime> {
    let step = i64::from(step);
    let mut month = i64::from(start.year()) * 12 + i64::from(start.month0());
    if !is_month_start(start) {
        month += 1;
    }
    let first = -((-month).div_euclid(step)) * step;
    (0..)
        .map(|index| first + index * step)
        .map_while(|month| {
            let year = i32::try_from(month.div_euclid(12)).ok()?;
            let date = NaiveDate::from_ymd_opt(year, month.rem_euclid(12) as u32 + 1, 1)?;
            Some(date.and_time(NaiveTime::MIN))
        })
        .take_while(|time| *time <= end)
        .collect()
}

fn year_ticks(start: NaiveDateTime, end: NaiveDateTime, step: i32) -> Vec<NaiveDateTime> {
    let mut year = start.year();
    if !(is_month_start(start) && start.month() == 1) {
        year += 1;
    }
    let first = -((-year).div_euclid(step)) * step;
    (0..)
        .map(|index| first + index * step)
        .map_while(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .map(|date| date.and_time(NaiveTime::MIN))
        .take_while(|time| *time <= end)
        .collect()
}

fn is_month_start(time: NaiveDateTime) -> bool {
    time.day() == 1 && time.time() == NaiveTime::MIN
}

fn normalize_range(start: f64, end: f64) -> (f64, f64) {
    if start == end {
        let half = DEGENERATE_TIME_SPAN_SECONDS / 2.0;
        return (start - half, end + half);
    }
    (start.min(end), start.max(end))
}
