use chrono::NaiveDateTime;

/// Indices of points whose date falls inside an inclusive window.
///
/// Bounds may be given in either order. Points without a parsed date are
/// never included.
#[must_use]
pub fn points_in_date_window(
    dates: &[Option<NaiveDateTime>],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<usize> {
    let (min_t, max_t) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    dates
        .iter()
        .enumerate()
        .filter_map(|(index, date)| {
            date.filter(|date| *date >= min_t && *date <= max_t)
                .map(|_| index)
        })
        .collect()
}

/// Indices of points dated exactly `active`.
#[must_use]
pub fn points_at_date(dates: &[Option<NaiveDateTime>], active: NaiveDateTime) -> Vec<usize> {
    points_in_date_window(dates, active, active)
}

/// Indices of points dated on or before `active`.
#[must_use]
pub fn points_up_to_date(dates: &[Option<NaiveDateTime>], active: NaiveDateTime) -> Vec<usize> {
    points_in_date_window(dates, NaiveDateTime::MIN, active)
}
