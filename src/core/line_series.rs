use std::fmt::Write as _;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::domain::{DomainOverrides, NumericDomain};
use crate::core::scale::LinearScale;
use crate::core::time_scale::TimeScale;
use crate::core::types::{DataPoint, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineVertex {
    pub datum: usize,
    pub x: f64,
    pub y: f64,
}

/// One series (points sharing a `color` key), split at missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesGeometry {
    pub key: Option<String>,
    pub segments: Vec<Vec<LineVertex>>,
}

impl LineSeriesGeometry {
    /// SVG path data, one `M` command per segment.
    #[must_use]
    pub fn path(&self) -> String {
        svg_polyline(self.segments.iter().map(|segment| {
            segment
                .iter()
                .map(|vertex| (vertex.x, vertex.y))
                .collect::<Vec<_>>()
        }))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &LineVertex> {
        self.segments.iter().flatten()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineProjection {
    pub series: Vec<LineSeriesGeometry>,
    pub time_scale: TimeScale,
    pub value_scale: LinearScale,
}

/// Joins point lists into SVG path data (`M x,y L x,y ...`).
#[must_use]
pub fn svg_polyline<I>(segments: I) -> String
where
    I: IntoIterator<Item = Vec<(f64, f64)>>,
{
    let mut path = String::new();
    for segment in segments {
        for (index, (x, y)) in segment.iter().enumerate() {
            let command = if index == 0 { 'M' } else { 'L' };
            let _ = write!(path, "{command}{},{}", round_px(*x), round_px(*y));
        }
    }
    path
}

fn round_px(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Projects dated points into one polyline per `color` key.
///
/// `dates[i]` is the parsed date of `points[i]`; points without a date are
/// ignored. Within a series, a missing `y` ends the current segment.
pub fn project_lines(
    points: &[DataPoint],
    dates: &[Option<NaiveDateTime>],
    plot: PlotArea,
    overrides: DomainOverrides,
) -> ChartResult<Option<LineProjection>> {
    if dates.len() != points.len() {
        return Err(ChartError::InvalidData(format!(
            "expected {} parsed dates, got {}",
            points.len(),
            dates.len()
        )));
    }
    let present_dates: Vec<NaiveDateTime> = dates.iter().flatten().copied().collect();
    if present_dates.is_empty() {
        return Ok(None);
    }
    let Some(domain) = NumericDomain::zero_anchored(
        points
            .iter()
            .zip(dates)
            .filter(|(_, date)| date.is_some())
            .map(|(point, _)| point.y),
        overrides.validate()?,
    ) else {
        return Ok(None);
    };

    let time_scale = TimeScale::from_dates(&present_dates, plot.left, plot.right())?;
    let value_scale = LinearScale::from_domain(domain, plot.bottom(), plot.top)?;

    let mut grouped: IndexMap<Option<String>, Vec<(NaiveDateTime, usize)>> = IndexMap::new();
    for (datum, (point, date)) in points.iter().zip(dates).enumerate() {
        if let Some(date) = date {
            grouped
                .entry(point.color.clone())
                .or_default()
                .push((*date, datum));
        }
    }

    let series = grouped
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by_key(|(date, _)| *date);
            let mut segments = Vec::new();
            let mut current = Vec::new();
            for (date, datum) in members {
                match finite(points[datum].y) {
                    Some(value) => current.push(LineVertex {
                        datum,
                        x: time_scale.time_to_pixel(date),
                        y: value_scale.domain_to_pixel(value),
                    }),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
            LineSeriesGeometry { key, segments }
        })
        .collect();

    Ok(Some(LineProjection {
        series,
        time_scale,
        value_scale,
    }))
}
