use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::band_scale::{BandScale, ThicknessLimits};
use crate::core::bar_series::{first_present, last_present};
use crate::core::domain::{DomainOverrides, NumericDomain};
use crate::core::scale::LinearScale;
use crate::core::types::{DataPoint, Orientation, PlotArea, SortOrder, SortParameter};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DumbbellConfig {
    /// `Horizontal` puts categories on the y axis and values on the x axis.
    pub orientation: Orientation,
    pub padding: f64,
    pub dot_radius: f64,
}

impl Default for DumbbellConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            padding: 0.25,
            dot_radius: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DumbbellDot {
    pub series: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DumbbellGeometry {
    pub datum: usize,
    pub slot: usize,
    /// Segment from the first to the last present value.
    pub connector: Option<(f64, f64, f64, f64)>,
    pub dots: SmallVec<[DumbbellDot; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DumbbellProjection {
    pub dumbbells: Vec<DumbbellGeometry>,
    pub band: BandScale,
    pub value_scale: LinearScale,
}

/// Dumbbell ordering.
///
/// `Diff` sorts by last minus first value; `Index(i)` by the i-th value.
/// Missing keys sort as negative infinity so they land at one end.
#[must_use]
pub fn sort_dumbbells(
    points: &[DataPoint],
    sort: Option<SortParameter>,
    order: SortOrder,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    let Some(parameter) = sort else {
        return indices;
    };
    let key = |point: &DataPoint| {
        let value = match parameter {
            SortParameter::Diff => match (first_present(point), last_present(point)) {
                (Some(first), Some(last)) => Some(last - first),
                _ => None,
            },
            SortParameter::Index(index) => point.value_at(index),
            SortParameter::Total => {
                let mut present = point.present_values().peekable();
                present.peek().is_some().then(|| present.sum())
            }
        };
        OrderedFloat(value.unwrap_or(f64::NEG_INFINITY))
    };
    indices.sort_by_key(|&index| key(&points[index]));
    if order == SortOrder::Descending {
        indices.reverse();
    }
    indices
}

pub fn project_dumbbells(
    points: &[DataPoint],
    order: &[usize],
    plot: PlotArea,
    config: DumbbellConfig,
    overrides: DomainOverrides,
) -> ChartResult<Option<DumbbellProjection>> {
    if !config.dot_radius.is_finite() || config.dot_radius <= 0.0 {
        return Err(ChartError::InvalidSettings(
            "dumbbell dot radius must be finite and > 0".to_owned(),
        ));
    }
    if order.is_empty() {
        return Ok(None);
    }
    if let Some(&bad) = order.iter().find(|&&index| index >= points.len()) {
        return Err(ChartError::UnknownDatum {
            index: bad,
            len: points.len(),
        });
    }
    let Some(domain) = NumericDomain::zero_anchored(
        order
            .iter()
            .flat_map(|&index| points[index].values.iter().copied()),
        overrides.validate()?,
    ) else {
        return Ok(None);
    };

    let (band_range, value_range) = match config.orientation {
        Orientation::Horizontal => ((plot.top, plot.bottom()), (plot.left, plot.right())),
        Orientation::Vertical => ((plot.left, plot.right()), (plot.bottom(), plot.top)),
    };
    let band = BandScale::new(
        order.len(),
        band_range.0,
        band_range.1,
        config.padding,
        ThicknessLimits::default(),
    )?;
    let value_scale = LinearScale::from_domain(domain, value_range.0, value_range.1)?;
    let place = |center: f64, value: f64| {
        let along = value_scale.domain_to_pixel(value);
        match config.orientation {
            Orientation::Horizontal => (along, center),
            Orientation::Vertical => (center, along),
        }
    };

    let mut dumbbells = Vec::with_capacity(order.len());
    for (slot, &datum) in order.iter().enumerate() {
        let Some(center) = band.center(slot) else {
            continue;
        };
        let point = &points[datum];
        let dots = point
            .values
            .iter()
            .enumerate()
            .filter_map(|(series, value)| {
                let value = value.filter(|v| v.is_finite())?;
                let (cx, cy) = place(center, value);
                Some(DumbbellDot {
                    series,
                    cx,
                    cy,
                    r: config.dot_radius,
                    value,
                })
            })
            .collect::<SmallVec<[DumbbellDot; 4]>>();
        let connector = match (first_present(point), last_present(point)) {
            (Some(first), Some(last)) if dots.len() > 1 => {
                let (x1, y1) = place(center, first);
                let (x2, y2) = place(center, last);
                Some((x1, y1, x2, y2))
            }
            _ => None,
        };
        dumbbells.push(DumbbellGeometry {
            datum,
            slot,
            connector,
            dots,
        });
    }

    Ok(Some(DumbbellProjection {
        dumbbells,
        band,
        value_scale,
    }))
}
