use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::band_scale::{BandScale, ThicknessLimits};
use crate::core::domain::{DomainOverrides, NumericDomain};
use crate::core::scale::LinearScale;
use crate::core::types::{
    DataPoint, Orientation, PlotArea, SeriesLayout, SortOrder, SortParameter, finite,
};
use crate::error::{ChartError, ChartResult};

/// Layout controls shared by every bar variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayoutConfig {
    pub orientation: Orientation,
    pub layout: SeriesLayout,
    /// Fraction of each category step left empty between bars.
    pub padding: f64,
    pub thickness: ThicknessLimits,
}

impl Default for BarLayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            layout: SeriesLayout::Single,
            padding: 0.25,
            thickness: ThicknessLimits::default(),
        }
    }
}

/// One drawn rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    /// Index of the source point in the input slice.
    pub datum: usize,
    /// Sub-value index for grouped/stacked layouts.
    pub series: Option<usize>,
    /// Category slot after sorting.
    pub slot: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
}

impl BarGeometry {
    /// Length along the value axis.
    #[must_use]
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    /// Thickness along the category axis.
    #[must_use]
    pub fn thickness(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarProjection {
    pub bars: Vec<BarGeometry>,
    pub band: BandScale,
    pub value_scale: LinearScale,
    /// Point indices in category order.
    pub order: Vec<usize>,
}

/// Category order for bar charts.
///
/// Missing sort keys sort as negative infinity. The sort is stable, so ties
/// keep input order.
#[must_use]
pub fn sort_bar_order(
    points: &[DataPoint],
    layout: SeriesLayout,
    sort: Option<SortParameter>,
    order: SortOrder,
) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    let Some(parameter) = sort else {
        return indices;
    };

    let key = |point: &DataPoint| -> f64 {
        let value = match (layout, parameter) {
            (SeriesLayout::Single, _) => finite(point.size),
            (_, SortParameter::Index(index)) => point.value_at(index),
            (_, SortParameter::Total) => {
                let mut present = point.present_values().peekable();
                present.peek().is_some().then(|| present.sum())
            }
            (_, SortParameter::Diff) => match (first_present(point), last_present(point)) {
                (Some(first), Some(last)) => Some(last - first),
                _ => None,
            },
        };
        value.unwrap_or(f64::NEG_INFINITY)
    };

    indices.sort_by_key(|&index| OrderedFloat(key(&points[index])));
    if order == SortOrder::Descending {
        indices.reverse();
    }
    indices
}

pub(crate) fn first_present(point: &DataPoint) -> Option<f64> {
    point.present_values().next()
}

pub(crate) fn last_present(point: &DataPoint) -> Option<f64> {
    point.present_values().last()
}

/// Value-axis domain for the given layout.
#[must_use]
pub fn bar_value_domain(
    points: &[DataPoint],
    layout: SeriesLayout,
    overrides: DomainOverrides,
) -> Option<NumericDomain> {
    match layout {
        SeriesLayout::Single => {
            NumericDomain::zero_anchored(points.iter().map(|point| point.size), overrides)
        }
        SeriesLayout::Grouped => NumericDomain::zero_anchored(
            points
                .iter()
                .flat_map(|point| point.values.iter().copied()),
            overrides,
        ),
        SeriesLayout::Stacked => NumericDomain::zero_anchored(
            points.iter().flat_map(|point| {
                let (positive, negative) = stack_totals(point);
                [Some(positive), Some(negative)]
            }),
            overrides,
        ),
    }
}

fn stack_totals(point: &DataPoint) -> (f64, f64) {
    point
        .present_values()
        .fold((0.0, 0.0), |(positive, negative), value| {
            if value >= 0.0 {
                (positive + value, negative)
            } else {
                (positive, negative + value)
            }
        })
}

/// Projects points into bar rectangles for any orientation and layout.
///
/// Returns `Ok(None)` when there is nothing to lay out or no value domain is
/// derivable; callers render an empty state in that case.
pub fn project_bars(
    points: &[DataPoint],
    order: &[usize],
    plot: PlotArea,
    config: BarLayoutConfig,
    overrides: DomainOverrides,
) -> ChartResult<Option<BarProjection>> {
    if order.is_empty() {
        return Ok(None);
    }
    if let Some(&bad) = order.iter().find(|&&index| index >= points.len()) {
        return Err(ChartError::UnknownDatum {
            index: bad,
            len: points.len(),
        });
    }
    let Some(domain) = bar_value_domain(points, config.layout, overrides.validate()?) else {
        return Ok(None);
    };

    let (band_range, value_range) = match config.orientation {
        Orientation::Vertical => ((plot.left, plot.right()), (plot.bottom(), plot.top)),
        Orientation::Horizontal => ((plot.top, plot.bottom()), (plot.left, plot.right())),
    };
    let band = BandScale::new(
        order.len(),
        band_range.0,
        band_range.1,
        config.padding,
        config.thickness,
    )?;
    let value_scale = LinearScale::from_domain(domain, value_range.0, value_range.1)?;
    let baseline_value = domain.clamp(0.0);

    let mut bars = Vec::with_capacity(order.len());
    for (slot, &datum) in order.iter().enumerate() {
        let point = &points[datum];
        let Some(band_start) = band.start(slot) else {
            continue;
        };
        let rect = |series: Option<usize>,
                    (from, to): (f64, f64),
                    start: f64,
                    thickness: f64,
                    value: f64| {
            let a = value_scale.domain_to_pixel(domain.clamp(from));
            let b = value_scale.domain_to_pixel(domain.clamp(to));
            let (lo, extent) = (a.min(b), (a - b).abs());
            let (x, y, width, height) = match config.orientation {
                Orientation::Vertical => (start, lo, thickness, extent),
                Orientation::Horizontal => (lo, start, extent, thickness),
            };
            BarGeometry {
                datum,
                series,
                slot,
                x,
                y,
                width,
                height,
                value,
            }
        };

        match config.layout {
            SeriesLayout::Single => {
                if let Some(value) = finite(point.size) {
                    bars.push(rect(
                        None,
                        (baseline_value, value),
                        band_start,
                        band.thickness(),
                        value,
                    ));
                }
            }
            SeriesLayout::Grouped => {
                // Limits apply to each sub-bar; the group stays centred on the band.
                let series_count = point.values.len().max(1) as f64;
                let sub_thickness = config.thickness.apply(band.raw_thickness() / series_count);
                let group_start =
                    band_start + band.thickness() / 2.0 - sub_thickness * series_count / 2.0;
                for (series, value) in point.values.iter().enumerate() {
                    let Some(value) = finite(*value) else {
                        continue;
                    };
                    let start = group_start + sub_thickness * series as f64;
                    bars.push(rect(
                        Some(series),
                        (baseline_value, value),
                        start,
                        sub_thickness,
                        value,
                    ));
                }
            }
            SeriesLayout::Stacked => {
                let (mut positive, mut negative) = (0.0, 0.0);
                for (series, value) in point.values.iter().enumerate() {
                    let Some(value) = finite(*value) else {
                        continue;
                    };
                    let offset = if value >= 0.0 {
                        &mut positive
                    } else {
                        &mut negative
                    };
                    let from = *offset;
                    *offset += value;
                    bars.push(rect(
                        Some(series),
                        (from, *offset),
                        band_start,
                        band.thickness(),
                        value,
                    ));
                }
            }
        }
    }

    Ok(Some(BarProjection {
        bars,
        band,
        value_scale,
        order: order.to_vec(),
    }))
}
