use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

/// Dot-grid ("unit") chart layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitChartConfig {
    /// Width in pixels of the dot grid.
    pub size: f64,
    /// Dots per row.
    pub grid_size: usize,
    /// Gap between adjacent dots.
    pub gap: f64,
    /// Dots representing `max_value`.
    pub total_dots: usize,
    /// Value represented by the full grid; defaults to the sum of values.
    #[serde(default)]
    pub max_value: Option<f64>,
}

impl Default for UnitChartConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            grid_size: 10,
            gap: 3.0,
            total_dots: 100,
            max_value: None,
        }
    }
}

impl UnitChartConfig {
    /// Per-dot radius derived from grid width, dots per row and gap.
    #[must_use]
    pub fn dot_radius(self) -> f64 {
        if self.grid_size == 0 {
            return 0.0;
        }
        let grid = self.grid_size as f64;
        (self.size - self.gap * (grid - 1.0)) / grid / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitDot {
    /// Point the dot belongs to; `None` for the unfilled remainder.
    pub datum: Option<usize>,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// Lays out `total_dots` dots row by row from the top-left of the plot.
///
/// Each point gets `round(value / max_value * total_dots)` consecutive dots
/// in input order. Fails when the radius is not positive or a value exceeds
/// `max_value`.
pub fn project_units(
    points: &[DataPoint],
    plot: PlotArea,
    config: UnitChartConfig,
) -> ChartResult<Vec<UnitDot>> {
    let radius = config.dot_radius();
    if !radius.is_finite() || radius <= 0.0 {
        return Err(ChartError::InvalidSettings(format!(
            "unit chart dot radius is {radius}: increase `size` or reduce `grid_size`/`gap`"
        )));
    }
    let values: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| finite(point.size).map(|value| (datum, value.max(0.0))))
        .collect();
    let total: f64 = values.iter().map(|(_, value)| value).sum();
    let max_value = config.max_value.unwrap_or(total);
    if let Some((datum, value)) = values.iter().find(|(_, value)| *value > max_value) {
        return Err(ChartError::InvalidSettings(format!(
            "unit chart value {value} of data point {datum} exceeds max value {max_value}"
        )));
    }
    if total > max_value {
        return Err(ChartError::InvalidSettings(format!(
            "unit chart values sum to {total}, exceeding max value {max_value}"
        )));
    }

    let mut owners: Vec<Option<usize>> = Vec::with_capacity(config.total_dots);
    if max_value > 0.0 {
        for (datum, value) in &values {
            let count = (value / max_value * config.total_dots as f64).round() as usize;
            owners.extend(std::iter::repeat_n(Some(*datum), count));
        }
    }
    owners.truncate(config.total_dots);
    owners.resize(config.total_dots, None);

    let pitch = radius * 2.0 + config.gap;
    Ok(owners
        .into_iter()
        .enumerate()
        .map(|(index, datum)| {
            let (row, column) = (index / config.grid_size, index % config.grid_size);
            UnitDot {
                datum,
                cx: plot.left + radius + column as f64 * pitch,
                cy: plot.top + radius + row as f64 * pitch,
                r: radius,
            }
        })
        .collect())
}
