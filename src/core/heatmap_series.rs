use serde::{Deserialize, Serialize};

use crate::core::band_scale::{BandScale, ThicknessLimits};
use crate::core::domain::{CategoricalDomain, DomainOverrides, NumericDomain};
use crate::core::types::{DataPoint, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Column order; derived from `x_label` in first-seen order when absent.
    #[serde(default)]
    pub x_domain: Option<Vec<String>>,
    /// Row order; derived from `y_label` in first-seen order when absent.
    #[serde(default)]
    pub y_domain: Option<Vec<String>>,
    #[serde(default)]
    pub cell_padding: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub datum: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `None` when the point has no `size` value.
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapProjection {
    pub cells: Vec<HeatmapCell>,
    pub columns: CategoricalDomain,
    pub rows: CategoricalDomain,
    /// Extent of the present `size` values, for threshold color scales.
    pub value_domain: Option<NumericDomain>,
}

/// One rectangle per (`x_label`, `y_label`) pair on two band scales.
///
/// Points whose labels are missing or outside the configured domains are
/// skipped.
pub fn project_heatmap(
    points: &[DataPoint],
    plot: PlotArea,
    config: &HeatmapConfig,
    overrides: DomainOverrides,
) -> ChartResult<Option<HeatmapProjection>> {
    if !config.cell_padding.is_finite() || !(0.0..1.0).contains(&config.cell_padding) {
        return Err(ChartError::InvalidSettings(
            "heatmap cell padding must be in [0, 1)".to_owned(),
        ));
    }
    let columns = match &config.x_domain {
        Some(keys) => CategoricalDomain::explicit(keys.iter().cloned()),
        None => CategoricalDomain::explicit(points.iter().filter_map(|p| p.x_label.clone())),
    };
    let rows = match &config.y_domain {
        Some(keys) => CategoricalDomain::explicit(keys.iter().cloned()),
        None => CategoricalDomain::explicit(points.iter().filter_map(|p| p.y_label.clone())),
    };
    if columns.is_empty() || rows.is_empty() {
        return Ok(None);
    }

    let x_band = BandScale::new(
        columns.len(),
        plot.left,
        plot.right(),
        config.cell_padding,
        ThicknessLimits::default(),
    )?;
    let y_band = BandScale::new(
        rows.len(),
        plot.top,
        plot.bottom(),
        config.cell_padding,
        ThicknessLimits::default(),
    )?;

    let cells = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| {
            let column = columns.index_of(point.x_label.as_deref()?)?;
            let row = rows.index_of(point.y_label.as_deref()?)?;
            Some(HeatmapCell {
                datum,
                x: x_band.start(column)?,
                y: y_band.start(row)?,
                width: x_band.thickness(),
                height: y_band.thickness(),
                value: finite(point.size),
            })
        })
        .collect();

    let value_domain = NumericDomain::observed(points.iter().map(|p| p.size), overrides.validate()?);
    Ok(Some(HeatmapProjection {
        cells,
        columns,
        rows,
        value_domain,
    }))
}
