use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::core::types::{DataPoint, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub datum: usize,
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Radians clockwise from 12 o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

impl ArcGeometry {
    /// Point on the mid-radius at the mid-angle, in pixels.
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        let angle = (self.start_angle + self.end_angle) / 2.0 - FRAC_PI_2;
        let radius = (self.inner_radius + self.outer_radius) / 2.0;
        (self.cx + radius * angle.cos(), self.cy + radius * angle.sin())
    }

    /// Whether the pixel lies inside the annular sector.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        let distance = dx.hypot(dy);
        if distance < self.inner_radius || distance > self.outer_radius {
            return false;
        }
        let angle = (dx.atan2(-dy) + TAU) % TAU;
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Donut arcs from the `size` field, clockwise from 12 o'clock in input order.
///
/// Missing and negative values are skipped. Returns `Ok(None)` when no
/// positive total is left.
pub fn project_donut(
    points: &[DataPoint],
    plot: PlotArea,
    inner_radius_ratio: f64,
) -> ChartResult<Option<Vec<ArcGeometry>>> {
    if !inner_radius_ratio.is_finite() || !(0.0..1.0).contains(&inner_radius_ratio) {
        return Err(ChartError::InvalidSettings(
            "donut inner radius ratio must be in [0, 1)".to_owned(),
        ));
    }
    let values: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| finite(point.size).filter(|v| *v >= 0.0).map(|v| (datum, v)))
        .collect();
    let total: f64 = values.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return Ok(None);
    }

    let (cx, cy) = plot.center();
    let outer_radius = plot.width.min(plot.height) / 2.0;
    let inner_radius = outer_radius * inner_radius_ratio;
    let mut angle = 0.0;
    let arcs = values
        .into_iter()
        .map(|(datum, value)| {
            let start_angle = angle;
            angle += value / total * TAU;
            ArcGeometry {
                datum,
                cx,
                cy,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle: angle,
                value,
            }
        })
        .collect();
    Ok(Some(arcs))
}
