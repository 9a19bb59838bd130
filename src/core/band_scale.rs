use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Bars never collapse below this drawn thickness.
pub const MIN_DRAWN_THICKNESS_PX: f64 = 0.5;

/// Optional clamp applied to the computed band thickness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThicknessLimits {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl ThicknessLimits {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("min_bar_thickness", self.min),
            ("max_bar_thickness", self.max),
        ] {
            if matches!(value, Some(v) if !v.is_finite() || v <= 0.0) {
                return Err(ChartError::InvalidSettings(format!(
                    "`{name}` must be finite and > 0 when set"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ChartError::InvalidSettings(
                    "`min_bar_thickness` must not exceed `max_bar_thickness`".to_owned(),
                ));
            }
        }
        Ok(self)
    }

    /// Clamps a computed thickness, never below `MIN_DRAWN_THICKNESS_PX`.
    #[must_use]
    pub fn apply(self, raw: f64) -> f64 {
        let mut thickness = raw;
        if let Some(max) = self.max {
            thickness = thickness.min(max);
        }
        if let Some(min) = self.min {
            thickness = thickness.max(min);
        }
        thickness.max(MIN_DRAWN_THICKNESS_PX)
    }
}

/// Equal division of a categorical axis into `count` bands.
///
/// Band centers are always evenly spaced at `step` intervals. The drawn
/// thickness is `step * (1 - padding)` clamped by `ThicknessLimits`, so a
/// clamped bar may overlap its neighbours' padding but never moves its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    range_start: f64,
    step: f64,
    raw_thickness: f64,
    thickness: f64,
}

impl BandScale {
    pub fn new(
        count: usize,
        range_start: f64,
        range_end: f64,
        padding: f64,
        limits: ThicknessLimits,
    ) -> ChartResult<Self> {
        if count == 0 {
            return Err(ChartError::InvalidData(
                "band scale needs at least one category".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() || range_start == range_end {
            return Err(ChartError::InvalidData(
                "band scale range must be finite and non-empty".to_owned(),
            ));
        }
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidSettings(
                "band padding must be finite and in [0, 1)".to_owned(),
            ));
        }
        let limits = limits.validate()?;

        let step = (range_end - range_start) / count as f64;
        let raw_thickness = step.abs() * (1.0 - padding);
        Ok(Self {
            count,
            range_start,
            step,
            raw_thickness,
            thickness: limits.apply(raw_thickness),
        })
    }

    #[must_use]
    pub fn count(self) -> usize {
        self.count
    }

    /// Signed center-to-center distance.
    #[must_use]
    pub fn step(self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn raw_thickness(self) -> f64 {
        self.raw_thickness
    }

    /// Drawn thickness after clamping.
    #[must_use]
    pub fn thickness(self) -> f64 {
        self.thickness
    }

    #[must_use]
    pub fn center(self, index: usize) -> Option<f64> {
        (index < self.count).then(|| self.range_start + self.step * (index as f64 + 0.5))
    }

    /// Lower pixel edge of the drawn band.
    #[must_use]
    pub fn start(self, index: usize) -> Option<f64> {
        self.center(index).map(|center| center - self.thickness * 0.5)
    }

    /// Index of the band whose step interval contains `pixel`.
    #[must_use]
    pub fn index_at(self, pixel: f64) -> Option<usize> {
        let offset = (pixel - self.range_start) / self.step;
        if !offset.is_finite() || offset < 0.0 {
            return None;
        }
        let index = offset.floor() as usize;
        (index < self.count).then_some(index)
    }
}
