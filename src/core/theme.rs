use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Palette and spacing constants handed to the engine at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary_color: String,
    pub categorical_colors: Vec<String>,
    pub sequential_colors: Vec<String>,
    pub no_data_color: String,
    pub axis_color: String,
    pub text_color: String,
    pub font_size_px: f64,
    pub dimmed_opacity: f64,
    pub line_stroke_width: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_color: "#006EB5".to_owned(),
            categorical_colors: [
                "#006EB5", "#5DD4F0", "#02A6B4", "#E26B8D", "#FBC412", "#00A67E", "#F6832C",
                "#9260BF",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            sequential_colors: ["#E4F1F8", "#AFD8EE", "#6DB6E3", "#2A8ECD", "#006EB5"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            no_data_color: "#D4D6D8".to_owned(),
            axis_color: "#A9B1B7".to_owned(),
            text_color: "#383D42".to_owned(),
            font_size_px: 12.0,
            dimmed_opacity: 0.3,
            line_stroke_width: 2.0,
        }
    }
}

impl Theme {
    pub fn validate(&self) -> ChartResult<()> {
        if self.categorical_colors.is_empty() {
            return Err(ChartError::InvalidSettings(
                "theme categorical palette must not be empty".to_owned(),
            ));
        }
        if !self.dimmed_opacity.is_finite() || !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(ChartError::InvalidSettings(
                "theme dimmed opacity must be in [0, 1]".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidSettings(
                "theme font size must be finite and > 0".to_owned(),
            ));
        }
        if !self.line_stroke_width.is_finite() || self.line_stroke_width <= 0.0 {
            return Err(ChartError::InvalidSettings(
                "theme line stroke width must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}
