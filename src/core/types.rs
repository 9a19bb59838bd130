use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plotting rectangle for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 25.0,
            left: 40.0,
        }
    }
}

impl Margins {
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidSettings(format!(
                    "margin `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

/// Plotting rectangle in pixel space: the viewport minus margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> ChartResult<Self> {
        if !left.is_finite() || !top.is_finite() {
            return Err(ChartError::InvalidData(
                "plot origin must be finite".to_owned(),
            ));
        }
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidSettings(format!(
                "plot area must be positive, got {width}x{height}"
            )));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    pub fn from_viewport(viewport: Viewport, margins: Margins) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let margins = margins.validate()?;
        Self::new(
            margins.left,
            margins.top,
            f64::from(viewport.width) - margins.left - margins.right,
            f64::from(viewport.height) - margins.top - margins.bottom,
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Axis that carries the categories of bar-like charts.
///
/// `Vertical` bars grow upwards from a horizontal baseline; `Horizontal` bars
/// grow rightwards from a vertical baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// How multi-valued data points are laid out within one category band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesLayout {
    #[default]
    Single,
    Grouped,
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Key used to order bars and dumbbells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortParameter {
    /// Last value minus first value of the multi-valued field.
    Diff,
    /// Sum of the present sub-values.
    Total,
    /// Value at the given index of the multi-valued field.
    Index(usize),
}

/// One input record.
///
/// Numeric fields are optional: `None` (and non-finite values) mean
/// "missing" and never take part in domain computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPoint {
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub size: Option<f64>,
    pub radius: Option<f64>,
    /// One-dimensional position used by strip and bee-swarm charts.
    pub position: Option<f64>,
    /// Multi-valued field: dumbbell positions or grouped/stacked bar sizes.
    pub values: Vec<Option<f64>>,
    pub date: Option<String>,
    pub color: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Opaque payload handed back verbatim in interaction events.
    pub data: Option<serde_json::Value>,
}

impl DataPoint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self::default().with_label(label)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    #[must_use]
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Value at `index` of the multi-valued field, if present and finite.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().and_then(finite)
    }

    /// Present values of the multi-valued field in array order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter_map(finite)
    }
}

/// Returns the value when it is present and finite.
#[must_use]
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
