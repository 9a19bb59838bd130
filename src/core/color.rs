use ordered_float::OrderedFloat;

use crate::core::domain::CategoricalDomain;
use crate::core::theme::Theme;
use crate::core::types::DataPoint;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, PartialEq)]
enum ColorMode {
    Single(String),
    Categorical {
        domain: CategoricalDomain,
        palette: Vec<String>,
    },
}

/// Resolves the drawn color of each data point.
///
/// - no point carries a `color` key: every point gets the single color
/// - a point without a key (or with a key outside the domain): no-data color
/// - otherwise: palette entry at the key's domain index, cycling the palette
#[derive(Debug, Clone, PartialEq)]
pub struct ColorResolver {
    mode: ColorMode,
    no_data: String,
}

impl ColorResolver {
    #[must_use]
    pub fn single(color: impl Into<String>, no_data: impl Into<String>) -> Self {
        Self {
            mode: ColorMode::Single(color.into()),
            no_data: no_data.into(),
        }
    }

    #[must_use]
    pub fn categorical(
        domain: CategoricalDomain,
        palette: Vec<String>,
        no_data: impl Into<String>,
    ) -> Self {
        Self {
            mode: ColorMode::Categorical { domain, palette },
            no_data: no_data.into(),
        }
    }

    /// Picks single or categorical mode from the data and configured colors.
    #[must_use]
    pub fn from_points(
        points: &[DataPoint],
        colors: &[String],
        color_domain: Option<&[String]>,
        theme: &Theme,
    ) -> Self {
        let has_keys = points.iter().any(|point| point.color.is_some());
        if !has_keys {
            let color = colors
                .first()
                .cloned()
                .unwrap_or_else(|| theme.primary_color.clone());
            return Self::single(color, theme.no_data_color.clone());
        }

        let palette = if colors.is_empty() {
            theme.categorical_colors.clone()
        } else {
            colors.to_vec()
        };
        Self::categorical(
            CategoricalDomain::resolve(color_domain, points),
            palette,
            theme.no_data_color.clone(),
        )
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.mode, ColorMode::Categorical { .. })
    }

    #[must_use]
    pub fn domain(&self) -> Option<&CategoricalDomain> {
        match &self.mode {
            ColorMode::Categorical { domain, .. } => Some(domain),
            ColorMode::Single(_) => None,
        }
    }

    #[must_use]
    pub fn no_data_color(&self) -> &str {
        &self.no_data
    }

    #[must_use]
    pub fn resolve(&self, point: &DataPoint) -> &str {
        self.resolve_key(point.color.as_deref())
    }

    #[must_use]
    pub fn resolve_key(&self, key: Option<&str>) -> &str {
        match &self.mode {
            ColorMode::Single(color) => color,
            ColorMode::Categorical { domain, palette } => key
                .and_then(|key| domain.index_of(key))
                .and_then(|index| palette_entry(palette, index))
                .unwrap_or(&self.no_data),
        }
    }

    /// Palette color for a series index (dumbbell dots, grouped/stacked segments).
    #[must_use]
    pub fn series_color<'a>(&'a self, palette: &'a [String], index: usize) -> &'a str {
        palette_entry(palette, index).unwrap_or(&self.no_data)
    }
}

fn palette_entry(palette: &[String], index: usize) -> Option<&str> {
    if palette.is_empty() {
        return None;
    }
    palette.get(index % palette.len()).map(String::as_str)
}

/// Step color scale: `colors[i]` for values below `thresholds[i]`, the last
/// color for values at or above the last threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale {
    thresholds: Vec<f64>,
    colors: Vec<String>,
}

impl ThresholdScale {
    pub fn new(thresholds: Vec<f64>, colors: Vec<String>) -> ChartResult<Self> {
        if thresholds.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidSettings(
                "threshold values must be finite".to_owned(),
            ));
        }
        if thresholds
            .windows(2)
            .any(|pair| OrderedFloat(pair[0]) > OrderedFloat(pair[1]))
        {
            return Err(ChartError::InvalidSettings(
                "threshold values must be sorted ascending".to_owned(),
            ));
        }
        if colors.len() != thresholds.len() + 1 {
            return Err(ChartError::InvalidSettings(format!(
                "threshold scale needs {} colors for {} thresholds, got {}",
                thresholds.len() + 1,
                thresholds.len(),
                colors.len()
            )));
        }
        Ok(Self { thresholds, colors })
    }

    /// Evenly spaced thresholds over `[min, max]`, one bucket per color.
    pub fn uniform(min: f64, max: f64, colors: Vec<String>) -> ChartResult<Self> {
        if colors.is_empty() {
            return Err(ChartError::InvalidSettings(
                "threshold scale needs at least one color".to_owned(),
            ));
        }
        let buckets = colors.len() as f64;
        let thresholds = (1..colors.len())
            .map(|i| min + (max - min) * i as f64 / buckets)
            .collect();
        Self::new(thresholds, colors)
    }

    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    #[must_use]
    pub fn resolve(&self, value: f64) -> &str {
        let bucket = self
            .thresholds
            .partition_point(|threshold| OrderedFloat(*threshold) <= OrderedFloat(value));
        &self.colors[bucket]
    }
}
