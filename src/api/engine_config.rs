use serde::{Deserialize, Serialize};

use crate::core::{
    DomainOverrides, HeatmapConfig, Margins, Orientation, Projection, RadiusPolicy, SeriesLayout,
    SortOrder, SortParameter, Theme, ThicknessLimits, UnitChartConfig, Viewport,
};
use crate::error::{ChartError, ChartResult};
use crate::presentation::TooltipConfig;

/// Chart family drawn by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartFamily {
    #[default]
    Bar,
    Dumbbell,
    Line,
    Scatter,
    Strip,
    BeeSwarm,
    Choropleth,
    DotDensity,
    Heatmap,
    Donut,
    Unit,
}

impl ChartFamily {
    #[must_use]
    pub fn is_map(self) -> bool {
        matches!(self, Self::Choropleth | Self::DotDensity)
    }

    /// Families whose active data follows the playback date.
    #[must_use]
    pub fn is_time_filtered(self) -> bool {
        !matches!(self, Self::Line)
    }
}

/// Public engine settings.
///
/// Serializable so host applications can persist/load chart setup; every
/// field has a default, so partial JSON objects are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default)]
    pub chart: ChartFamily,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub layout: SeriesLayout,
    /// Explicit width; falls back to the container size when absent.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub margins: Margins,
    /// Single color (first entry) or categorical palette.
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_domain: Option<Vec<String>>,
    /// Thresholds for a step color scale over values (choropleth, heatmap).
    #[serde(default)]
    pub value_thresholds: Option<Vec<f64>>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub sort_parameter: Option<SortParameter>,
    #[serde(default)]
    pub sort_data: Option<SortOrder>,
    #[serde(default)]
    pub auto_play: bool,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub show_only_active_date: bool,
    #[serde(default = "default_bar_padding")]
    pub bar_padding: f64,
    #[serde(default)]
    pub min_bar_thickness: Option<f64>,
    #[serde(default)]
    pub max_bar_thickness: Option<f64>,
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Switches circles to square-root radius scaling when set.
    #[serde(default)]
    pub max_radius: Option<f64>,
    #[serde(default)]
    pub show_values: bool,
    #[serde(default = "default_true")]
    pub tooltip: bool,
    #[serde(default)]
    pub tooltip_config: TooltipConfig,
    #[serde(default = "default_true")]
    pub on_series_mouse_over: bool,
    #[serde(default)]
    pub on_series_mouse_click: bool,
    #[serde(default)]
    pub highlighted_data_points: Vec<String>,
    #[serde(default = "default_true")]
    pub reset_selection_on_double_click: bool,
    /// Pointer hits farther than this from every symbol are ignored.
    #[serde(default)]
    pub max_hit_distance: Option<f64>,
    #[serde(default)]
    pub projection: Projection,
    /// Feature property joined against `DataPoint::label`.
    #[serde(default = "default_map_id_property")]
    pub map_id_property: String,
    #[serde(default)]
    pub unit: UnitChartConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
    #[serde(default = "default_inner_radius_ratio")]
    pub inner_radius_ratio: f64,
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub rtl: bool,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            chart: ChartFamily::default(),
            orientation: Orientation::default(),
            layout: SeriesLayout::default(),
            width: None,
            height: None,
            margins: Margins::default(),
            colors: Vec::new(),
            color_domain: None,
            value_thresholds: None,
            max_value: None,
            min_value: None,
            sort_parameter: None,
            sort_data: None,
            auto_play: false,
            date_format: default_date_format(),
            show_only_active_date: false,
            bar_padding: default_bar_padding(),
            min_bar_thickness: None,
            max_bar_thickness: None,
            radius: default_radius(),
            max_radius: None,
            show_values: false,
            tooltip: true,
            tooltip_config: TooltipConfig::default(),
            on_series_mouse_over: true,
            on_series_mouse_click: false,
            highlighted_data_points: Vec::new(),
            reset_selection_on_double_click: true,
            max_hit_distance: None,
            projection: Projection::default(),
            map_id_property: default_map_id_property(),
            unit: UnitChartConfig::default(),
            heatmap: HeatmapConfig::default(),
            inner_radius_ratio: default_inner_radius_ratio(),
            tick_count: default_tick_count(),
            theme: Theme::default(),
            rtl: false,
            language: default_language(),
        }
    }
}

impl ChartSettings {
    #[must_use]
    pub fn new(chart: ChartFamily) -> Self {
        Self {
            chart,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: SeriesLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_color_domain<I, S>(mut self, domain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.color_domain = Some(domain.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_value_bounds(mut self, min_value: Option<f64>, max_value: Option<f64>) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, parameter: Option<SortParameter>, order: SortOrder) -> Self {
        self.sort_parameter = parameter;
        self.sort_data = Some(order);
        self
    }

    #[must_use]
    pub fn with_auto_play(mut self, auto_play: bool) -> Self {
        self.auto_play = auto_play;
        self
    }

    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    #[must_use]
    pub fn with_show_only_active_date(mut self, enabled: bool) -> Self {
        self.show_only_active_date = enabled;
        self
    }

    #[must_use]
    pub fn with_bar_thickness(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_bar_thickness = min;
        self.max_bar_thickness = max;
        self
    }

    #[must_use]
    pub fn with_bar_padding(mut self, padding: f64) -> Self {
        self.bar_padding = padding;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = Some(max_radius);
        self
    }

    #[must_use]
    pub fn with_show_values(mut self, enabled: bool) -> Self {
        self.show_values = enabled;
        self
    }

    #[must_use]
    pub fn with_click_events(mut self, enabled: bool) -> Self {
        self.on_series_mouse_click = enabled;
        self
    }

    #[must_use]
    pub fn with_hover_events(mut self, enabled: bool) -> Self {
        self.on_series_mouse_over = enabled;
        self
    }

    #[must_use]
    pub fn with_reset_selection_on_double_click(mut self, enabled: bool) -> Self {
        self.reset_selection_on_double_click = enabled;
        self
    }

    #[must_use]
    pub fn with_highlighted_data_points<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlighted_data_points = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: UnitChartConfig) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_value_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.value_thresholds = Some(thresholds);
        self
    }

    #[must_use]
    pub fn overrides(&self) -> DomainOverrides {
        DomainOverrides {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }

    #[must_use]
    pub fn thickness_limits(&self) -> ThicknessLimits {
        ThicknessLimits {
            min: self.min_bar_thickness,
            max: self.max_bar_thickness,
        }
    }

    #[must_use]
    pub fn radius_policy(&self) -> RadiusPolicy {
        match self.max_radius {
            Some(max_radius) => RadiusPolicy::Proportional { max_radius },
            None => RadiusPolicy::Constant(self.radius),
        }
    }

    /// Categorical palette: configured colors, else the theme's.
    #[must_use]
    pub fn palette(&self) -> &[String] {
        if self.colors.is_empty() {
            &self.theme.categorical_colors
        } else {
            &self.colors
        }
    }

    /// Whether sub-values are colored by series index rather than by point.
    #[must_use]
    pub fn colors_by_series(&self) -> bool {
        match self.chart {
            ChartFamily::Bar => !matches!(self.layout, SeriesLayout::Single),
            ChartFamily::Dumbbell => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.sort_data.unwrap_or_default()
    }

    /// Explicit size, then container size; `None` when neither is usable.
    #[must_use]
    pub fn resolve_viewport(&self, container: Option<Viewport>) -> Option<Viewport> {
        let width = self.width.or(container.map(|c| c.width))?;
        let height = self.height.or(container.map(|c| c.height))?;
        Some(Viewport::new(width, height)).filter(|viewport| viewport.is_valid())
    }

    /// Serializes settings to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidSettings(format!("failed to serialize settings: {e}")))
    }

    /// Deserializes settings from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidSettings(format!("failed to parse settings: {e}")))
    }
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_owned()
}

fn default_bar_padding() -> f64 {
    0.25
}

fn default_radius() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_map_id_property() -> String {
    "id".to_owned()
}

fn default_inner_radius_ratio() -> f64 {
    0.6
}

fn default_tick_count() -> usize {
    5
}

fn default_language() -> String {
    "en".to_owned()
}
