pub mod band_scale;
pub mod bar_series;
pub mod color;
pub mod domain;
pub mod donut_series;
pub mod dumbbell_series;
pub mod heatmap_series;
pub mod line_series;
pub mod map_series;
pub mod primitives;
pub mod projection;
pub mod scale;
pub mod scatter_series;
pub mod theme;
pub mod time_scale;
pub mod types;
pub mod unit_series;
pub mod windowing;

pub use band_scale::{BandScale, ThicknessLimits};
pub use bar_series::{BarGeometry, BarLayoutConfig, BarProjection, project_bars, sort_bar_order};
pub use color::{ColorResolver, ThresholdScale};
pub use domain::{CategoricalDomain, DomainOverrides, NumericDomain};
pub use donut_series::{ArcGeometry, project_donut};
pub use dumbbell_series::{
    DumbbellConfig, DumbbellDot, DumbbellGeometry, DumbbellProjection, project_dumbbells,
    sort_dumbbells,
};
pub use heatmap_series::{HeatmapCell, HeatmapConfig, HeatmapProjection, project_heatmap};
pub use line_series::{LineProjection, LineSeriesGeometry, LineVertex, project_lines, svg_polyline};
pub use map_series::{
    Feature, FeatureCollection, Geometry, MapProjection, MapShape, project_choropleth,
    project_dot_density,
};
pub use primitives::{format_tick_value, parse_date};
pub use projection::{FittedProjection, Projection};
pub use scale::{LinearScale, SqrtScale};
pub use scatter_series::{
    CircleGeometry, RadiusPolicy, RadiusResolver, ScatterProjection, StripArrangement,
    StripProjection, project_scatter, project_strip,
};
pub use theme::Theme;
pub use time_scale::TimeScale;
pub use types::{
    DataPoint, Margins, Orientation, PlotArea, SeriesLayout, SortOrder, SortParameter, Viewport,
};
pub use unit_series::{UnitChartConfig, UnitDot, project_units};
