//! Legend and tooltip layout shared by every chart family.

mod legend;
mod tooltip;

pub use legend::{LegendItem, MISSING_LEGEND_KEY, build_legend, build_series_legend};
pub use tooltip::{TooltipConfig, TooltipContent, TooltipPlacement, place_tooltip};
