use serde::{Deserialize, Serialize};

use crate::core::{ColorResolver, DataPoint};

/// Legend key used for points without a category.
pub const MISSING_LEGEND_KEY: &str = "NA";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub key: String,
    pub color: String,
    pub opacity: f64,
    /// `true` for the swatch standing in for uncategorized points.
    pub missing: bool,
}

/// One swatch per categorical key, in domain order.
///
/// A trailing "NA" swatch is added when some point has no category. Swatches
/// other than `selected_color` get `dimmed_opacity`. Single-color charts have
/// no legend.
#[must_use]
pub fn build_legend(
    resolver: &ColorResolver,
    points: &[DataPoint],
    selected_color: Option<&str>,
    dimmed_opacity: f64,
) -> Vec<LegendItem> {
    let Some(domain) = resolver.domain() else {
        return Vec::new();
    };
    let opacity = |color: &str| swatch_opacity(color, selected_color, dimmed_opacity);

    let mut items: Vec<LegendItem> = domain
        .iter()
        .map(|key| {
            let color = resolver.resolve_key(Some(key)).to_owned();
            LegendItem {
                key: key.to_owned(),
                opacity: opacity(&color),
                color,
                missing: false,
            }
        })
        .collect();

    if points.iter().any(|point| point.color.is_none()) {
        let color = resolver.no_data_color().to_owned();
        items.push(LegendItem {
            key: MISSING_LEGEND_KEY.to_owned(),
            opacity: opacity(&color),
            color,
            missing: true,
        });
    }
    items
}

/// One swatch per series of multi-valued points (grouped or stacked bars,
/// dumbbells), colored by series index like the drawn sub-values.
///
/// Series are named from `series_keys` in order; unnamed series fall back to
/// their 1-based index.
#[must_use]
pub fn build_series_legend(
    resolver: &ColorResolver,
    palette: &[String],
    series_keys: Option<&[String]>,
    points: &[DataPoint],
    selected_color: Option<&str>,
    dimmed_opacity: f64,
) -> Vec<LegendItem> {
    let series_count = points
        .iter()
        .map(|point| point.values.len())
        .max()
        .unwrap_or(0);
    (0..series_count)
        .map(|series| {
            let color = resolver.series_color(palette, series).to_owned();
            let key = series_keys
                .and_then(|keys| keys.get(series))
                .cloned()
                .unwrap_or_else(|| (series + 1).to_string());
            LegendItem {
                key,
                opacity: swatch_opacity(&color, selected_color, dimmed_opacity),
                color,
                missing: false,
            }
        })
        .collect()
}

fn swatch_opacity(color: &str, selected_color: Option<&str>, dimmed_opacity: f64) -> f64 {
    match selected_color {
        Some(selected) if selected != color => dimmed_opacity,
        _ => 1.0,
    }
}
