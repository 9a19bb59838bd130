use chrono::NaiveDate;

use crate::core::{RadiusPolicy, ThresholdScale};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::ChartSettings;

/// Rejects settings that can never produce a valid chart.
///
/// Contradictions that depend on the data (unit chart sums, for example) are
/// reported later as an empty scene instead.
pub(super) fn validate_settings(settings: &ChartSettings) -> ChartResult<()> {
    settings.margins.validate()?;
    settings.overrides().validate()?;
    if let (Some(min), Some(max)) = (settings.min_value, settings.max_value) {
        if min > max {
            return Err(ChartError::InvalidSettings(
                "`min_value` must not exceed `max_value`".to_owned(),
            ));
        }
    }
    settings.thickness_limits().validate()?;
    RadiusPolicy::Constant(settings.radius).validate()?;
    settings.radius_policy().validate()?;
    settings.theme.validate()?;

    if !settings.bar_padding.is_finite() || !(0.0..1.0).contains(&settings.bar_padding) {
        return Err(ChartError::InvalidSettings(
            "`bar_padding` must be in [0, 1)".to_owned(),
        ));
    }
    if !settings.inner_radius_ratio.is_finite()
        || !(0.0..1.0).contains(&settings.inner_radius_ratio)
    {
        return Err(ChartError::InvalidSettings(
            "`inner_radius_ratio` must be in [0, 1)".to_owned(),
        ));
    }
    if settings.tick_count == 0 {
        return Err(ChartError::InvalidSettings(
            "`tick_count` must be > 0".to_owned(),
        ));
    }
    if matches!(settings.max_hit_distance, Some(d) if !d.is_finite() || d < 0.0) {
        return Err(ChartError::InvalidSettings(
            "`max_hit_distance` must be finite and >= 0 when set".to_owned(),
        ));
    }
    if settings.width == Some(0) || settings.height == Some(0) {
        return Err(ChartError::InvalidSettings(
            "explicit chart size must be > 0".to_owned(),
        ));
    }
    validate_date_format(&settings.date_format)?;

    let theme = &settings.theme;
    let named = [
        &theme.primary_color,
        &theme.no_data_color,
        &theme.axis_color,
        &theme.text_color,
    ];
    for color in settings
        .colors
        .iter()
        .chain(&theme.categorical_colors)
        .chain(&theme.sequential_colors)
        .chain(named)
    {
        Color::parse(color)?;
    }
    if let Some(thresholds) = &settings.value_thresholds {
        let palette = if settings.colors.is_empty() {
            settings.theme.sequential_colors.clone()
        } else {
            settings.colors.clone()
        };
        let needed = thresholds.len() + 1;
        let palette: Vec<String> = palette.into_iter().cycle().take(needed).collect();
        ThresholdScale::new(thresholds.clone(), palette)?;
    }
    Ok(())
}

/// A format is usable when it can print a date back out.
fn validate_date_format(format: &str) -> ChartResult<()> {
    use std::fmt::Write;

    if format.trim().is_empty() {
        return Err(ChartError::InvalidSettings(
            "`date_format` must not be empty".to_owned(),
        ));
    }
    let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ChartError::InvalidSettings("sample date out of range".to_owned()))?;
    let mut rendered = String::new();
    write!(rendered, "{}", sample.format(format)).map_err(|_| {
        ChartError::InvalidSettings(format!("`date_format` `{format}` is not a valid strftime format"))
    })
}
