use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::core::primitives::format_tick_value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset_x: 10.0,
            offset_y: 10.0,
            width: 160.0,
            height: 60.0,
        }
    }
}

/// Top-left corner of the tooltip box in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub flipped_x: bool,
    pub flipped_y: bool,
}

/// Places the tooltip at pointer + offset.
///
/// When the box would cross the right or bottom edge of the container it is
/// flipped to the left of / above the pointer instead. The result is never
/// moved past the top-left corner.
#[must_use]
pub fn place_tooltip(
    pointer: (f64, f64),
    container: (f64, f64),
    config: TooltipConfig,
) -> TooltipPlacement {
    let (px, py) = pointer;
    let (container_width, container_height) = container;

    let mut x = px + config.offset_x;
    let flipped_x = x + config.width > container_width;
    if flipped_x {
        x = (px - config.offset_x - config.width).max(0.0);
    }

    let mut y = py + config.offset_y;
    let flipped_y = y + config.height > container_height;
    if flipped_y {
        y = (py - config.offset_y - config.height).max(0.0);
    }

    TooltipPlacement {
        x,
        y,
        flipped_x,
        flipped_y,
    }
}

/// Title and `name: value` rows shown for a hovered point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: Option<String>,
    pub rows: Vec<(String, String)>,
}

impl TooltipContent {
    /// Lists every present field of `point`.
    #[must_use]
    pub fn for_point(point: &DataPoint) -> Self {
        let mut rows = Vec::new();
        let mut push_number = |name: &str, value: Option<f64>| {
            if let Some(value) = value.filter(|value| value.is_finite()) {
                rows.push((name.to_owned(), format_tick_value(value, 0.01)));
            }
        };
        push_number("x", point.x);
        push_number("y", point.y);
        push_number("size", point.size);
        push_number("position", point.position);
        for (index, value) in point.values.iter().enumerate() {
            push_number(&format!("value {}", index + 1), *value);
        }
        if let Some(date) = &point.date {
            rows.push(("date".to_owned(), date.clone()));
        }
        if let Some(color) = &point.color {
            rows.push(("color".to_owned(), color.clone()));
        }
        Self {
            title: point.label.clone(),
            rows,
        }
    }
}
