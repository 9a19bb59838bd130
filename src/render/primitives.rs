use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("orange", (255, 165, 0)),
    ("purple", (128, 0, 128)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
    ("darkgray", (169, 169, 169)),
    ("steelblue", (70, 130, 180)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
];

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic CSS color name.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::parse_hex(hex)
                .ok_or_else(|| ChartError::InvalidSettings(format!("invalid hex color `{input}`")));
        }
        let lowered = trimmed.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, (r, g, b))| Self::from_rgb8(*r, *g, *b))
            .ok_or_else(|| ChartError::InvalidSettings(format!("unknown color `{input}`")))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
        match hex.len() {
            3 => {
                let expand = |index: usize| channel(index..index + 1).map(|v| v * 17);
                Some(Self::from_rgb8(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => {
                let base = Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?);
                Some(base.with_alpha(f64::from(channel(6..8)?) / 255.0))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// `#rrggbb` form, alpha dropped.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn validate_opacity(opacity: f64) -> ChartResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(ChartError::InvalidData(
            "primitive opacity must be finite and in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

fn validate_finite(kind: &str, values: &[f64]) -> ChartResult<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{kind} coordinates must be finite"
        )))
    }
}

/// Filled rectangle in pixel space (bars, heatmap cells, legend swatches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
    pub opacity: f64,
    /// Index of the data point this shape represents.
    pub datum: Option<usize>,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            opacity: 1.0,
            datum: None,
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: usize) -> Self {
        self.datum = Some(datum);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        validate_finite("rect", &[self.x, self.y, self.width, self.height])?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.fill.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Color,
    pub opacity: f64,
    pub datum: Option<usize>,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, r: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            r,
            fill,
            opacity: 1.0,
            datum: None,
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: usize) -> Self {
        self.datum = Some(datum);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        validate_finite("circle", &[self.cx, self.cy, self.r])?;
        if self.r < 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be >= 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.fill.validate()
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub opacity: f64,
    pub datum: Option<usize>,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            opacity: 1.0,
            datum: None,
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: usize) -> Self {
        self.datum = Some(datum);
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        validate_finite("line", &[self.x1, self.y1, self.x2, self.y2])?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.color.validate()
    }
}

/// SVG path data, either stroked (line series) or filled (map shapes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub d: String,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub datum: Option<usize>,
}

impl PathPrimitive {
    #[must_use]
    pub fn filled(d: impl Into<String>, fill: Color) -> Self {
        Self {
            d: d.into(),
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
            datum: None,
        }
    }

    #[must_use]
    pub fn stroked(d: impl Into<String>, stroke: Color, stroke_width: f64) -> Self {
        Self {
            d: d.into(),
            fill: None,
            stroke: Some(stroke),
            stroke_width,
            opacity: 1.0,
            datum: None,
        }
    }

    #[must_use]
    pub fn with_datum(mut self, datum: Option<usize>) -> Self {
        self.datum = datum;
        self
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.d.is_empty() {
            return Err(ChartError::InvalidData(
                "path data must not be empty".to_owned(),
            ));
        }
        if self.fill.is_none() && self.stroke.is_none() {
            return Err(ChartError::InvalidData(
                "path needs a fill or a stroke".to_owned(),
            ));
        }
        if self.stroke.is_some() && (!self.stroke_width.is_finite() || self.stroke_width <= 0.0) {
            return Err(ChartError::InvalidData(
                "path stroke width must be finite and > 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        for color in self.fill.iter().chain(self.stroke.iter()) {
            color.validate()?;
        }
        Ok(())
    }
}

/// Annular sector. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPrimitive {
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fill: Color,
    pub opacity: f64,
    pub datum: Option<usize>,
}

impl ArcPrimitive {
    pub fn validate(self) -> ChartResult<()> {
        validate_finite(
            "arc",
            &[
                self.cx,
                self.cy,
                self.inner_radius,
                self.outer_radius,
                self.start_angle,
                self.end_angle,
            ],
        )?;
        if self.inner_radius < 0.0 || self.outer_radius < self.inner_radius {
            return Err(ChartError::InvalidData(
                "arc radii must satisfy 0 <= inner <= outer".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

impl TextHAlign {
    /// Mirrors start/end alignment for right-to-left layouts.
    #[must_use]
    pub fn for_direction(self, rtl: bool) -> Self {
        match (self, rtl) {
            (Self::Left, true) => Self::Right,
            (Self::Right, true) => Self::Left,
            (align, _) => align,
        }
    }
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub opacity: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            opacity: 1.0,
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        validate_finite("text", &[self.x, self.y])?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.color.validate()
    }
}
