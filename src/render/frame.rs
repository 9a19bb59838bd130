use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive,
};

/// Why a chart produced no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStateReason {
    /// No data points were supplied.
    NoData,
    /// Data was supplied but no value could be placed on a scale.
    NoValidValues,
    /// Map chart without a feature collection.
    MissingGeometry,
    /// Settings contradict the data; details are logged.
    InvalidConfiguration,
    /// Neither explicit nor container size is usable.
    NoContainerSize,
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitives are drawn in field order: rects, paths, arcs, lines, circles,
/// then texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub rects: Vec<RectPrimitive>,
    pub paths: Vec<PathPrimitive>,
    pub arcs: Vec<ArcPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub empty_state: Option<EmptyStateReason>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            rects: Vec::new(),
            paths: Vec::new(),
            arcs: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
            empty_state: None,
        }
    }

    #[must_use]
    pub fn empty(viewport: Viewport, reason: EmptyStateReason) -> Self {
        Self {
            empty_state: Some(reason),
            ..Self::new(viewport)
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_circle(mut self, circle: CirclePrimitive) -> Self {
        self.circles.push(circle);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for rect in &self.rects {
            rect.validate()?;
        }
        for path in &self.paths {
            path.validate()?;
        }
        for arc in &self.arcs {
            arc.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    /// Number of primitives across all kinds.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.rects.len()
            + self.paths.len()
            + self.arcs.len()
            + self.lines.len()
            + self.circles.len()
            + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
