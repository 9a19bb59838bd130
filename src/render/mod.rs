mod frame;
mod null_renderer;
mod primitives;

pub use frame::{EmptyStateReason, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    ArcPrimitive, CirclePrimitive, Color, LinePrimitive, PathPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
