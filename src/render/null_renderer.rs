use crate::error::ChartResult;
use crate::render::{EmptyStateReason, RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content and records what it was asked to draw,
/// so tests can inspect the last frame without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_rect_count: usize,
    pub last_circle_count: usize,
    pub last_path_count: usize,
    pub last_line_count: usize,
    pub last_text_count: usize,
    pub last_empty_state: Option<EmptyStateReason>,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_rect_count = frame.rects.len();
        self.last_circle_count = frame.circles.len();
        self.last_path_count = frame.paths.len();
        self.last_line_count = frame.lines.len();
        self.last_text_count = frame.texts.len();
        self.last_empty_state = frame.empty_state;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
