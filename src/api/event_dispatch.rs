use crate::extensions::{ChartEvent, EventContext};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn event_context(&self) -> EventContext {
        let model = &self.core.model;
        EventContext {
            viewport: self.viewport(),
            points_len: model.points.len(),
            hovered: model.interaction.hovered(),
            clicked: model.interaction.clicked(),
            selected_color: model.interaction.selected_color().map(str::to_owned),
            active_date: model.animation.current_date(),
            playback: model.animation.state(),
        }
    }

    pub(super) fn emit_event(&mut self, event: ChartEvent) {
        if self.core.runtime.listeners.is_empty() {
            return;
        }
        let context = self.event_context();
        for listener in &mut self.core.runtime.listeners {
            listener.on_event(&event, &context);
        }
    }
}
