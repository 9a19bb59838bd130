use std::time::Duration;

use chrono::NaiveDateTime;

use crate::animation::{AnimationController, PlaybackState};
use crate::extensions::ChartEvent;
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn animation(&self) -> &AnimationController {
        &self.core.model.animation
    }

    #[must_use]
    pub fn active_date(&self) -> Option<NaiveDateTime> {
        self.core.model.animation.current_date()
    }

    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.core.model.animation.state()
    }

    pub fn play(&mut self) {
        self.update_playback(AnimationController::play);
    }

    pub fn pause(&mut self) {
        self.update_playback(AnimationController::pause);
    }

    pub fn toggle_play(&mut self) -> PlaybackState {
        self.update_playback(|animation| {
            animation.toggle_play();
        });
        self.playback_state()
    }

    /// Feeds host clock time into playback; returns `true` when the active
    /// date moved.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let changed = self.core.model.animation.advance(elapsed);
        if changed {
            self.active_date_changed();
        }
        changed
    }

    /// Snaps the active date to the known date nearest to `target`.
    pub fn scrub_to(&mut self, target: NaiveDateTime) -> Option<usize> {
        let previous = self.core.model.animation.current_index();
        let index = self.core.model.animation.scrub_to(target)?;
        if index != previous {
            self.active_date_changed();
        }
        Some(index)
    }

    pub fn scrub_to_index(&mut self, index: usize) -> Option<usize> {
        if self.core.model.animation.is_empty() {
            return None;
        }
        let previous = self.core.model.animation.current_index();
        let index = self.core.model.animation.scrub_to_index(index);
        if index != previous {
            self.active_date_changed();
        }
        Some(index)
    }

    /// Cancels playback for good; the engine keeps serving frames.
    pub fn dispose(&mut self) {
        let was_playing = self.core.model.animation.is_playing();
        self.core.model.animation.dispose();
        if was_playing {
            self.emit_event(ChartEvent::PlaybackChanged(PlaybackState::Paused));
        }
    }

    fn update_playback(&mut self, update: impl FnOnce(&mut AnimationController)) {
        let previous = self.playback_state();
        update(&mut self.core.model.animation);
        let current = self.playback_state();
        if current != previous {
            self.emit_event(ChartEvent::PlaybackChanged(current));
        }
    }

    fn active_date_changed(&mut self) {
        let animation = &self.core.model.animation;
        let index = animation.current_index();
        let Some(date) = animation.current_date() else {
            return;
        };
        if self.core.settings.chart.is_time_filtered() {
            self.invalidate_scene();
        }
        // Hovered indices may no longer be drawn.
        let transition = self.core.model.interaction.hover(None);
        self.emit_hover_events(transition);
        self.emit_event(ChartEvent::ActiveDateChanged { index, date });
    }
}
