use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::animation::PlaybackState;
use crate::core::{DataPoint, Viewport};
use crate::error::ChartResult;
use crate::render::{EmptyStateReason, Renderer};

use super::{ChartEngine, ChartSettings};

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub settings: ChartSettings,
    pub viewport: Option<Viewport>,
    pub points: Vec<DataPoint>,
    pub dates: Vec<NaiveDateTime>,
    pub active_index: Option<usize>,
    pub playback: PlaybackState,
    pub hovered: Option<usize>,
    pub clicked: Option<usize>,
    pub selected_color: Option<String>,
    pub empty_state: Option<EmptyStateReason>,
}

impl<R: Renderer> ChartEngine<R> {
    /// Captures the current state; lays out the scene if needed.
    pub fn snapshot(&mut self) -> ChartResult<EngineSnapshot> {
        let empty_state = self.scene()?.empty_reason();
        let model = &self.core.model;
        Ok(EngineSnapshot {
            settings: self.core.settings.clone(),
            viewport: self.viewport(),
            points: model.points.clone(),
            dates: model.animation.dates().to_vec(),
            active_index: (!model.animation.is_empty()).then(|| model.animation.current_index()),
            playback: model.animation.state(),
            hovered: model.interaction.hovered(),
            clicked: model.interaction.clicked(),
            selected_color: model.interaction.selected_color().map(str::to_owned),
            empty_state,
        })
    }
}
