use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::animation::PlaybackState;
use crate::core::{DataPoint, Viewport};

/// Read-only state snapshot passed along with every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub viewport: Option<Viewport>,
    pub points_len: usize,
    pub hovered: Option<usize>,
    pub clicked: Option<usize>,
    pub selected_color: Option<String>,
    pub active_date: Option<NaiveDateTime>,
    pub playback: PlaybackState,
}

/// Typed event stream emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// Pointer moved onto a data point.
    PointerEnter(DataPoint),
    /// Pointer left the previously hovered data point.
    PointerLeave,
    /// Click selection changed; `None` when the selection was cleared.
    Clicked(Option<DataPoint>),
    LegendHovered(Option<String>),
    ActiveDateChanged { index: usize, date: NaiveDateTime },
    PlaybackChanged(PlaybackState),
    DataUpdated { points_len: usize },
    Rendered,
}

/// Observer registered on the engine by unique id.
///
/// Listeners see events and context but cannot mutate engine state.
pub trait ChartEventListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &ChartEvent, context: &EventContext);
}
