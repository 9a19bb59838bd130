use crate::extensions::ChartEventListener;

use super::ChartScene;

/// Runtime orchestration state kept apart from the chart model.
pub(super) struct ChartRuntimeState {
    pub(super) listeners: Vec<Box<dyn ChartEventListener>>,
    /// Cached scene; `None` forces a rebuild on next access.
    pub(super) scene: Option<ChartScene>,
}

impl ChartRuntimeState {
    #[must_use]
    pub(super) fn invalidated() -> Self {
        Self {
            listeners: Vec::new(),
            scene: None,
        }
    }

    pub(super) fn invalidate(&mut self) {
        self.scene = None;
    }
}
