use super::{ChartSettings, chart_model::ChartModel, chart_runtime::ChartRuntimeState};

/// Internal engine core state used by the public facade (`ChartEngine`).
pub(super) struct EngineCore {
    pub(super) settings: ChartSettings,
    pub(super) model: ChartModel,
    pub(super) runtime: ChartRuntimeState,
}
