use chrono::NaiveDateTime;
use tracing::debug;

use crate::animation::AnimationController;
use crate::core::{ColorResolver, DataPoint};
use crate::error::ChartResult;
use crate::interaction::InteractionState;
use crate::render::Renderer;

use super::validation::validate_settings;
use super::{
    ChartEngine, ChartSettings, chart_model::ChartModel, chart_runtime::ChartRuntimeState,
    engine_core::EngineCore,
};

impl<R: Renderer> ChartEngine<R> {
    /// Creates an engine with no data and no container size.
    pub fn new(renderer: R, settings: ChartSettings) -> ChartResult<Self> {
        validate_settings(&settings)?;
        let resolver = color_resolver(&settings, &[]);
        let animation = animation_for(&settings, &[]);
        debug!(chart = ?settings.chart, "chart engine created");
        Ok(Self {
            renderer,
            core: EngineCore {
                model: ChartModel {
                    points: Vec::new(),
                    dates: Vec::new(),
                    features: None,
                    container: None,
                    interaction: InteractionState::default(),
                    animation,
                    resolver,
                },
                settings,
                runtime: ChartRuntimeState::invalidated(),
            },
        })
    }
}

pub(super) fn color_resolver(settings: &ChartSettings, points: &[DataPoint]) -> ColorResolver {
    ColorResolver::from_points(
        points,
        &settings.colors,
        settings.color_domain.as_deref(),
        &settings.theme,
    )
}

pub(super) fn animation_for(
    settings: &ChartSettings,
    dates: &[Option<NaiveDateTime>],
) -> AnimationController {
    AnimationController::new(dates.iter().flatten().copied(), settings.auto_play)
}
