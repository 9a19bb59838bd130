use tracing::{trace, warn};

use crate::core::Viewport;
use crate::core::windowing::{points_at_date, points_up_to_date};
use crate::error::ChartResult;
use crate::extensions::ChartEvent;
use crate::render::{RenderFrame, Renderer};

use super::render_frame_builder::{FrameInputs, build_render_frame};
use super::scene_builder::{SceneInputs, build_scene};
use super::{ChartScene, ChartSettings, engine_core::EngineCore};

/// Main orchestration facade consumed by host applications.
///
/// `ChartEngine` owns the dataset, interaction and playback state, caches the
/// laid-out scene and hands materialized frames to its renderer.
pub struct ChartEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn settings(&self) -> &ChartSettings {
        &self.core.settings
    }

    /// Effective drawing size: explicit settings size, then container size.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.core.settings.resolve_viewport(self.core.model.container)
    }

    /// Lays out (or returns the cached) scene for the current state.
    pub fn scene(&mut self) -> ChartResult<&ChartScene> {
        let scene = match self.core.runtime.scene.take() {
            Some(scene) => scene,
            None => self.build_current_scene()?,
        };
        Ok(&*self.core.runtime.scene.insert(scene))
    }

    /// Builds the frame for the current state without drawing it.
    ///
    /// Returns `None` while no drawing size is known.
    pub fn render_frame(&mut self) -> ChartResult<Option<RenderFrame>> {
        let Some(viewport) = self.viewport() else {
            return Ok(None);
        };
        self.scene()?;
        let core = &self.core;
        let Some(scene) = core.runtime.scene.as_ref() else {
            return Ok(None);
        };
        let inputs = FrameInputs {
            settings: &core.settings,
            points: &core.model.points,
            interaction: &core.model.interaction,
            resolver: &core.model.resolver,
        };
        build_render_frame(scene, viewport, &inputs).map(Some)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let Some(frame) = self.render_frame()? else {
            warn!("skipping render: chart has no size and no container size is known");
            return Ok(());
        };
        self.renderer.render(&frame)?;
        trace!(primitives = frame.primitive_count(), "frame rendered");
        self.emit_event(ChartEvent::Rendered);
        Ok(())
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Indices of points drawn at the active date; `None` draws every point.
    #[must_use]
    pub fn active_point_indices(&self) -> Option<Vec<usize>> {
        if !self.core.settings.chart.is_time_filtered() {
            return None;
        }
        let active = self.core.model.animation.current_date()?;
        let dates = &self.core.model.dates;
        Some(if self.core.settings.show_only_active_date {
            points_at_date(dates, active)
        } else {
            points_up_to_date(dates, active)
        })
    }

    pub(super) fn invalidate_scene(&mut self) {
        self.core.runtime.invalidate();
    }

    fn build_current_scene(&self) -> ChartResult<ChartScene> {
        let active = self.active_point_indices();
        build_scene(SceneInputs {
            settings: &self.core.settings,
            points: &self.core.model.points,
            dates: &self.core.model.dates,
            active: active.as_deref(),
            features: self.core.model.features.as_ref(),
            viewport: self.viewport(),
        })
    }
}
