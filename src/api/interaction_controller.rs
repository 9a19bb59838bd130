use tracing::trace;

use crate::core::DataPoint;
use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartEvent;
use crate::interaction::{ClickOutcome, HoverTransition, InteractionState};
use crate::presentation::{
    LegendItem, TooltipContent, TooltipPlacement, build_legend, build_series_legend,
    place_tooltip,
};
use crate::render::Renderer;

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn interaction_state(&self) -> &InteractionState {
        &self.core.model.interaction
    }

    /// Datum under a container-space pixel, if any.
    pub fn hit_test(&mut self, x: f64, y: f64) -> ChartResult<Option<usize>> {
        let max_distance = self.core.settings.max_hit_distance.unwrap_or(f64::INFINITY);
        Ok(self
            .scene()?
            .drawn()
            .and_then(|drawn| drawn.hit_test(x, y, max_distance)))
    }

    /// Tracks the pointer and updates the hovered datum.
    ///
    /// Hover state is always tracked; enter/leave events are emitted only
    /// when hover events are enabled.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<HoverTransition> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ChartError::InvalidData(
                "pointer position must be finite".to_owned(),
            ));
        }
        let hit = self.hit_test(x, y)?;
        let interaction = &mut self.core.model.interaction;
        interaction.on_pointer_move(x, y);
        let transition = interaction.hover(hit);
        trace!(x, y, ?transition, "pointer moved");
        self.emit_hover_events(transition);
        Ok(transition)
    }

    pub fn pointer_leave(&mut self) -> HoverTransition {
        let transition = self.core.model.interaction.on_pointer_leave();
        self.emit_hover_events(transition);
        transition
    }

    /// Clicks whatever lies under the pointer; clicking empty space is a
    /// no-op.
    pub fn click_at(&mut self, x: f64, y: f64) -> ChartResult<Option<ClickOutcome>> {
        match self.hit_test(x, y)? {
            Some(datum) => self.click_datum(datum),
            None => Ok(None),
        }
    }

    /// Toggles the click selection of a datum.
    ///
    /// Returns `None` when click events are disabled.
    pub fn click_datum(&mut self, datum: usize) -> ChartResult<Option<ClickOutcome>> {
        let len = self.core.model.points.len();
        if datum >= len {
            return Err(ChartError::UnknownDatum { index: datum, len });
        }
        if !self.core.settings.on_series_mouse_click {
            return Ok(None);
        }
        let reset = self.core.settings.reset_selection_on_double_click;
        let outcome = self.core.model.interaction.click(datum, reset);
        let clicked = match outcome {
            ClickOutcome::Selected(datum) => self.core.model.points.get(datum).cloned(),
            ClickOutcome::Cleared => None,
        };
        self.emit_event(ChartEvent::Clicked(clicked));
        Ok(Some(outcome))
    }

    pub fn clear_selection(&mut self) {
        if self.core.model.interaction.clicked().is_some() {
            self.core.model.interaction.clear_selection();
            self.emit_event(ChartEvent::Clicked(None));
        }
    }

    /// Hovering a legend swatch dims every other color; `None` restores.
    pub fn legend_hover(&mut self, color: Option<&str>) {
        let color = color.map(str::to_owned);
        if self.core.model.interaction.selected_color() == color.as_deref() {
            return;
        }
        self.core.model.interaction.set_selected_color(color.clone());
        self.emit_event(ChartEvent::LegendHovered(color));
    }

    pub fn set_highlighted_data_points<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core.settings.highlighted_data_points = labels.into_iter().map(Into::into).collect();
    }

    /// Legend entries for the current data and selection.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendItem> {
        let model = &self.core.model;
        let settings = &self.core.settings;
        if settings.colors_by_series() {
            return build_series_legend(
                &model.resolver,
                settings.palette(),
                settings.color_domain.as_deref(),
                &model.points,
                model.interaction.selected_color(),
                settings.theme.dimmed_opacity,
            );
        }
        build_legend(
            &model.resolver,
            &model.points,
            model.interaction.selected_color(),
            self.core.settings.theme.dimmed_opacity,
        )
    }

    #[must_use]
    pub fn hovered_point(&self) -> Option<&DataPoint> {
        self.core
            .model
            .interaction
            .hovered()
            .and_then(|datum| self.core.model.points.get(datum))
    }

    #[must_use]
    pub fn clicked_point(&self) -> Option<&DataPoint> {
        self.core
            .model
            .interaction
            .clicked()
            .and_then(|datum| self.core.model.points.get(datum))
    }

    /// Tooltip for the hovered point, placed inside the drawing area.
    ///
    /// `None` when tooltips are disabled, nothing is hovered, or no size is
    /// known.
    #[must_use]
    pub fn tooltip(&self) -> Option<(TooltipContent, TooltipPlacement)> {
        if !self.core.settings.tooltip {
            return None;
        }
        let point = self.hovered_point()?;
        let pointer = self.core.model.interaction.pointer()?;
        let viewport = self.viewport()?;
        let placement = place_tooltip(
            pointer,
            (f64::from(viewport.width), f64::from(viewport.height)),
            self.core.settings.tooltip_config,
        );
        Some((TooltipContent::for_point(point), placement))
    }

    pub(super) fn emit_hover_events(&mut self, transition: HoverTransition) {
        if !self.core.settings.on_series_mouse_over {
            return;
        }
        let entered = match transition {
            HoverTransition::Unchanged => return,
            HoverTransition::Left(_) => None,
            HoverTransition::Entered(to) => Some(to),
            HoverTransition::Moved { to, .. } => {
                self.emit_event(ChartEvent::PointerLeave);
                Some(to)
            }
        };
        match entered.and_then(|datum| self.core.model.points.get(datum).cloned()) {
            Some(point) => self.emit_event(ChartEvent::PointerEnter(point)),
            None => self.emit_event(ChartEvent::PointerLeave),
        }
    }
}
