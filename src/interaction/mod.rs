mod hit_test;

pub use hit_test::{HitCandidate, HitTestIndex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverState {
    Idle,
    Hovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    Unselected,
    Selected,
}

/// Result of a hover update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverTransition {
    Unchanged,
    Entered(usize),
    Left(usize),
    /// Pointer moved straight from one datum to another.
    Moved { from: usize, to: usize },
}

/// Result of a click on a datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    Selected(usize),
    Cleared,
}

/// Dimming inputs that come from outside the pointer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpacityRule<'a> {
    pub highlighted: &'a [String],
    pub dimmed_opacity: f64,
}

/// Transient per-chart pointer, legend and selection state.
///
/// Datums are identified by their index in the engine's current data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionState {
    hovered: Option<usize>,
    selected_color: Option<String>,
    clicked: Option<usize>,
    pointer: Option<(f64, f64)>,
}

impl InteractionState {
    #[must_use]
    pub fn hover_state(&self) -> HoverState {
        if self.hovered.is_some() {
            HoverState::Hovering
        } else {
            HoverState::Idle
        }
    }

    #[must_use]
    pub fn selection_state(&self) -> SelectionState {
        if self.clicked.is_some() {
            SelectionState::Selected
        } else {
            SelectionState::Unselected
        }
    }

    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    #[must_use]
    pub fn clicked(&self) -> Option<usize> {
        self.clicked
    }

    #[must_use]
    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    #[must_use]
    pub fn pointer(&self) -> Option<(f64, f64)> {
        self.pointer
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Some((x, y));
    }

    /// Sets the hovered datum and reports what changed.
    pub fn hover(&mut self, datum: Option<usize>) -> HoverTransition {
        let previous = std::mem::replace(&mut self.hovered, datum);
        match (previous, datum) {
            (None, None) => HoverTransition::Unchanged,
            (Some(from), Some(to)) if from == to => HoverTransition::Unchanged,
            (None, Some(to)) => HoverTransition::Entered(to),
            (Some(from), None) => HoverTransition::Left(from),
            (Some(from), Some(to)) => HoverTransition::Moved { from, to },
        }
    }

    pub fn on_pointer_leave(&mut self) -> HoverTransition {
        self.pointer = None;
        self.hover(None)
    }

    pub fn set_selected_color(&mut self, color: Option<String>) {
        self.selected_color = color;
    }

    /// Toggles the click selection.
    ///
    /// Clicking the selected datum again clears the selection only when
    /// `reset_on_repeat` is set; otherwise it stays selected.
    pub fn click(&mut self, datum: usize, reset_on_repeat: bool) -> ClickOutcome {
        if reset_on_repeat && self.clicked == Some(datum) {
            self.clicked = None;
            return ClickOutcome::Cleared;
        }
        self.clicked = Some(datum);
        ClickOutcome::Selected(datum)
    }

    pub fn clear_selection(&mut self) {
        self.clicked = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Opacity of a primitive with the given resolved color and label.
    ///
    /// An active legend selection decides alone; otherwise a non-empty
    /// highlight set dims every label outside it.
    #[must_use]
    pub fn opacity(&self, resolved_color: &str, label: Option<&str>, rule: OpacityRule<'_>) -> f64 {
        if let Some(selected) = self.selected_color.as_deref() {
            return if selected == resolved_color {
                1.0
            } else {
                rule.dimmed_opacity
            };
        }
        if !rule.highlighted.is_empty() {
            let highlighted = label.is_some_and(|label| {
                rule.highlighted
                    .iter()
                    .any(|candidate| candidate == label)
            });
            return if highlighted { 1.0 } else { rule.dimmed_opacity };
        }
        1.0
    }
}
