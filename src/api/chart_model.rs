use chrono::NaiveDateTime;

use crate::animation::AnimationController;
use crate::core::{ColorResolver, DataPoint, FeatureCollection, Viewport};
use crate::interaction::InteractionState;

/// Mutable chart domain state: data, geometry, container and interaction.
pub(super) struct ChartModel {
    pub(super) points: Vec<DataPoint>,
    /// Parsed `date` per point, aligned with `points`.
    pub(super) dates: Vec<Option<NaiveDateTime>>,
    pub(super) features: Option<FeatureCollection>,
    pub(super) container: Option<Viewport>,
    pub(super) interaction: InteractionState,
    pub(super) animation: AnimationController,
    /// Color mapping resolved over the full dataset so colors stay stable
    /// while the active date changes.
    pub(super) resolver: ColorResolver,
}
