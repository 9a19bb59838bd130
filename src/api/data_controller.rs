use tracing::debug;

use crate::animation::parse_point_dates;
use crate::core::{DataPoint, FeatureCollection, Viewport};
use crate::error::ChartResult;
use crate::extensions::ChartEvent;
use crate::render::Renderer;

use super::engine_init::{animation_for, color_resolver};
use super::validation::validate_settings;
use super::{ChartEngine, ChartSettings};

impl<R: Renderer> ChartEngine<R> {
    /// Replaces the dataset.
    ///
    /// Hover and click state refer to point indices and are cleared. The
    /// playback timeline is rebuilt from the new dates.
    pub fn set_data(&mut self, points: Vec<DataPoint>) {
        let dates = parse_point_dates(&points, &self.core.settings.date_format);
        let model = &mut self.core.model;
        model.resolver = color_resolver(&self.core.settings, &points);
        model.interaction.reset();
        let disposed = model.animation.is_disposed();
        model.animation = animation_for(&self.core.settings, &dates);
        if disposed {
            model.animation.dispose();
        }
        model.dates = dates;
        model.points = points;
        debug!(
            points = model.points.len(),
            dates = model.animation.len(),
            "data replaced"
        );

        self.invalidate_scene();
        let points_len = self.core.model.points.len();
        self.emit_event(ChartEvent::DataUpdated { points_len });
    }

    #[must_use]
    pub fn points(&self) -> &[DataPoint] {
        &self.core.model.points
    }

    /// Point at a dataset index.
    #[must_use]
    pub fn point(&self, datum: usize) -> Option<&DataPoint> {
        self.core.model.points.get(datum)
    }

    pub fn set_feature_collection(&mut self, features: FeatureCollection) {
        debug!(features = features.features.len(), "map geometry set");
        self.core.model.features = Some(features);
        self.invalidate_scene();
    }

    /// Parses and sets GeoJSON map geometry.
    pub fn set_feature_collection_json(&mut self, input: &str) -> ChartResult<()> {
        let features = FeatureCollection::from_json_str(input)?;
        self.set_feature_collection(features);
        Ok(())
    }

    #[must_use]
    pub fn feature_collection(&self) -> Option<&FeatureCollection> {
        self.core.model.features.as_ref()
    }

    /// Records the host container size used when settings carry no
    /// explicit size. A zero dimension means "unknown".
    pub fn set_container_size(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        self.core.model.container = viewport.is_valid().then_some(viewport);
        self.invalidate_scene();
    }

    /// Replaces all settings.
    ///
    /// Dates are re-parsed and the timeline rebuilt when the date format or
    /// autoplay flag changes.
    pub fn set_settings(&mut self, settings: ChartSettings) -> ChartResult<()> {
        validate_settings(&settings)?;
        let retime = settings.date_format != self.core.settings.date_format
            || settings.auto_play != self.core.settings.auto_play;
        self.core.settings = settings;

        let model = &mut self.core.model;
        model.resolver = color_resolver(&self.core.settings, &model.points);
        if retime {
            model.dates = parse_point_dates(&model.points, &self.core.settings.date_format);
            let disposed = model.animation.is_disposed();
            model.animation = animation_for(&self.core.settings, &model.dates);
            if disposed {
                model.animation.dispose();
            }
        }
        self.invalidate_scene();
        Ok(())
    }
}
