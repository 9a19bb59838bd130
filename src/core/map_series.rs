use indexmap::{IndexMap, IndexSet};
#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::line_series::svg_polyline;
use crate::core::projection::{FittedProjection, Projection};
use crate::core::scatter_series::{CircleGeometry, RadiusPolicy, RadiusResolver};
use crate::core::types::{DataPoint, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

/// Linear ring of `[lon, lat, ...]` positions.
pub type Ring = Vec<Vec<f64>>;

/// GeoJSON-shaped boundary dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse feature collection: {e}")))
    }

    fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .flat_map(Geometry::rings)
            .flatten()
            .filter_map(|position| match position.as_slice() {
                [lon, lat, ..] => Some((*lon, *lat)),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    /// Join key: the named property when present, otherwise the feature id.
    #[must_use]
    pub fn key(&self, property: &str) -> Option<String> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.get(property))
            .or(self.id.as_ref())
            .and_then(value_as_key)
    }
}

fn value_as_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    #[must_use]
    pub fn rings(&self) -> Vec<&Ring> {
        match self {
            Self::Polygon { coordinates } => coordinates.iter().collect(),
            Self::MultiPolygon { coordinates } => coordinates.iter().flatten().collect(),
            Self::Unsupported => Vec::new(),
        }
    }
}

/// All rings of one feature, drawn as one group.
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub feature: usize,
    pub key: Option<String>,
    /// Matching data point, if any.
    pub datum: Option<usize>,
    /// One closed SVG path per ring.
    pub paths: Vec<String>,
    /// Projected centroid of the outer vertices, used for hit-testing.
    pub anchor: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapProjection {
    pub shapes: Vec<MapShape>,
    pub dots: Vec<CircleGeometry>,
    pub projection: FittedProjection,
    /// Data points whose key has no boundary feature.
    pub unmatched: Vec<usize>,
}

fn fit(
    collection: &FeatureCollection,
    kind: Projection,
    plot: PlotArea,
) -> ChartResult<Option<FittedProjection>> {
    match FittedProjection::fit_extent(kind, collection.coordinates(), plot) {
        Ok(fitted) => Ok(Some(fitted)),
        Err(ChartError::InvalidData(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

fn project_shape(
    index: usize,
    feature: &Feature,
    fitted: FittedProjection,
    id_property: &str,
) -> Option<MapShape> {
    let geometry = feature.geometry.as_ref()?;
    let rings = geometry.rings();
    if rings.is_empty() {
        return None;
    }
    let mut sum = (0.0, 0.0);
    let mut count = 0usize;
    let paths = rings
        .iter()
        .map(|ring| {
            let projected: Vec<(f64, f64)> = ring
                .iter()
                .filter_map(|position| match position.as_slice() {
                    [lon, lat, ..] => Some(fitted.project(*lon, *lat)),
                    _ => None,
                })
                .collect();
            for (x, y) in &projected {
                sum = (sum.0 + x, sum.1 + y);
                count += 1;
            }
            let mut path = svg_polyline([projected]);
            path.push('Z');
            path
        })
        .collect();
    let anchor = if count == 0 {
        (0.0, 0.0)
    } else {
        (sum.0 / count as f64, sum.1 / count as f64)
    };
    Some(MapShape {
        feature: index,
        key: feature.key(id_property),
        datum: None,
        paths,
        anchor,
    })
}

fn project_shapes(
    collection: &FeatureCollection,
    fitted: FittedProjection,
    id_property: &str,
) -> Vec<MapShape> {
    #[cfg(feature = "parallel-projection")]
    {
        collection
            .features
            .par_iter()
            .enumerate()
            .filter_map(|(index, feature)| project_shape(index, feature, fitted, id_property))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        collection
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| project_shape(index, feature, fitted, id_property))
            .collect()
    }
}

/// Choropleth: every feature becomes a shape; data joins on `label` against
/// the feature key. Data without a matching feature is skipped.
pub fn project_choropleth(
    collection: &FeatureCollection,
    points: &[DataPoint],
    plot: PlotArea,
    kind: Projection,
    id_property: &str,
) -> ChartResult<Option<MapProjection>> {
    let Some(fitted) = fit(collection, kind, plot)? else {
        return Ok(None);
    };
    let mut shapes = project_shapes(collection, fitted, id_property);

    let by_key: IndexMap<&str, usize> = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| point.label.as_deref().map(|label| (label, datum)))
        .collect();
    for shape in &mut shapes {
        shape.datum = shape
            .key
            .as_deref()
            .and_then(|key| by_key.get(key).copied());
    }

    let matched: IndexSet<usize> = shapes.iter().filter_map(|shape| shape.datum).collect();
    let unmatched: Vec<usize> = (0..points.len())
        .filter(|datum| !matched.contains(datum))
        .collect();
    if !unmatched.is_empty() {
        trace!(
            unmatched = unmatched.len(),
            "skipping data points without boundary features"
        );
    }

    Ok(Some(MapProjection {
        shapes,
        dots: Vec::new(),
        projection: fitted,
        unmatched,
    }))
}

/// Dot density: base shapes plus one circle per point at (`x` = lon, `y` = lat).
pub fn project_dot_density(
    collection: &FeatureCollection,
    points: &[DataPoint],
    plot: PlotArea,
    kind: Projection,
    id_property: &str,
    radius: RadiusPolicy,
) -> ChartResult<Option<MapProjection>> {
    let Some(fitted) = fit(collection, kind, plot)? else {
        return Ok(None);
    };
    let shapes = project_shapes(collection, fitted, id_property);
    let radius = RadiusResolver::new(points, radius)?;

    let mut unmatched = Vec::new();
    let mut dots = Vec::with_capacity(points.len());
    for (datum, point) in points.iter().enumerate() {
        match (finite(point.x), finite(point.y)) {
            (Some(lon), Some(lat)) => {
                let (cx, cy) = fitted.project(lon, lat);
                dots.push(CircleGeometry {
                    datum,
                    cx,
                    cy,
                    r: radius.radius(point),
                });
            }
            _ => unmatched.push(datum),
        }
    }

    Ok(Some(MapProjection {
        shapes,
        dots,
        projection: fitted,
        unmatched,
    }))
}
