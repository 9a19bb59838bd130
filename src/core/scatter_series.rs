use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::domain::{DomainOverrides, NumericDomain};
use crate::core::scale::{LinearScale, SqrtScale};
use crate::core::types::{DataPoint, Orientation, PlotArea, finite};
use crate::error::{ChartError, ChartResult};

/// Smallest drawn radius of a proportional symbol.
pub const MIN_PROPORTIONAL_RADIUS: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    Constant(f64),
    /// Square-root scaled from the `radius` field, up to `max_radius`.
    Proportional { max_radius: f64 },
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self::Constant(5.0)
    }
}

impl RadiusPolicy {
    pub fn validate(self) -> ChartResult<Self> {
        let value = match self {
            Self::Constant(radius) => radius,
            Self::Proportional { max_radius } => max_radius,
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(ChartError::InvalidSettings(
                "symbol radius must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Per-point radius resolution for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusResolver {
    Constant(f64),
    Scaled(SqrtScale),
}

impl RadiusResolver {
    /// Builds the resolver; a proportional policy with no positive radius
    /// values falls back to the constant minimum.
    pub fn new(points: &[DataPoint], policy: RadiusPolicy) -> ChartResult<Self> {
        match policy.validate()? {
            RadiusPolicy::Constant(radius) => Ok(Self::Constant(radius)),
            RadiusPolicy::Proportional { max_radius } => {
                let max_observed = points
                    .iter()
                    .filter_map(|point| finite(point.radius))
                    .fold(0.0_f64, f64::max);
                if max_observed <= 0.0 {
                    return Ok(Self::Constant(MIN_PROPORTIONAL_RADIUS));
                }
                Ok(Self::Scaled(SqrtScale::new(
                    max_observed,
                    MIN_PROPORTIONAL_RADIUS,
                    max_radius,
                )?))
            }
        }
    }

    #[must_use]
    pub fn radius(self, point: &DataPoint) -> f64 {
        match self {
            Self::Constant(radius) => radius,
            Self::Scaled(scale) => scale.map(finite(point.radius).unwrap_or(0.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    pub datum: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl CircleGeometry {
    #[must_use]
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.r * self.r
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterProjection {
    pub circles: Vec<CircleGeometry>,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
}

/// Two-dimensional scatter: one circle per point with both `x` and `y`.
pub fn project_scatter(
    points: &[DataPoint],
    plot: PlotArea,
    radius: RadiusPolicy,
    x_overrides: DomainOverrides,
    y_overrides: DomainOverrides,
) -> ChartResult<Option<ScatterProjection>> {
    let plotted = || {
        points
            .iter()
            .filter(|point| finite(point.x).is_some() && finite(point.y).is_some())
    };
    let (Some(x_domain), Some(y_domain)) = (
        NumericDomain::zero_anchored(plotted().map(|point| point.x), x_overrides.validate()?),
        NumericDomain::zero_anchored(plotted().map(|point| point.y), y_overrides.validate()?),
    ) else {
        return Ok(None);
    };
    let x_scale = LinearScale::from_domain(x_domain, plot.left, plot.right())?;
    let y_scale = LinearScale::from_domain(y_domain, plot.bottom(), plot.top)?;
    let radius = RadiusResolver::new(points, radius)?;

    let mut circles: Vec<CircleGeometry> = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| {
            let (x, y) = (finite(point.x)?, finite(point.y)?);
            Some(CircleGeometry {
                datum,
                cx: x_scale.domain_to_pixel(x),
                cy: y_scale.domain_to_pixel(y),
                r: radius.radius(point),
            })
        })
        .collect();
    // Large symbols first so small ones stay visible on top.
    circles.sort_by_key(|circle| std::cmp::Reverse(OrderedFloat(circle.r)));

    Ok(Some(ScatterProjection {
        circles,
        x_scale,
        y_scale,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripArrangement {
    /// Every symbol on the axis center line.
    #[default]
    Strip,
    /// Symbols dodge sideways so they do not overlap.
    BeeSwarm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripProjection {
    pub circles: Vec<CircleGeometry>,
    pub value_scale: LinearScale,
}

/// One-dimensional layout along the `position` field.
///
/// `Horizontal` places values along x; `Vertical` along y (growing upwards).
pub fn project_strip(
    points: &[DataPoint],
    plot: PlotArea,
    orientation: Orientation,
    arrangement: StripArrangement,
    radius: RadiusPolicy,
    overrides: DomainOverrides,
) -> ChartResult<Option<StripProjection>> {
    let Some(domain) = NumericDomain::zero_anchored(
        points.iter().map(|point| point.position),
        overrides.validate()?,
    ) else {
        return Ok(None);
    };
    let (range, cross_center) = match orientation {
        Orientation::Horizontal => ((plot.left, plot.right()), plot.center().1),
        Orientation::Vertical => ((plot.bottom(), plot.top), plot.center().0),
    };
    let value_scale = LinearScale::from_domain(domain, range.0, range.1)?;
    let radius = RadiusResolver::new(points, radius)?;

    let mut placed: Vec<(usize, f64, f64)> = points
        .iter()
        .enumerate()
        .filter_map(|(datum, point)| {
            let value = finite(point.position)?;
            Some((datum, value_scale.domain_to_pixel(value), radius.radius(point)))
        })
        .collect();
    placed.sort_by_key(|(_, along, _)| OrderedFloat(*along));

    let offsets = match arrangement {
        StripArrangement::Strip => vec![0.0; placed.len()],
        StripArrangement::BeeSwarm => dodge(&placed, BEE_SWARM_GAP_PX),
    };

    let circles = placed
        .iter()
        .zip(offsets)
        .map(|(&(datum, along, r), offset)| {
            let (cx, cy) = match orientation {
                Orientation::Horizontal => (along, cross_center + offset),
                Orientation::Vertical => (cross_center + offset, along),
            };
            CircleGeometry { datum, cx, cy, r }
        })
        .collect();

    Ok(Some(StripProjection {
        circles,
        value_scale,
    }))
}

const BEE_SWARM_GAP_PX: f64 = 1.0;

/// Cross-axis offsets that keep circles (sorted by `along`) from overlapping.
///
/// Each circle takes the candidate offset closest to the center line that
/// clears every circle placed before it.
fn dodge(placed: &[(usize, f64, f64)], gap: f64) -> Vec<f64> {
    let mut offsets: Vec<f64> = Vec::with_capacity(placed.len());
    for (index, &(_, along, r)) in placed.iter().enumerate() {
        let neighbours: Vec<(f64, f64)> = placed[..index]
            .iter()
            .zip(&offsets)
            .filter_map(|(&(_, other_along, other_r), &other_offset)| {
                let reach = r + other_r + gap;
                let delta = along - other_along;
                (delta.abs() < reach).then(|| (other_offset, (reach * reach - delta * delta).sqrt()))
            })
            .collect();

        let clears = |offset: f64| {
            neighbours
                .iter()
                .all(|(other_offset, clearance)| (offset - other_offset).abs() >= clearance - 1e-9)
        };

        let mut candidates = vec![0.0];
        for (other_offset, clearance) in &neighbours {
            candidates.push(other_offset + clearance);
            candidates.push(other_offset - clearance);
        }
        candidates.sort_by_key(|offset| (OrderedFloat(offset.abs()), OrderedFloat(*offset)));
        let chosen = candidates
            .into_iter()
            .find(|offset| clears(*offset))
            .unwrap_or(0.0);
        offsets.push(chosen);
    }
    offsets
}
