use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::core::{
    ArcGeometry, BandScale, BarLayoutConfig, BarProjection, CircleGeometry, DataPoint,
    DumbbellConfig, DumbbellProjection, FeatureCollection, HeatmapProjection, LineProjection,
    LinearScale, MapProjection, Orientation, PlotArea, StripArrangement, ThicknessLimits,
    TimeScale, UnitDot, Viewport, format_tick_value, project_bars, project_choropleth,
    project_donut, project_dot_density, project_dumbbells, project_heatmap, project_lines,
    project_scatter, project_strip, project_units, sort_bar_order, sort_dumbbells,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::HitTestIndex;
use crate::render::EmptyStateReason;

use super::{ChartFamily, ChartSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPlacement {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    /// Pixel coordinate along the axis.
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAxis {
    pub placement: AxisPlacement,
    pub ticks: Vec<AxisTick>,
}

/// Family-specific geometry of one scene. Datum indices refer to the
/// engine's full data set.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneGeometry {
    Bars(BarProjection),
    Dumbbells(DumbbellProjection),
    Lines(LineProjection),
    Circles(Vec<CircleGeometry>),
    Map(MapProjection),
    Heatmap(HeatmapProjection),
    Donut(Vec<ArcGeometry>),
    Units(Vec<UnitDot>),
}

#[derive(Debug, Clone)]
pub struct DrawnScene {
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub geometry: SceneGeometry,
    pub axes: Vec<SceneAxis>,
    /// Voronoi lookup over symbol anchors; empty for area-based families.
    pub hit_index: HitTestIndex,
}

impl DrawnScene {
    /// Datum under the pointer.
    ///
    /// Area families (bars, heatmap cells, donut arcs) hit by containment;
    /// symbol families snap to the nearest anchor within `max_distance`.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64, max_distance: f64) -> Option<usize> {
        match &self.geometry {
            SceneGeometry::Bars(projection) => projection
                .bars
                .iter()
                .find(|bar| bar.contains(x, y))
                .map(|bar| bar.datum),
            SceneGeometry::Heatmap(projection) => projection
                .cells
                .iter()
                .find(|cell| {
                    x >= cell.x && x <= cell.x + cell.width && y >= cell.y && y <= cell.y + cell.height
                })
                .map(|cell| cell.datum),
            SceneGeometry::Donut(arcs) => {
                arcs.iter().find(|arc| arc.contains(x, y)).map(|arc| arc.datum)
            }
            _ => self
                .hit_index
                .nearest_within(x, y, max_distance)
                .map(|candidate| candidate.datum),
        }
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone)]
pub enum ChartScene {
    Empty(EmptyStateReason),
    Drawn(Box<DrawnScene>),
}

impl ChartScene {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    #[must_use]
    pub fn empty_reason(&self) -> Option<EmptyStateReason> {
        match self {
            Self::Empty(reason) => Some(*reason),
            Self::Drawn(_) => None,
        }
    }

    #[must_use]
    pub fn drawn(&self) -> Option<&DrawnScene> {
        match self {
            Self::Drawn(scene) => Some(scene),
            Self::Empty(_) => None,
        }
    }
}

pub(super) struct SceneInputs<'a> {
    pub(super) settings: &'a ChartSettings,
    pub(super) points: &'a [DataPoint],
    pub(super) dates: &'a [Option<NaiveDateTime>],
    /// Indices of points visible at the active date; `None` shows all.
    pub(super) active: Option<&'a [usize]>,
    pub(super) features: Option<&'a FeatureCollection>,
    pub(super) viewport: Option<Viewport>,
}

pub(super) fn build_scene(inputs: SceneInputs<'_>) -> ChartResult<ChartScene> {
    let settings = inputs.settings;
    let Some(viewport) = inputs.viewport else {
        return Ok(ChartScene::Empty(EmptyStateReason::NoContainerSize));
    };
    if settings.chart.is_map() && inputs.features.is_none() {
        return Ok(ChartScene::Empty(EmptyStateReason::MissingGeometry));
    }
    if inputs.points.is_empty() && settings.chart != ChartFamily::Choropleth {
        return Ok(ChartScene::Empty(EmptyStateReason::NoData));
    }
    let plot = match PlotArea::from_viewport(viewport, settings.margins) {
        Ok(plot) => plot,
        Err(err) => {
            error!(error = %err, "margins leave no room for the plot area");
            return Ok(ChartScene::Empty(EmptyStateReason::InvalidConfiguration));
        }
    };

    let index_map: Vec<usize> = match inputs.active {
        Some(active) => active.to_vec(),
        None => (0..inputs.points.len()).collect(),
    };
    let points: Vec<DataPoint> = index_map
        .iter()
        .map(|&index| inputs.points[index].clone())
        .collect();
    let dates: Vec<Option<NaiveDateTime>> = index_map
        .iter()
        .map(|&index| inputs.dates.get(index).copied().flatten())
        .collect();
    trace!(
        total = inputs.points.len(),
        active = points.len(),
        "building scene"
    );

    let (mut geometry, axes) =
        match layout_family(settings, &points, &dates, inputs.features, plot)? {
            Layout::Drawn(geometry, axes) => (geometry, axes),
            Layout::Empty(reason) => return Ok(ChartScene::Empty(reason)),
        };
    remap_datums(&mut geometry, &index_map);
    let hit_index = build_hit_index(&geometry);
    debug!(
        chart = ?settings.chart,
        width = viewport.width,
        height = viewport.height,
        "scene rebuilt"
    );

    Ok(ChartScene::Drawn(Box::new(DrawnScene {
        viewport,
        plot,
        geometry,
        axes,
        hit_index,
    })))
}

enum Layout {
    Drawn(SceneGeometry, Vec<SceneAxis>),
    Empty(EmptyStateReason),
}

impl Layout {
    fn from_option(value: Option<(SceneGeometry, Vec<SceneAxis>)>) -> Self {
        match value {
            Some((geometry, axes)) => Self::Drawn(geometry, axes),
            None => Self::Empty(EmptyStateReason::NoValidValues),
        }
    }
}

fn layout_family(
    settings: &ChartSettings,
    points: &[DataPoint],
    dates: &[Option<NaiveDateTime>],
    features: Option<&FeatureCollection>,
    plot: PlotArea,
) -> ChartResult<Layout> {
    let overrides = settings.overrides();
    let ticks = settings.tick_count;
    let value_placement = |orientation: Orientation| match orientation {
        Orientation::Vertical => AxisPlacement::Left,
        Orientation::Horizontal => AxisPlacement::Bottom,
    };
    let band_placement = |orientation: Orientation| match orientation {
        Orientation::Vertical => AxisPlacement::Bottom,
        Orientation::Horizontal => AxisPlacement::Left,
    };

    let layout = match settings.chart {
        ChartFamily::Bar => {
            let order = sort_bar_order(
                points,
                settings.layout,
                sort_key(settings),
                settings.sort_order(),
            );
            let config = BarLayoutConfig {
                orientation: settings.orientation,
                layout: settings.layout,
                padding: settings.bar_padding,
                thickness: settings.thickness_limits(),
            };
            Layout::from_option(project_bars(points, &order, plot, config, overrides)?.map(
                |projection| {
                    let axes = vec![
                        band_axis(
                            projection.band,
                            &projection.order,
                            points,
                            band_placement(settings.orientation),
                        ),
                        value_axis(
                            projection.value_scale,
                            value_placement(settings.orientation),
                            ticks,
                        ),
                    ];
                    (SceneGeometry::Bars(projection), axes)
                },
            ))
        }
        ChartFamily::Dumbbell => {
            let order = sort_dumbbells(points, settings.sort_parameter, settings.sort_order());
            let config = DumbbellConfig {
                orientation: settings.orientation,
                dot_radius: settings.radius,
                padding: settings.bar_padding,
            };
            Layout::from_option(
                project_dumbbells(points, &order, plot, config, overrides)?.map(|projection| {
                    let axes = vec![
                        band_axis(
                            projection.band,
                            &order,
                            points,
                            band_placement(settings.orientation),
                        ),
                        value_axis(
                            projection.value_scale,
                            value_placement(settings.orientation),
                            ticks,
                        ),
                    ];
                    (SceneGeometry::Dumbbells(projection), axes)
                }),
            )
        }
        ChartFamily::Line => Layout::from_option(
            project_lines(points, dates, plot, overrides)?.map(|projection| {
                let axes = vec![
                    time_axis(projection.time_scale, ticks, &settings.date_format)?,
                    value_axis(projection.value_scale, AxisPlacement::Left, ticks),
                ];
                Ok::<_, ChartError>((SceneGeometry::Lines(projection), axes))
            })
            .transpose()?,
        ),
        ChartFamily::Scatter => Layout::from_option(
            project_scatter(
                points,
                plot,
                settings.radius_policy(),
                crate::core::DomainOverrides::none(),
                overrides,
            )?
            .map(|projection| {
                let axes = vec![
                    value_axis(projection.x_scale, AxisPlacement::Bottom, ticks),
                    value_axis(projection.y_scale, AxisPlacement::Left, ticks),
                ];
                (SceneGeometry::Circles(projection.circles), axes)
            }),
        ),
        ChartFamily::Strip | ChartFamily::BeeSwarm => {
            let arrangement = if settings.chart == ChartFamily::BeeSwarm {
                StripArrangement::BeeSwarm
            } else {
                StripArrangement::Strip
            };
            // Strip values run along x for the default vertical setting.
            let axis_orientation = match settings.orientation {
                Orientation::Vertical => Orientation::Horizontal,
                Orientation::Horizontal => Orientation::Vertical,
            };
            Layout::from_option(
                project_strip(
                    points,
                    plot,
                    axis_orientation,
                    arrangement,
                    settings.radius_policy(),
                    overrides,
                )?
                .map(|projection| {
                    let placement = match axis_orientation {
                        Orientation::Horizontal => AxisPlacement::Bottom,
                        Orientation::Vertical => AxisPlacement::Left,
                    };
                    let axes = vec![value_axis(projection.value_scale, placement, ticks)];
                    (SceneGeometry::Circles(projection.circles), axes)
                }),
            )
        }
        ChartFamily::Choropleth | ChartFamily::DotDensity => {
            let Some(features) = features else {
                return Ok(Layout::Empty(EmptyStateReason::MissingGeometry));
            };
            let projected = if settings.chart == ChartFamily::Choropleth {
                project_choropleth(
                    features,
                    points,
                    plot,
                    settings.projection,
                    &settings.map_id_property,
                )?
            } else {
                project_dot_density(
                    features,
                    points,
                    plot,
                    settings.projection,
                    &settings.map_id_property,
                    settings.radius_policy(),
                )?
            };
            match projected {
                Some(projection) => Layout::Drawn(SceneGeometry::Map(projection), Vec::new()),
                None => Layout::Empty(EmptyStateReason::MissingGeometry),
            }
        }
        ChartFamily::Heatmap => Layout::from_option(
            project_heatmap(points, plot, &settings.heatmap, overrides)?.map(|projection| {
                let axes = vec![
                    category_axis(
                        projection.columns.iter(),
                        plot.left,
                        plot.right(),
                        AxisPlacement::Bottom,
                    ),
                    category_axis(
                        projection.rows.iter(),
                        plot.top,
                        plot.bottom(),
                        AxisPlacement::Left,
                    ),
                ];
                (SceneGeometry::Heatmap(projection), axes)
            }),
        ),
        ChartFamily::Donut => Layout::from_option(
            project_donut(points, plot, settings.inner_radius_ratio)?
                .map(|arcs| (SceneGeometry::Donut(arcs), Vec::new())),
        ),
        ChartFamily::Unit => match project_units(points, plot, settings.unit) {
            Ok(dots) => Layout::Drawn(SceneGeometry::Units(dots), Vec::new()),
            Err(ChartError::InvalidSettings(reason)) => {
                error!(%reason, "unit chart settings contradict the data");
                Layout::Empty(EmptyStateReason::InvalidConfiguration)
            }
            Err(err) => return Err(err),
        },
    };
    Ok(layout)
}

/// `sort_data` alone sorts by size, or by the total of multi-valued points.
fn sort_key(settings: &ChartSettings) -> Option<crate::core::SortParameter> {
    settings.sort_parameter.or_else(|| {
        settings
            .sort_data
            .map(|_| crate::core::SortParameter::Total)
    })
}

fn value_axis(scale: LinearScale, placement: AxisPlacement, count: usize) -> SceneAxis {
    let step = scale.tick_step(count);
    SceneAxis {
        placement,
        ticks: scale
            .ticks(count)
            .into_iter()
            .map(|value| AxisTick {
                position: scale.domain_to_pixel(value),
                label: format_tick_value(value, step),
            })
            .collect(),
    }
}

fn band_axis(
    band: BandScale,
    order: &[usize],
    points: &[DataPoint],
    placement: AxisPlacement,
) -> SceneAxis {
    SceneAxis {
        placement,
        ticks: order
            .iter()
            .enumerate()
            .filter_map(|(slot, &datum)| {
                let label = points.get(datum)?.label.clone()?;
                Some(AxisTick {
                    position: band.center(slot)?,
                    label,
                })
            })
            .collect(),
    }
}

fn category_axis<'a>(
    keys: impl ExactSizeIterator<Item = &'a str>,
    range_start: f64,
    range_end: f64,
    placement: AxisPlacement,
) -> SceneAxis {
    let count = keys.len();
    let band = BandScale::new(count, range_start, range_end, 0.0, ThicknessLimits::default());
    SceneAxis {
        placement,
        ticks: match band {
            Ok(band) => keys
                .enumerate()
                .filter_map(|(index, key)| {
                    Some(AxisTick {
                        position: band.center(index)?,
                        label: key.to_owned(),
                    })
                })
                .collect(),
            Err(_) => Vec::new(),
        },
    }
}

fn time_axis(scale: TimeScale, count: usize, format: &str) -> ChartResult<SceneAxis> {
    let ticks = scale
        .ticks(count)?
        .into_iter()
        .map(|date| AxisTick {
            position: scale.time_to_pixel(date),
            label: date.format(format).to_string(),
        })
        .collect();
    Ok(SceneAxis {
        placement: AxisPlacement::Bottom,
        ticks,
    })
}

/// Rewrites datum indices from the active subset back to the full data set.
fn remap_datums(geometry: &mut SceneGeometry, index_map: &[usize]) {
    let global = |local: usize| index_map.get(local).copied().unwrap_or(local);
    match geometry {
        SceneGeometry::Bars(projection) => {
            for bar in &mut projection.bars {
                bar.datum = global(bar.datum);
            }
            for datum in &mut projection.order {
                *datum = global(*datum);
            }
        }
        SceneGeometry::Dumbbells(projection) => {
            for dumbbell in &mut projection.dumbbells {
                dumbbell.datum = global(dumbbell.datum);
            }
        }
        SceneGeometry::Lines(projection) => {
            for vertex in projection
                .series
                .iter_mut()
                .flat_map(|series| series.segments.iter_mut())
                .flat_map(|segment| segment.iter_mut())
            {
                vertex.datum = global(vertex.datum);
            }
        }
        SceneGeometry::Circles(circles) => {
            for circle in circles {
                circle.datum = global(circle.datum);
            }
        }
        SceneGeometry::Map(projection) => {
            for shape in &mut projection.shapes {
                shape.datum = shape.datum.map(global);
            }
            for dot in &mut projection.dots {
                dot.datum = global(dot.datum);
            }
            for datum in &mut projection.unmatched {
                *datum = global(*datum);
            }
        }
        SceneGeometry::Heatmap(projection) => {
            for cell in &mut projection.cells {
                cell.datum = global(cell.datum);
            }
        }
        SceneGeometry::Donut(arcs) => {
            for arc in arcs {
                arc.datum = global(arc.datum);
            }
        }
        SceneGeometry::Units(dots) => {
            for dot in dots {
                dot.datum = dot.datum.map(global);
            }
        }
    }
}

/// Anchors for nearest-symbol lookup.
///
/// Bars, heatmap cells and donut arcs are hit by containment instead.
fn build_hit_index(geometry: &SceneGeometry) -> HitTestIndex {
    match geometry {
        SceneGeometry::Dumbbells(projection) => HitTestIndex::build(
            projection
                .dumbbells
                .iter()
                .flat_map(|d| d.dots.iter().map(|dot| (d.datum, dot.cx, dot.cy))),
        ),
        SceneGeometry::Lines(projection) => HitTestIndex::build(
            projection
                .series
                .iter()
                .flat_map(|series| series.vertices())
                .map(|vertex| (vertex.datum, vertex.x, vertex.y)),
        ),
        SceneGeometry::Circles(circles) => {
            HitTestIndex::build(circles.iter().map(|c| (c.datum, c.cx, c.cy)))
        }
        SceneGeometry::Map(projection) if !projection.dots.is_empty() => {
            HitTestIndex::build(projection.dots.iter().map(|c| (c.datum, c.cx, c.cy)))
        }
        SceneGeometry::Map(projection) => HitTestIndex::build(
            projection
                .shapes
                .iter()
                .filter_map(|shape| shape.datum.map(|datum| (datum, shape.anchor.0, shape.anchor.1))),
        ),
        SceneGeometry::Units(dots) => HitTestIndex::build(
            dots.iter()
                .filter_map(|dot| dot.datum.map(|datum| (datum, dot.cx, dot.cy))),
        ),
        SceneGeometry::Bars(_) | SceneGeometry::Heatmap(_) | SceneGeometry::Donut(_) => {
            HitTestIndex::default()
        }
    }
}
