use crate::core::{
    ColorResolver, DataPoint, HeatmapProjection, Orientation, ThresholdScale, Viewport,
    format_tick_value,
};
use crate::error::ChartResult;
use crate::interaction::{InteractionState, OpacityRule};
use crate::render::{
    ArcPrimitive, CirclePrimitive, Color, EmptyStateReason, LinePrimitive, PathPrimitive,
    RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::{AxisPlacement, ChartFamily, ChartScene, ChartSettings, DrawnScene, SceneGeometry};

const AXIS_LABEL_GAP_PX: f64 = 4.0;
const VALUE_LABEL_GAP_PX: f64 = 4.0;
const CONNECTOR_STROKE_PX: f64 = 2.0;
const EMPTY_STATE_MESSAGE: &str = "No data available";

pub(super) struct FrameInputs<'a> {
    pub(super) settings: &'a ChartSettings,
    pub(super) points: &'a [DataPoint],
    pub(super) interaction: &'a InteractionState,
    pub(super) resolver: &'a ColorResolver,
}

/// Materializes a scene into backend-agnostic primitives.
pub(super) fn build_render_frame(
    scene: &ChartScene,
    viewport: Viewport,
    inputs: &FrameInputs<'_>,
) -> ChartResult<RenderFrame> {
    match scene {
        ChartScene::Empty(reason) => empty_frame(viewport, *reason, inputs.settings),
        ChartScene::Drawn(drawn) => drawn_frame(drawn, inputs),
    }
}

fn empty_frame(
    viewport: Viewport,
    reason: EmptyStateReason,
    settings: &ChartSettings,
) -> ChartResult<RenderFrame> {
    let text_color = Color::parse(&settings.theme.text_color)?;
    Ok(RenderFrame::empty(viewport, reason).with_text(TextPrimitive::new(
        EMPTY_STATE_MESSAGE,
        f64::from(viewport.width) / 2.0,
        f64::from(viewport.height) / 2.0,
        settings.theme.font_size_px,
        text_color,
        TextHAlign::Center,
    )))
}

struct Painter<'a> {
    inputs: &'a FrameInputs<'a>,
    frame: RenderFrame,
}

impl Painter<'_> {
    fn settings(&self) -> &ChartSettings {
        self.inputs.settings
    }

    fn point(&self, datum: usize) -> Option<&DataPoint> {
        self.inputs.points.get(datum)
    }

    fn opacity(&self, color: &str, datum: Option<usize>) -> f64 {
        let label = datum
            .and_then(|datum| self.point(datum))
            .and_then(|point| point.label.as_deref());
        self.labeled_opacity(color, label)
    }

    fn labeled_opacity(&self, color: &str, label: Option<&str>) -> f64 {
        self.inputs.interaction.opacity(
            color,
            label,
            OpacityRule {
                highlighted: &self.settings().highlighted_data_points,
                dimmed_opacity: self.settings().theme.dimmed_opacity,
            },
        )
    }

    /// Color of a whole data point.
    fn point_color(&self, datum: usize) -> &str {
        match self.point(datum) {
            Some(point) => self.inputs.resolver.resolve(point),
            None => self.inputs.resolver.no_data_color(),
        }
    }

    /// Color of one sub-value of a multi-valued point.
    fn series_color(&self, series: usize) -> &str {
        self.inputs
            .resolver
            .series_color(self.palette(), series)
    }

    fn palette(&self) -> &[String] {
        self.settings().palette()
    }

    fn text(&self, text: String, x: f64, y: f64, align: TextHAlign) -> ChartResult<TextPrimitive> {
        Ok(TextPrimitive::new(
            text,
            x,
            y,
            self.settings().theme.font_size_px,
            Color::parse(&self.settings().theme.text_color)?,
            align.for_direction(self.settings().rtl),
        ))
    }
}

fn drawn_frame(scene: &DrawnScene, inputs: &FrameInputs<'_>) -> ChartResult<RenderFrame> {
    let mut painter = Painter {
        inputs,
        frame: RenderFrame::new(scene.viewport),
    };
    match &scene.geometry {
        SceneGeometry::Bars(projection) => {
            let step = projection.value_scale.tick_step(inputs.settings.tick_count);
            for bar in &projection.bars {
                let color = match bar.series {
                    Some(series) => painter.series_color(series),
                    None => painter.point_color(bar.datum),
                }
                .to_owned();
                let opacity = painter.opacity(&color, Some(bar.datum));
                painter.frame.rects.push(
                    RectPrimitive::new(bar.x, bar.y, bar.width, bar.height, Color::parse(&color)?)
                        .with_datum(bar.datum)
                        .with_opacity(opacity),
                );
                if inputs.settings.show_values && bar.series.is_none() {
                    let label = format_tick_value(bar.value, step);
                    let (x, y, align) = match inputs.settings.orientation {
                        Orientation::Vertical => (
                            bar.x + bar.width / 2.0,
                            bar.y - VALUE_LABEL_GAP_PX,
                            TextHAlign::Center,
                        ),
                        Orientation::Horizontal => (
                            bar.x + bar.width + VALUE_LABEL_GAP_PX,
                            bar.y + bar.height / 2.0,
                            TextHAlign::Left,
                        ),
                    };
                    let text = painter.text(label, x, y, align)?.with_opacity(opacity);
                    painter.frame.texts.push(text);
                }
            }
        }
        SceneGeometry::Dumbbells(projection) => {
            let axis_color = Color::parse(&inputs.settings.theme.axis_color)?;
            for dumbbell in &projection.dumbbells {
                if let Some((x1, y1, x2, y2)) = dumbbell.connector {
                    // The connector has no legend color, so any legend selection dims it.
                    let opacity = painter.opacity("", Some(dumbbell.datum));
                    painter.frame.lines.push(
                        LinePrimitive::new(x1, y1, x2, y2, CONNECTOR_STROKE_PX, axis_color)
                            .with_datum(dumbbell.datum)
                            .with_opacity(opacity),
                    );
                }
                for dot in &dumbbell.dots {
                    let color = painter.series_color(dot.series).to_owned();
                    let opacity = painter.opacity(&color, Some(dumbbell.datum));
                    painter.frame.circles.push(
                        CirclePrimitive::new(dot.cx, dot.cy, dot.r, Color::parse(&color)?)
                            .with_datum(dumbbell.datum)
                            .with_opacity(opacity),
                    );
                }
            }
        }
        SceneGeometry::Lines(projection) => {
            let stroke_width = inputs.settings.theme.line_stroke_width;
            for series in &projection.series {
                let color = inputs.resolver.resolve_key(series.key.as_deref()).to_owned();
                // Line series are highlighted by their series key.
                let opacity = painter.labeled_opacity(&color, series.key.as_deref());
                let d = series.path();
                if d.is_empty() {
                    continue;
                }
                painter.frame.paths.push(
                    PathPrimitive::stroked(d, Color::parse(&color)?, stroke_width)
                        .with_opacity(opacity),
                );
            }
        }
        SceneGeometry::Circles(circles) => {
            for circle in circles {
                let color = painter.point_color(circle.datum).to_owned();
                let opacity = painter.opacity(&color, Some(circle.datum));
                painter.frame.circles.push(
                    CirclePrimitive::new(circle.cx, circle.cy, circle.r, Color::parse(&color)?)
                        .with_datum(circle.datum)
                        .with_opacity(opacity),
                );
            }
        }
        SceneGeometry::Map(projection) => {
            let thresholds = value_threshold_scale(inputs.settings)?;
            let axis_color = Color::parse(&inputs.settings.theme.axis_color)?;
            let dot_density = inputs.settings.chart == ChartFamily::DotDensity;
            for shape in &projection.shapes {
                let color = match (shape.datum, dot_density) {
                    (Some(datum), false) => match (&thresholds, painter.point(datum)) {
                        (Some(scale), Some(point)) => match point.x.filter(|x| x.is_finite()) {
                            Some(value) => scale.resolve(value).to_owned(),
                            None => inputs.resolver.no_data_color().to_owned(),
                        },
                        _ => painter.point_color(datum).to_owned(),
                    },
                    _ => inputs.resolver.no_data_color().to_owned(),
                };
                let opacity = if dot_density {
                    1.0
                } else {
                    painter.opacity(&color, shape.datum)
                };
                let fill = Color::parse(&color)?;
                for d in &shape.paths {
                    let mut path = PathPrimitive::filled(d.clone(), fill)
                        .with_datum(shape.datum)
                        .with_opacity(opacity);
                    path.stroke = Some(axis_color);
                    path.stroke_width = 0.5;
                    painter.frame.paths.push(path);
                }
            }
            for dot in &projection.dots {
                let color = painter.point_color(dot.datum).to_owned();
                let opacity = painter.opacity(&color, Some(dot.datum));
                painter.frame.circles.push(
                    CirclePrimitive::new(dot.cx, dot.cy, dot.r, Color::parse(&color)?)
                        .with_datum(dot.datum)
                        .with_opacity(opacity),
                );
            }
        }
        SceneGeometry::Heatmap(projection) => {
            let scale = heatmap_scale(inputs.settings, projection)?;
            let categorical = inputs.resolver.is_categorical();
            for cell in &projection.cells {
                let color = match (categorical, cell.value, &scale) {
                    (true, _, _) => painter.point_color(cell.datum).to_owned(),
                    (false, Some(value), Some(scale)) => scale.resolve(value).to_owned(),
                    _ => inputs.resolver.no_data_color().to_owned(),
                };
                let opacity = painter.opacity(&color, Some(cell.datum));
                painter.frame.rects.push(
                    RectPrimitive::new(cell.x, cell.y, cell.width, cell.height, Color::parse(&color)?)
                        .with_datum(cell.datum)
                        .with_opacity(opacity),
                );
            }
        }
        SceneGeometry::Donut(arcs) => {
            let categorical = inputs.resolver.is_categorical();
            for (slot, arc) in arcs.iter().enumerate() {
                let color = if categorical {
                    painter.point_color(arc.datum).to_owned()
                } else {
                    painter.series_color(slot).to_owned()
                };
                let opacity = painter.opacity(&color, Some(arc.datum));
                painter.frame.arcs.push(ArcPrimitive {
                    cx: arc.cx,
                    cy: arc.cy,
                    inner_radius: arc.inner_radius,
                    outer_radius: arc.outer_radius,
                    start_angle: arc.start_angle,
                    end_angle: arc.end_angle,
                    fill: Color::parse(&color)?,
                    opacity,
                    datum: Some(arc.datum),
                });
            }
        }
        SceneGeometry::Units(dots) => {
            let categorical = inputs.resolver.is_categorical();
            for dot in dots {
                let color = match dot.datum {
                    Some(datum) if categorical => painter.point_color(datum).to_owned(),
                    Some(datum) => painter.series_color(datum).to_owned(),
                    None => inputs.resolver.no_data_color().to_owned(),
                };
                let opacity = painter.opacity(&color, dot.datum);
                let mut circle = CirclePrimitive::new(dot.cx, dot.cy, dot.r, Color::parse(&color)?)
                    .with_opacity(opacity);
                circle.datum = dot.datum;
                painter.frame.circles.push(circle);
            }
        }
    }
    paint_axes(&mut painter, scene)?;
    Ok(painter.frame)
}

fn paint_axes(painter: &mut Painter<'_>, scene: &DrawnScene) -> ChartResult<()> {
    if scene.axes.is_empty() {
        return Ok(());
    }
    let axis_color = Color::parse(&painter.settings().theme.axis_color)?;
    let font_size = painter.settings().theme.font_size_px;
    let plot = scene.plot;
    for axis in &scene.axes {
        let (line, texts) = match axis.placement {
            AxisPlacement::Bottom => {
                let baseline = plot.bottom();
                let label_y = baseline + AXIS_LABEL_GAP_PX + font_size;
                let texts = axis
                    .ticks
                    .iter()
                    .map(|tick| {
                        painter.text(tick.label.clone(), tick.position, label_y, TextHAlign::Center)
                    })
                    .collect::<ChartResult<Vec<_>>>()?;
                let line =
                    LinePrimitive::new(plot.left, baseline, plot.right(), baseline, 1.0, axis_color);
                (line, texts)
            }
            AxisPlacement::Left => {
                let label_x = plot.left - AXIS_LABEL_GAP_PX;
                let texts = axis
                    .ticks
                    .iter()
                    .map(|tick| {
                        painter.text(tick.label.clone(), label_x, tick.position, TextHAlign::Right)
                    })
                    .collect::<ChartResult<Vec<_>>>()?;
                let line =
                    LinePrimitive::new(plot.left, plot.top, plot.left, plot.bottom(), 1.0, axis_color);
                (line, texts)
            }
        };
        painter.frame.lines.push(line);
        painter
            .frame
            .texts
            .extend(texts.into_iter().filter(|text| !text.text.is_empty()));
    }
    Ok(())
}

/// Palette for value-driven colors: configured colors, else the sequential ramp.
fn value_palette(settings: &ChartSettings) -> &[String] {
    if settings.colors.is_empty() {
        &settings.theme.sequential_colors
    } else {
        &settings.colors
    }
}

/// Explicit `value_thresholds` step scale, when configured.
fn value_threshold_scale(settings: &ChartSettings) -> ChartResult<Option<ThresholdScale>> {
    let Some(thresholds) = &settings.value_thresholds else {
        return Ok(None);
    };
    let colors = value_palette(settings)
        .iter()
        .cycle()
        .take(thresholds.len() + 1)
        .cloned()
        .collect();
    ThresholdScale::new(thresholds.clone(), colors).map(Some)
}

/// Explicit thresholds, else even buckets over the observed cell values.
fn heatmap_scale(
    settings: &ChartSettings,
    projection: &HeatmapProjection,
) -> ChartResult<Option<ThresholdScale>> {
    if let Some(scale) = value_threshold_scale(settings)? {
        return Ok(Some(scale));
    }
    let Some(domain) = projection.value_domain else {
        return Ok(None);
    };
    ThresholdScale::uniform(domain.min, domain.max, value_palette(settings).to_vec()).map(Some)
}
