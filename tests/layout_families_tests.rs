use std::f64::consts::{FRAC_PI_2, PI, TAU};

use approx::assert_relative_eq;
use chart_geometry::api::{ChartEngine, ChartFamily, ChartSettings, SceneGeometry};
use chart_geometry::core::{
    DataPoint, DomainOverrides, FeatureCollection, HeatmapConfig, PlotArea, Projection,
    RadiusPolicy, UnitChartConfig, project_choropleth, project_donut, project_dot_density,
    project_heatmap, project_units,
};
use chart_geometry::render::{EmptyStateReason, NullRenderer};

const TWO_SQUARES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "id": "west" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
      }
    },
    {
      "type": "Feature",
      "id": "east",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[20, 0], [30, 0], [30, 10], [20, 10], [20, 0]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "id": "nowhere" },
      "geometry": { "type": "Point", "coordinates": [5, 5] }
    }
  ]
}"#;

fn plot() -> PlotArea {
    PlotArea::new(0.0, 0.0, 400.0, 200.0).expect("plot")
}

fn squares() -> FeatureCollection {
    FeatureCollection::from_json_str(TWO_SQUARES).expect("geojson")
}

#[test]
fn choropleth_joins_labels_to_feature_keys() {
    let points = vec![
        DataPoint::labeled("east").with_x(3.0),
        DataPoint::labeled("atlantis").with_x(1.0),
    ];
    let projection = project_choropleth(&squares(), &points, plot(), Projection::Mercator, "id")
        .expect("project")
        .expect("map");

    assert_eq!(projection.shapes.len(), 2);
    let west = &projection.shapes[0];
    assert_eq!(west.key.as_deref(), Some("west"));
    assert_eq!(west.datum, None);
    let east = &projection.shapes[1];
    assert_eq!(east.key.as_deref(), Some("east"));
    assert_eq!(east.datum, Some(0));
    assert!(east.paths[0].ends_with('Z'));
    assert_eq!(projection.unmatched, vec![1]);
}

#[test]
fn large_datasets_report_unmatched_points_in_data_order() {
    let points: Vec<DataPoint> = (0..2_000)
        .map(|i| match i {
            10 => DataPoint::labeled("west"),
            1_500 => DataPoint::labeled("east"),
            _ => DataPoint::labeled(format!("region-{i}")),
        })
        .collect();
    let projection = project_choropleth(&squares(), &points, plot(), Projection::Mercator, "id")
        .expect("project")
        .expect("map");

    assert_eq!(projection.shapes[0].datum, Some(10));
    assert_eq!(projection.shapes[1].datum, Some(1_500));
    let expected: Vec<usize> = (0..2_000).filter(|i| *i != 10 && *i != 1_500).collect();
    assert_eq!(projection.unmatched, expected);
}

#[test]
fn fitted_shapes_stay_inside_the_plot() {
    for kind in [Projection::EqualEarth, Projection::Mercator] {
        let projection = project_choropleth(&squares(), &[], plot(), kind, "id")
            .expect("project")
            .expect("map");
        for shape in &projection.shapes {
            let (x, y) = shape.anchor;
            assert!(plot().contains(x, y), "{kind:?} anchor {x},{y} outside plot");
        }
    }
}

#[test]
fn dot_density_projects_lon_lat_points() {
    let points = vec![
        DataPoint::new().with_x(5.0).with_y(5.0),
        DataPoint::new().with_x(25.0),
    ];
    let projection = project_dot_density(
        &squares(),
        &points,
        plot(),
        Projection::Mercator,
        "id",
        RadiusPolicy::Constant(3.0),
    )
    .expect("project")
    .expect("map");

    assert_eq!(projection.dots.len(), 1);
    assert_eq!(projection.unmatched, vec![1]);
    let (x, y) = projection.projection.project(5.0, 5.0);
    let dot = projection.dots[0];
    assert_relative_eq!(dot.cx, x);
    assert_relative_eq!(dot.cy, y);
    assert_relative_eq!(dot.r, 3.0);
}

#[test]
fn geometry_without_coordinates_is_not_drawable() {
    let empty = FeatureCollection::from_json_str(r#"{"features": []}"#).expect("geojson");
    let projection = project_choropleth(&empty, &[], plot(), Projection::EqualEarth, "id")
        .expect("project");
    assert!(projection.is_none());
}

#[test]
fn map_without_geometry_reports_missing_geometry() {
    let settings = ChartSettings::new(ChartFamily::Choropleth).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![DataPoint::labeled("east").with_x(1.0)]);

    assert_eq!(
        engine.scene().expect("scene").empty_reason(),
        Some(EmptyStateReason::MissingGeometry)
    );
    engine.render().expect("render");
    let renderer = engine.renderer();
    assert_eq!(
        renderer.last_empty_state,
        Some(EmptyStateReason::MissingGeometry)
    );
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn choropleth_draws_boundaries_without_data() {
    let settings = ChartSettings::new(ChartFamily::Choropleth).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_feature_collection_json(TWO_SQUARES).expect("geojson");

    let frame = engine.render_frame().expect("frame").expect("sized");
    assert!(frame.empty_state.is_none());
    assert_eq!(frame.paths.len(), 2);
}

#[test]
fn heatmap_cells_follow_label_order() {
    let points = vec![
        DataPoint::new().with_x_label("mon").with_y_label("am").with_size(1.0),
        DataPoint::new().with_x_label("tue").with_y_label("am").with_size(4.0),
        DataPoint::new().with_x_label("mon").with_y_label("pm"),
        DataPoint::new().with_x_label("wed"),
    ];
    let projection = project_heatmap(
        &points,
        plot(),
        &HeatmapConfig::default(),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("heatmap");

    assert_eq!(projection.columns.len(), 3);
    assert_eq!(projection.rows.len(), 2);
    assert_eq!(projection.cells.len(), 3);
    let tue = projection.cells.iter().find(|cell| cell.datum == 1).expect("cell");
    assert_relative_eq!(tue.x, 400.0 / 3.0);
    assert_relative_eq!(tue.height, 100.0);
    let missing = projection.cells.iter().find(|cell| cell.datum == 2).expect("cell");
    assert_eq!(missing.value, None);
    let domain = projection.value_domain.expect("domain");
    assert_eq!((domain.min, domain.max), (1.0, 4.0));
}

#[test]
fn heatmap_scene_labels_both_category_axes() {
    let settings = ChartSettings::new(ChartFamily::Heatmap).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![
        DataPoint::new().with_x_label("mon").with_y_label("am").with_size(1.0),
        DataPoint::new().with_x_label("tue").with_y_label("pm").with_size(2.0),
        DataPoint::new().with_x_label("wed").with_y_label("am").with_size(3.0),
    ]);
    let scene = engine.scene().expect("scene");
    let drawn = scene.drawn().expect("drawn");

    let labels = |axis: usize| -> Vec<String> {
        drawn.axes[axis].ticks.iter().map(|tick| tick.label.clone()).collect()
    };
    assert_eq!(labels(0), ["mon", "tue", "wed"]);
    assert_eq!(labels(1), ["am", "pm"]);
}

#[test]
fn heatmap_explicit_domains_drop_unknown_labels() {
    let config = HeatmapConfig {
        x_domain: Some(vec!["tue".to_owned()]),
        y_domain: Some(vec!["am".to_owned()]),
        cell_padding: 0.1,
    };
    let points = vec![
        DataPoint::new().with_x_label("mon").with_y_label("am").with_size(1.0),
        DataPoint::new().with_x_label("tue").with_y_label("am").with_size(4.0),
    ];
    let projection = project_heatmap(&points, plot(), &config, DomainOverrides::none())
        .expect("project")
        .expect("heatmap");
    assert_eq!(projection.cells.len(), 1);
    assert_eq!(projection.cells[0].datum, 1);
    assert_relative_eq!(projection.cells[0].width, 360.0);
}

#[test]
fn donut_arcs_cover_the_full_circle() {
    let points = vec![
        DataPoint::new().with_size(1.0),
        DataPoint::new().with_size(1.0),
        DataPoint::new(),
        DataPoint::new().with_size(2.0),
    ];
    let arcs = project_donut(&points, plot(), 0.5)
        .expect("project")
        .expect("arcs");

    assert_eq!(arcs.len(), 3);
    assert_relative_eq!(arcs[0].start_angle, 0.0);
    assert_relative_eq!(arcs[0].end_angle, FRAC_PI_2);
    assert_relative_eq!(arcs[1].end_angle, PI);
    assert_relative_eq!(arcs[2].end_angle, TAU);
    assert_eq!(arcs[2].datum, 3);
    assert_relative_eq!(arcs[0].outer_radius, 100.0);
    assert_relative_eq!(arcs[0].inner_radius, 50.0);
    for arc in &arcs {
        let (x, y) = arc.centroid();
        assert!(arc.contains(x, y));
    }
    // Twelve o'clock, just right of the top, belongs to the first arc.
    assert!(arcs[0].contains(201.0, 25.0));
    assert!(!arcs[0].contains(200.0, 100.0));
}

#[test]
fn donut_without_positive_values_is_empty() {
    let points = vec![DataPoint::new().with_size(0.0), DataPoint::new()];
    assert!(project_donut(&points, plot(), 0.5).expect("project").is_none());
    assert!(project_donut(&points, plot(), 1.0).is_err());
}

#[test]
fn unit_chart_allocates_dots_by_share() {
    let points = vec![
        DataPoint::labeled("a").with_size(30.0),
        DataPoint::labeled("b").with_size(20.0),
    ];
    let config = UnitChartConfig {
        max_value: Some(100.0),
        ..UnitChartConfig::default()
    };
    let dots = project_units(&points, plot(), config).expect("units");

    assert_eq!(dots.len(), 100);
    assert_eq!(dots.iter().filter(|dot| dot.datum == Some(0)).count(), 30);
    assert_eq!(dots.iter().filter(|dot| dot.datum == Some(1)).count(), 20);
    assert_eq!(dots.iter().filter(|dot| dot.datum.is_none()).count(), 50);
    assert_relative_eq!(dots[0].r, config.dot_radius());
    assert_relative_eq!(dots[1].cx - dots[0].cx, config.dot_radius() * 2.0 + config.gap);
    assert_relative_eq!(dots[10].cy - dots[0].cy, config.dot_radius() * 2.0 + config.gap);
}

#[test]
fn unit_chart_rejects_values_over_the_maximum() {
    let points = vec![
        DataPoint::labeled("a").with_size(30.0),
        DataPoint::labeled("b").with_size(20.0),
    ];
    let over_single = UnitChartConfig {
        max_value: Some(25.0),
        ..UnitChartConfig::default()
    };
    assert!(project_units(&points, plot(), over_single).is_err());
    let over_sum = UnitChartConfig {
        max_value: Some(40.0),
        ..UnitChartConfig::default()
    };
    assert!(project_units(&points, plot(), over_sum).is_err());
    let no_room = UnitChartConfig {
        size: 10.0,
        gap: 5.0,
        ..UnitChartConfig::default()
    };
    assert!(project_units(&points, plot(), no_room).is_err());
}

#[test]
fn misconfigured_unit_chart_renders_a_diagnostic_empty_state() {
    let settings = ChartSettings::new(ChartFamily::Unit)
        .with_size(400, 300)
        .with_unit(UnitChartConfig {
            max_value: Some(10.0),
            ..UnitChartConfig::default()
        });
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![DataPoint::labeled("a").with_size(30.0)]);

    assert_eq!(
        engine.scene().expect("scene").empty_reason(),
        Some(EmptyStateReason::InvalidConfiguration)
    );
}

#[test]
fn unit_chart_in_the_engine_draws_every_dot() {
    let settings = ChartSettings::new(ChartFamily::Unit).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![
        DataPoint::labeled("a").with_size(3.0),
        DataPoint::labeled("b").with_size(1.0),
    ]);
    match &engine.scene().expect("scene").drawn().expect("drawn").geometry {
        SceneGeometry::Units(dots) => {
            assert_eq!(dots.len(), 100);
            assert_eq!(dots.iter().filter(|dot| dot.datum == Some(0)).count(), 75);
        }
        other => panic!("unexpected geometry {other:?}"),
    }
}
