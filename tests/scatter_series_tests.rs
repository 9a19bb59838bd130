use approx::assert_relative_eq;
use chart_geometry::core::scatter_series::MIN_PROPORTIONAL_RADIUS;
use chart_geometry::core::{
    DataPoint, DomainOverrides, Orientation, PlotArea, RadiusPolicy, StripArrangement,
    project_scatter, project_strip,
};
use proptest::prelude::*;

fn plot() -> PlotArea {
    PlotArea::new(10.0, 10.0, 400.0, 300.0).expect("plot")
}

#[test]
fn scatter_axes_are_zero_anchored() {
    let points = vec![
        DataPoint::new().with_x(10.0).with_y(5.0),
        DataPoint::new().with_x(20.0).with_y(15.0),
    ];
    let projection = project_scatter(
        &points,
        plot(),
        RadiusPolicy::Constant(4.0),
        DomainOverrides::none(),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("scatter");

    assert_eq!(projection.x_scale.domain(), (0.0, 20.0));
    assert_eq!(projection.y_scale.domain(), (0.0, 15.0));
    let far = projection
        .circles
        .iter()
        .find(|circle| circle.datum == 1)
        .expect("circle");
    assert_relative_eq!(far.cx, 410.0);
    assert_relative_eq!(far.cy, 10.0);
}

#[test]
fn scatter_skips_points_missing_a_coordinate() {
    let points = vec![
        DataPoint::new().with_x(1.0).with_y(1.0),
        DataPoint::new().with_x(2.0),
        DataPoint::new().with_y(f64::NAN).with_x(3.0),
    ];
    let projection = project_scatter(
        &points,
        plot(),
        RadiusPolicy::default(),
        DomainOverrides::none(),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("scatter");
    assert_eq!(projection.circles.len(), 1);
    assert_eq!(projection.circles[0].datum, 0);
}

#[test]
fn proportional_radius_keeps_area_ratio() {
    let points = vec![
        DataPoint::new().with_x(1.0).with_y(1.0).with_radius(25.0),
        DataPoint::new().with_x(2.0).with_y(2.0).with_radius(100.0),
    ];
    let projection = project_scatter(
        &points,
        plot(),
        RadiusPolicy::Proportional { max_radius: 20.0 },
        DomainOverrides::none(),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("scatter");

    // Larger symbols are listed first.
    assert_eq!(projection.circles[0].datum, 1);
    let large = projection.circles[0].r - MIN_PROPORTIONAL_RADIUS;
    let small = projection.circles[1].r - MIN_PROPORTIONAL_RADIUS;
    assert_relative_eq!(projection.circles[0].r, 20.0);
    assert_relative_eq!((large * large) / (small * small), 4.0, epsilon = 1e-9);
}

#[test]
fn strip_places_symbols_on_the_center_line() {
    let points: Vec<DataPoint> = [1.0, 1.0, 4.0]
        .iter()
        .map(|value| DataPoint::new().with_position(*value))
        .collect();
    let projection = project_strip(
        &points,
        plot(),
        Orientation::Horizontal,
        StripArrangement::Strip,
        RadiusPolicy::Constant(5.0),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("strip");

    let center_y = plot().center().1;
    assert!(projection.circles.iter().all(|circle| circle.cy == center_y));
    assert_eq!(projection.value_scale.domain(), (0.0, 4.0));
}

#[test]
fn bee_swarm_first_symbol_stays_centered() {
    let points = vec![
        DataPoint::new().with_position(2.0),
        DataPoint::new().with_position(2.0),
    ];
    let projection = project_strip(
        &points,
        plot(),
        Orientation::Horizontal,
        StripArrangement::BeeSwarm,
        RadiusPolicy::Constant(5.0),
        DomainOverrides::none(),
    )
    .expect("project")
    .expect("swarm");

    let center_y = plot().center().1;
    let offsets: Vec<f64> = projection
        .circles
        .iter()
        .map(|circle| circle.cy - center_y)
        .collect();
    assert_eq!(offsets[0], 0.0);
    assert_relative_eq!(offsets[1].abs(), 11.0, epsilon = 1e-9);
}

proptest! {
    #[test]
    fn bee_swarm_symbols_never_overlap(
        values in prop::collection::vec(0.0f64..50.0, 1..40),
        radius in 1.0f64..8.0
    ) {
        let points: Vec<DataPoint> = values
            .iter()
            .map(|value| DataPoint::new().with_position(*value))
            .collect();
        let projection = project_strip(
            &points,
            plot(),
            Orientation::Vertical,
            StripArrangement::BeeSwarm,
            RadiusPolicy::Constant(radius),
            DomainOverrides::none(),
        )
        .expect("project")
        .expect("swarm");

        prop_assert_eq!(projection.circles.len(), points.len());
        for (i, a) in projection.circles.iter().enumerate() {
            for b in &projection.circles[i + 1..] {
                let distance = (a.cx - b.cx).hypot(a.cy - b.cy);
                prop_assert!(distance >= a.r + b.r - 1e-6);
            }
        }
    }
}
