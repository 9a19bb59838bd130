use std::cell::RefCell;
use std::rc::Rc;

use chart_geometry::api::{ChartEngine, ChartFamily, ChartSettings};
use chart_geometry::core::DataPoint;
use chart_geometry::error::ChartError;
use chart_geometry::extensions::{ChartEvent, ChartEventListener, EventContext};
use chart_geometry::render::{EmptyStateReason, NullRenderer};

struct Counter {
    events: Rc<RefCell<Vec<ChartEvent>>>,
}

impl ChartEventListener for Counter {
    fn id(&self) -> &str {
        "counter"
    }

    fn on_event(&mut self, event: &ChartEvent, _context: &EventContext) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn bars() -> Vec<DataPoint> {
    vec![
        DataPoint::labeled("north").with_size(12.0),
        DataPoint::labeled("south").with_size(7.5),
        DataPoint::labeled("east").with_size(20.0),
    ]
}

#[test]
fn bar_chart_renders_one_rect_per_bar() {
    let settings = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_listener(Box::new(Counter {
            events: Rc::clone(&events),
        }))
        .expect("register");

    engine.set_data(bars());
    engine.render().expect("render");

    let renderer = engine.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_rect_count, 3);
    assert_eq!(renderer.last_line_count, 2);
    assert!(renderer.last_text_count >= 3);
    assert_eq!(renderer.last_empty_state, None);
    assert_eq!(
        *events.borrow(),
        vec![ChartEvent::DataUpdated { points_len: 3 }, ChartEvent::Rendered]
    );
}

#[test]
fn render_without_size_is_skipped() {
    let mut engine = ChartEngine::new(
        NullRenderer::default(),
        ChartSettings::new(ChartFamily::Bar),
    )
    .expect("engine");
    engine.set_data(bars());

    engine.render().expect("render");
    assert_eq!(engine.renderer().frames_rendered, 0);
    assert!(engine.render_frame().expect("frame").is_none());

    engine.set_container_size(320, 200);
    engine.render().expect("render");
    assert_eq!(engine.renderer().frames_rendered, 1);
    assert_eq!(engine.renderer().last_rect_count, 3);

    engine.set_container_size(0, 200);
    assert!(engine.viewport().is_none());
}

#[test]
fn empty_data_renders_the_no_data_state() {
    let settings = ChartSettings::new(ChartFamily::Scatter).with_size(200, 100);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.render().expect("render");

    let renderer = engine.renderer();
    assert_eq!(renderer.last_empty_state, Some(EmptyStateReason::NoData));
    assert_eq!(renderer.last_text_count, 1);
    assert_eq!(renderer.last_rect_count, 0);
}

#[test]
fn donut_renders_arcs() {
    let settings = ChartSettings::new(ChartFamily::Donut).with_size(300, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(bars());

    let frame = engine.render_frame().expect("frame").expect("sized");
    assert_eq!(frame.arcs.len(), 3);
    assert!(frame.lines.is_empty());
}

#[test]
fn line_chart_draws_one_path_per_color_key() {
    let settings = ChartSettings::new(ChartFamily::Line).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![
        DataPoint::new().with_date("2020-01-01").with_y(1.0).with_color("a"),
        DataPoint::new().with_date("2021-01-01").with_y(2.0).with_color("a"),
        DataPoint::new().with_date("2020-01-01").with_y(4.0).with_color("b"),
        DataPoint::new().with_date("2021-01-01").with_y(3.0).with_color("b"),
    ]);

    let frame = engine.render_frame().expect("frame").expect("sized");
    assert_eq!(frame.paths.len(), 2);
}

#[test]
fn invalid_settings_are_rejected() {
    let cases = [
        ChartSettings::new(ChartFamily::Bar).with_bar_padding(1.0),
        ChartSettings::new(ChartFamily::Bar).with_colors(["not-a-color"]),
        ChartSettings::new(ChartFamily::Bar).with_value_bounds(Some(10.0), Some(1.0)),
        ChartSettings::new(ChartFamily::Bar).with_bar_thickness(Some(20.0), Some(5.0)),
        ChartSettings::new(ChartFamily::Scatter).with_max_radius(-1.0),
        ChartSettings::new(ChartFamily::Bar).with_size(0, 100),
    ];
    for settings in cases {
        let result = ChartEngine::new(NullRenderer::default(), settings);
        assert!(
            matches!(result, Err(ChartError::InvalidSettings(_))),
            "expected invalid settings"
        );
    }
}

#[test]
fn radius_is_checked_even_when_max_radius_is_set() {
    for radius in [0.0, -2.0, f64::NAN] {
        let mut settings = ChartSettings::new(ChartFamily::Scatter).with_max_radius(12.0);
        settings.radius = radius;
        let result = ChartEngine::new(NullRenderer::default(), settings);
        assert!(matches!(result, Err(ChartError::InvalidSettings(_))));
    }
}

#[test]
fn rejected_settings_update_keeps_the_previous_settings() {
    let settings = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings.clone()).expect("engine");
    let bad = settings.clone().with_bar_padding(-0.5);

    assert!(engine.set_settings(bad).is_err());
    assert_eq!(engine.settings(), &settings);
}

#[test]
fn settings_update_rebuilds_the_scene() {
    let settings = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings.clone()).expect("engine");
    engine.set_data(bars());
    assert!(engine.scene().expect("scene").drawn().is_some());

    engine
        .set_settings(ChartSettings::new(ChartFamily::Donut).with_size(400, 300))
        .expect("update");
    let frame = engine.render_frame().expect("frame").expect("sized");
    assert!(frame.rects.is_empty());
    assert_eq!(frame.arcs.len(), 3);
}

#[test]
fn listeners_can_be_unregistered() {
    let settings = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_listener(Box::new(Counter {
            events: Rc::clone(&events),
        }))
        .expect("register");
    assert!(engine.has_listener("counter"));
    assert!(engine.unregister_listener("counter"));
    assert!(!engine.unregister_listener("counter"));
    assert_eq!(engine.listener_count(), 0);

    engine.set_data(bars());
    assert!(events.borrow().is_empty());
}

#[test]
fn value_labels_are_drawn_when_enabled() {
    let plain = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), plain.clone()).expect("engine");
    engine.set_data(bars());
    let without = engine.render_frame().expect("frame").expect("sized");

    engine
        .set_settings(plain.with_show_values(true))
        .expect("update");
    let with = engine.render_frame().expect("frame").expect("sized");

    assert_eq!(with.texts.len(), without.texts.len() + 3);
    assert!(with.texts.iter().any(|text| text.text == "20"));
}
