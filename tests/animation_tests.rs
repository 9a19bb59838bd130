use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use chart_geometry::animation::{AnimationController, PLAYBACK_TICK, PlaybackState};
use chart_geometry::api::{ChartEngine, ChartFamily, ChartSettings, SceneGeometry};
use chart_geometry::core::{DataPoint, parse_date};
use chart_geometry::extensions::{ChartEvent, ChartEventListener, EventContext};
use chart_geometry::render::NullRenderer;
use chrono::NaiveDateTime;
use proptest::prelude::*;

fn date(raw: &str) -> NaiveDateTime {
    parse_date(raw, "%Y-%m-%d").expect("date")
}

fn three_dates() -> Vec<NaiveDateTime> {
    vec![date("2020-01-01"), date("2021-01-01"), date("2022-01-01")]
}

struct Recorder {
    events: Rc<RefCell<Vec<ChartEvent>>>,
}

impl ChartEventListener for Recorder {
    fn id(&self) -> &str {
        "recorder"
    }

    fn on_event(&mut self, event: &ChartEvent, _context: &EventContext) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[test]
fn auto_play_starts_playing_at_the_first_date() {
    let controller = AnimationController::new(three_dates(), true);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current_index(), 0);
    assert!(controller.timer().is_some());
}

#[test]
fn without_auto_play_the_last_date_is_shown_paused() {
    let controller = AnimationController::new(three_dates(), false);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_date(), Some(date("2022-01-01")));
    assert!(controller.timer().is_none());
}

#[test]
fn dates_are_sorted_and_deduplicated() {
    let mut dates = three_dates();
    dates.reverse();
    dates.push(date("2021-01-01"));
    let controller = AnimationController::new(dates, false);
    assert_eq!(controller.dates(), three_dates().as_slice());
}

#[test]
fn ticks_advance_and_wrap_around() {
    let mut controller = AnimationController::new(three_dates(), true);
    assert!(!controller.advance(Duration::from_millis(1999)));
    assert_eq!(controller.current_index(), 0);
    assert!(controller.advance(Duration::from_millis(1)));
    assert_eq!(controller.current_index(), 1);
    assert!(controller.advance(PLAYBACK_TICK));
    assert_eq!(controller.current_index(), 2);
    assert!(controller.advance(PLAYBACK_TICK));
    assert_eq!(controller.current_index(), 0);
}

#[test]
fn whole_loops_keep_the_active_date_and_the_remainder() {
    let mut controller = AnimationController::new(three_dates(), true);
    assert!(!controller.advance(PLAYBACK_TICK * 3 + Duration::from_millis(500)));
    assert_eq!(controller.current_index(), 0);
    let timer = controller.timer().expect("timer");
    assert_eq!(timer.remaining(), Duration::from_millis(1500));
    assert!(controller.advance(Duration::from_millis(1500)));
    assert_eq!(controller.current_index(), 1);
}

#[test]
fn huge_host_stalls_saturate_instead_of_overflowing() {
    let mut controller = AnimationController::new(three_dates(), true);
    let ticks = Duration::MAX.as_nanos() / PLAYBACK_TICK.as_nanos();
    let expected = (ticks % 3) as usize;
    assert_eq!(controller.advance(Duration::MAX), expected != 0);
    assert_eq!(controller.current_index(), expected);

    controller.advance(Duration::MAX);
    assert!(controller.current_index() < 3);
    let timer = controller.timer().expect("timer");
    assert!(timer.remaining() <= PLAYBACK_TICK);
}

#[test]
fn paused_controller_ignores_time() {
    let mut controller = AnimationController::new(three_dates(), false);
    assert!(!controller.advance(PLAYBACK_TICK * 5));
    assert_eq!(controller.current_index(), 2);
}

#[test]
fn scrub_snaps_to_the_nearest_date() {
    let mut controller = AnimationController::new(three_dates(), false);
    assert_eq!(controller.scrub_to(date("2020-11-20")), Some(1));
    assert_eq!(controller.scrub_to(date("2019-01-01")), Some(0));
    assert_eq!(controller.scrub_to(date("2030-01-01")), Some(2));
    // 2021-07-02 12:00 is equidistant; ties pick the earlier date.
    let midpoint = NaiveDateTime::parse_from_str("2021-07-02 12:00:00", "%Y-%m-%d %H:%M:%S")
        .expect("midpoint");
    assert_eq!(controller.scrub_to(midpoint), Some(1));
}

#[test]
fn scrub_to_index_clamps_and_restarts_the_tick() {
    let mut controller = AnimationController::new(three_dates(), true);
    assert!(!controller.advance(Duration::from_millis(1500)));
    assert_eq!(controller.scrub_to_index(10), 2);
    let timer = controller.timer().expect("timer");
    assert_eq!(timer.remaining(), PLAYBACK_TICK);
}

#[test]
fn toggle_play_flips_state() {
    let mut controller = AnimationController::new(three_dates(), false);
    assert_eq!(controller.toggle_play(), PlaybackState::Playing);
    assert_eq!(controller.toggle_play(), PlaybackState::Paused);
}

#[test]
fn empty_timeline_never_plays() {
    let mut controller = AnimationController::new(Vec::new(), true);
    assert_eq!(controller.state(), PlaybackState::Paused);
    assert_eq!(controller.current_date(), None);
    assert_eq!(controller.scrub_to(date("2020-01-01")), None);
}

#[test]
fn timer_is_cancelled_after_dispose() {
    let mut controller = AnimationController::new(three_dates(), true);
    controller.dispose();
    assert!(controller.timer().is_none());
    assert!(controller.is_disposed());
    controller.play();
    assert!(controller.timer().is_none());
    assert!(!controller.advance(PLAYBACK_TICK * 3));
    assert_eq!(controller.current_index(), 0);
}

fn dated_bars() -> Vec<DataPoint> {
    vec![
        DataPoint::labeled("a").with_size(1.0).with_date("2020-01-01"),
        DataPoint::labeled("b").with_size(2.0).with_date("2021-01-01"),
        DataPoint::labeled("c").with_size(3.0).with_date("2022-01-01"),
        DataPoint::labeled("d").with_size(4.0).with_date("2022-01-01"),
    ]
}

fn bar_count<R: chart_geometry::render::Renderer>(engine: &mut ChartEngine<R>) -> usize {
    match &engine.scene().expect("scene").drawn().expect("drawn").geometry {
        SceneGeometry::Bars(projection) => projection.bars.len(),
        other => panic!("unexpected geometry {other:?}"),
    }
}

#[test]
fn engine_draws_points_up_to_the_active_date() {
    let settings = ChartSettings::new(ChartFamily::Bar).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(dated_bars());
    assert_eq!(bar_count(&mut engine), 4);

    engine.scrub_to(date("2020-06-01"));
    assert_eq!(engine.active_date(), Some(date("2020-01-01")));
    assert_eq!(bar_count(&mut engine), 1);
}

#[test]
fn engine_can_show_only_the_active_date() {
    let settings = ChartSettings::new(ChartFamily::Bar)
        .with_size(400, 300)
        .with_show_only_active_date(true);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(dated_bars());
    assert_eq!(bar_count(&mut engine), 2);

    let indices = engine.active_point_indices().expect("time filtered");
    assert_eq!(indices, vec![2, 3]);
}

#[test]
fn engine_playback_emits_date_and_state_events() {
    let settings = ChartSettings::new(ChartFamily::Bar)
        .with_size(400, 300)
        .with_auto_play(true);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    let events = Rc::new(RefCell::new(Vec::new()));
    engine
        .register_listener(Box::new(Recorder {
            events: Rc::clone(&events),
        }))
        .expect("register");
    engine.set_data(dated_bars());
    assert_eq!(engine.playback_state(), PlaybackState::Playing);
    assert_eq!(engine.animation().current_index(), 0);

    assert!(engine.advance(PLAYBACK_TICK));
    engine.pause();
    engine.dispose();
    engine.play();
    assert_eq!(engine.playback_state(), PlaybackState::Paused);

    let events = events.borrow();
    assert!(events.contains(&ChartEvent::ActiveDateChanged {
        index: 1,
        date: date("2021-01-01"),
    }));
    assert!(events.contains(&ChartEvent::PlaybackChanged(PlaybackState::Paused)));
    assert!(!events.contains(&ChartEvent::PlaybackChanged(PlaybackState::Playing)));
}

#[test]
fn line_charts_are_not_filtered_by_date() {
    let settings = ChartSettings::new(ChartFamily::Line).with_size(400, 300);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine");
    engine.set_data(vec![
        DataPoint::new().with_y(1.0).with_date("2020-01-01"),
        DataPoint::new().with_y(2.0).with_date("2021-01-01"),
    ]);
    engine.scrub_to_index(0);
    assert!(engine.active_point_indices().is_none());
}

proptest! {
    #[test]
    fn index_always_stays_in_bounds(
        count in 1usize..20,
        steps in prop::collection::vec(0u64..10_000, 1..30)
    ) {
        let base = date("2000-01-01");
        let dates = (0..count).map(|day| base + chrono::Duration::days(day as i64));
        let mut controller = AnimationController::new(dates, true);
        let mut total_ticks = 0u64;
        let mut carry = 0u64;
        for millis in steps {
            controller.advance(Duration::from_millis(millis));
            carry += millis;
            total_ticks += carry / 2000;
            carry %= 2000;
            prop_assert!(controller.current_index() < count);
        }
        prop_assert_eq!(controller.current_index() as u64, total_ticks % count as u64);
    }
}
