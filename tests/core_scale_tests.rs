use approx::assert_relative_eq;
use chrono::{Datelike, Timelike};
use chart_geometry::core::{
    BandScale, DomainOverrides, LinearScale, NumericDomain, SqrtScale, ThicknessLimits, TimeScale,
    parse_date,
};
use proptest::prelude::*;

fn domain_of(values: &[f64]) -> NumericDomain {
    NumericDomain::zero_anchored(values.iter().copied().map(Some), DomainOverrides::none())
        .expect("domain")
}

#[test]
fn positive_values_anchor_at_zero() {
    let domain = domain_of(&[3.0, 7.0]);
    assert_eq!((domain.min, domain.max), (0.0, 7.0));
}

#[test]
fn negative_values_anchor_at_zero_from_above() {
    let domain = domain_of(&[-5.0, -2.0]);
    assert_eq!((domain.min, domain.max), (-5.0, 0.0));
}

#[test]
fn mixed_signs_use_observed_extent() {
    let domain = domain_of(&[-3.0, 4.0]);
    assert_eq!((domain.min, domain.max), (-3.0, 4.0));
}

#[test]
fn overrides_replace_derived_bounds() {
    let overrides = DomainOverrides {
        min_value: None,
        max_value: Some(50.0),
    };
    let domain = NumericDomain::zero_anchored([Some(3.0), Some(7.0)], overrides).expect("domain");
    assert_eq!((domain.min, domain.max), (0.0, 50.0));
}

#[test]
fn all_zero_values_are_padded() {
    let domain = domain_of(&[0.0, 0.0]);
    assert_eq!((domain.min, domain.max), (0.0, 1.0));
}

#[test]
fn missing_and_non_finite_values_are_ignored() {
    let domain = NumericDomain::zero_anchored(
        [None, Some(f64::NAN), Some(4.0), Some(f64::INFINITY)],
        DomainOverrides::none(),
    )
    .expect("domain");
    assert_eq!((domain.min, domain.max), (0.0, 4.0));
    assert!(NumericDomain::zero_anchored([None, None], DomainOverrides::none()).is_none());
}

#[test]
fn linear_scale_maps_reversed_ranges() {
    let scale = LinearScale::new(0.0, 100.0, 400.0, 0.0).expect("scale");
    assert_relative_eq!(scale.domain_to_pixel(0.0), 400.0);
    assert_relative_eq!(scale.domain_to_pixel(25.0), 300.0);
    assert_relative_eq!(scale.pixel_to_domain(100.0), 75.0);
}

#[test]
fn degenerate_linear_domain_is_rejected() {
    assert!(LinearScale::new(5.0, 5.0, 0.0, 100.0).is_err());
    assert!(LinearScale::new(0.0, f64::NAN, 0.0, 100.0).is_err());
}

#[test]
fn nice_extends_to_round_ticks() {
    let scale = LinearScale::new(0.0, 97.0, 0.0, 500.0)
        .expect("scale")
        .nice(5);
    assert_eq!(scale.domain(), (0.0, 100.0));
    assert_eq!(
        scale.ticks(5),
        vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]
    );
}

#[test]
fn sqrt_scale_keeps_area_proportional() {
    let scale = SqrtScale::new(100.0, 0.0, 20.0).expect("scale");
    let small = scale.map(25.0);
    let large = scale.map(100.0);
    assert_relative_eq!(large * large / (small * small), 4.0, epsilon = 1e-9);
    assert_eq!(scale.map(-3.0), 0.0);
}

#[test]
fn band_scale_centers_are_evenly_spaced() {
    let band = BandScale::new(4, 0.0, 400.0, 0.25, ThicknessLimits::default()).expect("band");
    assert_relative_eq!(band.step(), 100.0);
    assert_relative_eq!(band.thickness(), 75.0);
    assert_relative_eq!(band.center(0).expect("center"), 50.0);
    assert_relative_eq!(band.center(3).expect("center"), 350.0);
    assert_eq!(band.center(4), None);
    assert_eq!(band.index_at(260.0), Some(2));
}

#[test]
fn band_thickness_is_clamped_without_moving_centers() {
    let limits = ThicknessLimits {
        min: None,
        max: Some(20.0),
    };
    let band = BandScale::new(4, 0.0, 400.0, 0.25, limits).expect("band");
    assert_relative_eq!(band.raw_thickness(), 75.0);
    assert_relative_eq!(band.thickness(), 20.0);
    assert_relative_eq!(band.start(1).expect("start"), 140.0);
}

#[test]
fn band_scale_rejects_invalid_padding() {
    assert!(BandScale::new(3, 0.0, 300.0, 1.0, ThicknessLimits::default()).is_err());
    assert!(BandScale::new(0, 0.0, 300.0, 0.1, ThicknessLimits::default()).is_err());
}

#[test]
fn time_scale_round_trips_dates() {
    let start = parse_date("2020-01-01", "%Y-%m-%d").expect("start");
    let end = parse_date("2020-12-31", "%Y-%m-%d").expect("end");
    let middle = parse_date("2020-07-01", "%Y-%m-%d").expect("middle");
    let scale = TimeScale::new(start, end, 0.0, 1000.0).expect("scale");

    assert_relative_eq!(scale.time_to_pixel(start), 0.0);
    assert_relative_eq!(scale.time_to_pixel(end), 1000.0);
    let pixel = scale.time_to_pixel(middle);
    assert_eq!(scale.pixel_to_time(pixel).expect("time"), middle);
}

#[test]
fn single_date_time_scale_is_padded() {
    let date = parse_date("2021-03-04", "%Y-%m-%d").expect("date");
    let scale = TimeScale::from_dates(&[date], 0.0, 100.0).expect("scale");
    assert_relative_eq!(scale.time_to_pixel(date), 50.0);
}

#[test]
fn yearly_dates_get_january_first_ticks() {
    let start = parse_date("2000-01-01", "%Y-%m-%d").expect("start");
    let end = parse_date("2010-01-01", "%Y-%m-%d").expect("end");
    let scale = TimeScale::new(start, end, 0.0, 1000.0).expect("scale");

    let ticks = scale.ticks(5).expect("ticks");
    let years: Vec<i32> = ticks.iter().map(|tick| tick.year()).collect();
    assert_eq!(years, [2000, 2002, 2004, 2006, 2008, 2010]);
    assert!(ticks.iter().all(|tick| tick.ordinal() == 1 && tick.hour() == 0));
}

#[test]
fn monthly_dates_get_quarter_ticks_on_the_first() {
    let start = parse_date("2020-01-15", "%Y-%m-%d").expect("start");
    let end = parse_date("2020-12-01", "%Y-%m-%d").expect("end");
    let scale = TimeScale::new(start, end, 0.0, 1000.0).expect("scale");

    let ticks = scale.ticks(4).expect("ticks");
    let months: Vec<u32> = ticks.iter().map(|tick| tick.month()).collect();
    assert_eq!(months, [4, 7, 10]);
    assert!(ticks.iter().all(|tick| tick.day() == 1 && tick.hour() == 0));
}

#[test]
fn short_spans_tick_on_whole_hours() {
    let start = parse_date("2021-03-04 01:20", "%Y-%m-%d %H:%M").expect("start");
    let end = parse_date("2021-03-04 13:40", "%Y-%m-%d %H:%M").expect("end");
    let scale = TimeScale::new(start, end, 0.0, 1000.0).expect("scale");

    let ticks = scale.ticks(5).expect("ticks");
    let hours: Vec<u32> = ticks.iter().map(|tick| tick.hour()).collect();
    assert_eq!(hours, [3, 6, 9, 12]);
    assert!(ticks.iter().all(|tick| tick.minute() == 0 && tick.second() == 0));
}

proptest! {
    #[test]
    fn non_negative_values_always_include_zero(
        values in prop::collection::vec(0.0f64..1e6, 1..32)
    ) {
        let domain = domain_of(&values);
        prop_assert_eq!(domain.min, 0.0);
        let max = values.iter().copied().fold(0.0, f64::max);
        prop_assert!(domain.max >= max);
    }

    #[test]
    fn non_positive_values_always_include_zero(
        values in prop::collection::vec(-1e6f64..=0.0, 1..32)
    ) {
        let domain = domain_of(&values);
        prop_assert_eq!(domain.max, 0.0);
        prop_assert!(domain.min <= values.iter().copied().fold(0.0, f64::min));
    }

    #[test]
    fn linear_scale_round_trip_within_tolerance(
        lo in -1e6f64..1e6,
        span in 1e-3f64..1e6,
        value_factor in 0.0f64..1.0,
        range_end in 10.0f64..4000.0
    ) {
        let hi = lo + span;
        let scale = LinearScale::new(lo, hi, range_end, 0.0).expect("scale");
        let value = lo + span * value_factor;
        let recovered = scale.pixel_to_domain(scale.domain_to_pixel(value));
        prop_assert!((recovered - value).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn ticks_stay_inside_the_domain(
        lo in -1e5f64..1e5,
        span in 1e-2f64..1e5,
        count in 1usize..12
    ) {
        let scale = LinearScale::new(lo, lo + span, 0.0, 100.0).expect("scale");
        let ticks = scale.ticks(count);
        let tolerance = span * 1e-9;
        for tick in &ticks {
            prop_assert!(*tick >= lo - tolerance && *tick <= lo + span + tolerance);
        }
        for pair in ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
