use chart_geometry::api::{ChartEngine, ChartFamily, ChartSettings};
use chart_geometry::core::{
    DataPoint, DomainOverrides, LinearScale, NumericDomain, Orientation, PlotArea, RadiusPolicy,
    StripArrangement, project_strip,
};
use chart_geometry::interaction::HitTestIndex;
use chart_geometry::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn scattered_points(count: usize) -> Vec<DataPoint> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            DataPoint::labeled(format!("p{i}"))
                .with_x((t * 7.31) % 1_000.0)
                .with_y((t * 3.17) % 400.0)
                .with_position((t * 13.7) % 250.0)
                .with_color(if i % 3 == 0 { "a" } else { "b" })
        })
        .collect()
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let domain = NumericDomain::from_bounds(0.0, 10_000.0).expect("valid domain");
    let scale = LinearScale::from_domain(domain, 1_080.0, 0.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.domain_to_pixel(black_box(4_321.123));
            let _ = scale.pixel_to_domain(px);
        })
    });
}

fn bench_bee_swarm_2k(c: &mut Criterion) {
    let points = scattered_points(2_000);
    let plot = PlotArea::new(40.0, 20.0, 1_500.0, 600.0).expect("plot");

    c.bench_function("bee_swarm_2k", |b| {
        b.iter(|| {
            let _ = project_strip(
                black_box(&points),
                plot,
                Orientation::Horizontal,
                StripArrangement::BeeSwarm,
                RadiusPolicy::Constant(3.0),
                DomainOverrides::none(),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_hit_test_2k(c: &mut Criterion) {
    let anchors: Vec<(usize, f64, f64)> = (0..2_000)
        .map(|i| {
            let t = i as f64;
            (i, (t * 7.31) % 1_600.0, (t * 3.17) % 900.0)
        })
        .collect();

    c.bench_function("hit_test_index_build_2k", |b| {
        b.iter(|| HitTestIndex::build(black_box(anchors.iter().copied())))
    });

    let index = HitTestIndex::build(anchors.iter().copied());
    c.bench_function("hit_test_pointer_sweep", |b| {
        b.iter(|| {
            for step in 0..100 {
                let x = f64::from(step) * 16.0;
                let _ = index.nearest(black_box(x), black_box(450.0));
            }
        })
    });
}

fn bench_scatter_render_frame_2k(c: &mut Criterion) {
    let settings = ChartSettings::new(ChartFamily::Scatter).with_size(1_600, 900);
    let mut engine = ChartEngine::new(NullRenderer::default(), settings).expect("engine init");
    engine.set_data(scattered_points(2_000));

    c.bench_function("scatter_render_frame_2k", |b| {
        b.iter(|| {
            engine.set_container_size(1_600, 900);
            let _ = engine.render_frame().expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_bee_swarm_2k,
    bench_hit_test_2k,
    bench_scatter_render_frame_2k
);
criterion_main!(benches);
