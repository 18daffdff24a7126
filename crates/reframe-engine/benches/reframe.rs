//! Reframing Benchmarks
//!
//! # Running Benchmarks
//! ```bash
//! cargo bench --package reframe-engine --bench reframe
//! ```
//!
//! # Metrics Measured
//! - Per-frame pipeline throughput (tracking and split layouts)
//! - Compositor cost per layout
//! - Smoother step cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use reframe_engine::compositor::Compositor;
use reframe_engine::detector::FnDetector;
use reframe_engine::smoother::AdaptiveSmoother;
use reframe_engine::{
    Detection, DetectorBackend, FaceDetector, FrameSize, ReframeConfig, ReframeResult, Reframer,
    SourceInfo, TrackRole, ViewState,
};
use std::time::Duration;

/// Synthetic frame with some texture so resampling does real work.
fn create_test_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 7 + y * 11) % 256) as u8,
            ((x * 13 + y * 17) % 256) as u8,
            ((x * 19 + y * 23) % 256) as u8,
        ])
    })
}

/// Detector returning fixed boxes, so only the engine is measured.
fn fixed_factory(
    faces: Vec<Detection>,
) -> impl Fn(DetectorBackend) -> ReframeResult<Box<dyn FaceDetector>> {
    move |_backend| {
        let faces = faces.clone();
        Ok(Box::new(FnDetector::new("fixed", move |_f: &RgbImage, _t: u64| {
            Ok(faces.clone())
        })) as Box<dyn FaceDetector>)
    }
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));

    let cases = [
        ("tracking", vec![Detection::new(900.0, 540.0, 320.0, 320.0)]),
        (
            "split",
            vec![
                Detection::new(400.0, 540.0, 300.0, 300.0),
                Detection::new(1500.0, 540.0, 300.0, 300.0),
            ],
        ),
    ];

    for (name, faces) in cases {
        let frame = create_test_frame(1920, 1080);
        let factory = fixed_factory(faces);
        let config = ReframeConfig {
            detection_skip_interval: 1,
            mode_history_size: 1,
            ..Default::default()
        };
        let mut reframer =
            Reframer::new(config, SourceInfo::new(1920, 1080, 30.0), &factory).unwrap();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("push_frame", name), &frame, |b, frame| {
            b.iter(|| {
                let out = reframer.push_frame(black_box(frame.clone())).unwrap();
                black_box(out)
            })
        });
    }

    group.finish();
}

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");

    for (width, height) in [(1920, 1080), (1280, 720)] {
        let frame = create_test_frame(width, height);
        let compositor = Compositor::new(&ReframeConfig::default(), FrameSize::new(width, height));
        let label = format!("{}x{}", width, height);
        let center = width as f64 / 2.0;

        group.bench_with_input(BenchmarkId::new("tracking", &label), &frame, |b, frame| {
            b.iter(|| compositor.render_single(black_box(frame), center, ViewState::default()))
        });

        let wide = ViewState {
            transition: 0.6,
            zoom_out: 0.0,
        };
        group.bench_with_input(BenchmarkId::new("cinematic", &label), &frame, |b, frame| {
            b.iter(|| compositor.render_single(black_box(frame), center, wide))
        });

        group.bench_with_input(BenchmarkId::new("split", &label), &frame, |b, frame| {
            b.iter(|| {
                compositor.render_split(black_box(frame), width as f64 * 0.25, width as f64 * 0.75)
            })
        });
    }

    group.finish();
}

fn bench_smoother(c: &mut Criterion) {
    c.bench_function("smoother_step", |b| {
        let mut smoother = AdaptiveSmoother::new(&ReframeConfig::default());
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            let target = 960.0 + 400.0 * (i as f64 / 10.0).sin();
            black_box(smoother.smooth(TrackRole::Main, black_box(target)))
        })
    });
}

criterion_group!(benches, bench_pipeline, bench_compositor, bench_smoother);
criterion_main!(benches);
