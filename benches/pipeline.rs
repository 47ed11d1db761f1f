//! Benchmarks for the per-frame pipeline.
//!
//! Run with: cargo bench
//!
//! To compare against baseline:
//! 1. First run: cargo bench -- --save-baseline main
//! 2. After changes: cargo bench -- --baseline main

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rep_engine::{
    analysis::VisibilityGate,
    config::EngineConfig,
    detection::{transition, MachineState, Observation, RepThresholds},
    extraction::{AngleExtractor, SidePolicy},
    pose::{push_up_trace, synthetic, Frame, Side},
    session::{ManualClock, Session},
};
use std::time::Duration;

const FPS: u32 = 30;

fn push_up_frames(reps: u32) -> Vec<Frame> {
    push_up_trace(reps, FPS, Duration::from_secs(6))
        .into_iter()
        .enumerate()
        .map(|(i, angle)| synthetic::sequenced(angle, Side::Left, 0.95, i as u64))
        .collect()
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let frame = synthetic::frame_with_elbow_angle(110.0, Side::Left, 0.95);

    let gate = VisibilityGate::new(Default::default());
    group.bench_function("visibility_gate", |b| {
        b.iter(|| gate.evaluate(black_box(&frame)))
    });

    let mut extractor = AngleExtractor::new(SidePolicy::PerFrame);
    group.bench_function("angle_extraction", |b| {
        b.iter(|| extractor.extract(black_box(&frame)))
    });

    let thresholds = RepThresholds::default();
    let state = MachineState::new(Duration::ZERO);
    let now = Duration::from_secs(10);
    group.bench_function("transition", |b| {
        b.iter(|| transition(black_box(&state), Observation::Tracked(110.0), now, &thresholds))
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let interval = Duration::from_secs_f64(1.0 / f64::from(FPS));

    for reps in [1u32, 10, 50] {
        let frames = push_up_frames(reps);
        group.throughput(Throughput::Elements(frames.len() as u64));

        group.bench_with_input(BenchmarkId::new("process", reps), &frames, |b, frames| {
            b.iter(|| {
                let clock = ManualClock::default();
                let Ok(mut session) = Session::start(&EngineConfig::default(), clock.clone())
                else {
                    return 0;
                };
                for frame in frames {
                    clock.advance(interval);
                    session.tick();
                    black_box(session.process(frame));
                }
                let count = session.count();
                session.cancel();
                count
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stages, bench_session);
criterion_main!(benches);
