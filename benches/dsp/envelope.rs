//! Benchmarks for scheduled envelopes.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepgrid::dsp::{automation::ParamTimeline, envelope::EnvelopeShape};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    let shape = EnvelopeShape::new(0.01, 0.1, 0.7, 0.2, 0.2);
    let mut timeline = ParamTimeline::new(0.0);
    shape.schedule(&mut timeline, 0.0, 0.12);

    group.bench_function("schedule", |b| {
        b.iter(|| {
            let mut timeline = ParamTimeline::new(0.0);
            shape.schedule(black_box(&mut timeline), black_box(0.0), black_box(0.12));
            timeline
        })
    });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Inside the attack/decay ramps
        group.bench_with_input(BenchmarkId::new("ramps", size), &size, |b, _| {
            b.iter(|| timeline.render(black_box(&mut buffer), black_box(0.005), SAMPLE_RATE))
        });

        // Past the last event: constant output
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| timeline.render(black_box(&mut buffer), black_box(1.0), SAMPLE_RATE))
        });
    }

    group.finish();
}
