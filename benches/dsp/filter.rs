//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepgrid::dsp::filter::{q_from_db, SVFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass(1000.0);
        filter.set_q(q_from_db(6.0));
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });

        let mut filter = SVFilter::bandpass(4200.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("bandpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
