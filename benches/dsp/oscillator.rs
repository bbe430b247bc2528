//! Benchmarks for oscillators and the noise source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use stepgrid::dsp::oscillator::{fill_noise, OscillatorBlock};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, mut osc) in [
            ("sine", OscillatorBlock::sine()),
            ("square", OscillatorBlock::square()),
            ("sawtooth", OscillatorBlock::sawtooth()),
            ("triangle", OscillatorBlock::triangle()),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), SAMPLE_RATE))
            });
        }

        let mut rng = SmallRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| fill_noise(black_box(&mut buffer), &mut rng))
        });
    }

    group.finish();
}
