//! Benchmarks for the drive stage.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepgrid::dsp::distortion::{make_drive_curve, Oversample, WaveShaper};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    // Every voice builds its own 44 100-point curve
    group.bench_function("make_drive_curve", |b| {
        b.iter(|| make_drive_curve(black_box(0.5)))
    });

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for (name, oversample) in [("shape", Oversample::None), ("shape_4x", Oversample::X4)] {
            let mut shaper = WaveShaper::drive(0.5).with_oversample(oversample);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    shaper.process(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
