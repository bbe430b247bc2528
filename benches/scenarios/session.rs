//! Benchmarks for whole-session blocks: transport, voice scheduling and
//! rendering together, as the audio callback runs them.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stepgrid::{
    engine::AudioContext,
    io::OfflineDevice,
    sequencing::Session,
    voice::Waveform,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Every step of every track filled, one shape per track.
fn busy_session() -> Session {
    let mut session = Session::default();
    let shapes = [Waveform::Square, Waveform::Sawtooth, Waveform::Sine, Waveform::Noise];
    for (track, shape) in shapes.into_iter().enumerate() {
        session.controls_mut().osc = shape;
        for step in 0..session.store().steps() {
            let _ = session.toggle_step(track, step);
        }
    }
    session
}

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut session = busy_session();
        let mut ctx = AudioContext::with_seed(SAMPLE_RATE, Some(1));
        session.play(&mut OfflineDevice);

        group.bench_with_input(BenchmarkId::new("full_pattern", size), &size, |b, _| {
            b.iter(|| session.process_block(&mut ctx, black_box(&mut buffer)))
        });
    }

    group.finish();
}
