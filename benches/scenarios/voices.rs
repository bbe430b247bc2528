//! Benchmarks for step voices.
//!
//! Each voice is built the way the audio context builds it: a resolved plan
//! turned into source → lowpass → envelope gain → 4x drive.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};
use stepgrid::{
    voice::{LfoTarget, Note, ScheduledVoice, VoicePlan, Waveform},
    MAX_BLOCK_SIZE,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Gate long enough that the voice never ends inside a benchmark
const BASE_DURATION: f32 = 3600.0;

fn voice(note: &Note) -> ScheduledVoice {
    let plan = VoicePlan::new(note, BASE_DURATION, 0.0, SAMPLE_RATE);
    ScheduledVoice::from_plan(&plan, SAMPLE_RATE, &mut SmallRng::seed_from_u64(1))
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    let square = Note::default();
    let wobble = Note {
        osc: Waveform::Sawtooth,
        freq: 110.0,
        filter_cutoff: 800.0,
        filter_res: 6.0,
        lfo_rate: 4.0,
        lfo_depth: 600.0,
        lfo_target: LfoTarget::Filter,
        ..Note::default()
    };
    let hat = Note {
        osc: Waveform::Noise,
        noise_tone: 0.9,
        ..Note::default()
    };

    group.bench_function("build", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        let plan = VoicePlan::new(&square, 0.12, 0.0, SAMPLE_RATE);
        b.iter(|| ScheduledVoice::from_plan(black_box(&plan), SAMPLE_RATE, &mut rng))
    });

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];

        for (name, note) in [("square", &square), ("filter_lfo", &wobble), ("noise", &hat)] {
            let mut voice = voice(note);
            let mut frame = 0u64;
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.fill(0.0);
                    voice.render(black_box(&mut buffer), &mut scratch, frame, SAMPLE_RATE);
                    frame += size as u64;
                })
            });
        }
    }

    group.finish();
}
