use std::f32::consts::TAU;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Oscillator Math
===============

Every periodic waveform here is driven by a phase accumulator: a number in
[0, 1) that advances by `frequency / sample_rate` every sample and wraps.
The waveform is then a pure function of the phase.

  phase   0.0        0.25        0.5        0.75        1.0
  sine    0 ──────── +1 ──────── 0 ──────── -1 ──────── 0
  square  +1 ─────────────────── -1 ─────────────────── (+1)
  saw     0 ─────────────────── +1|-1 ───────────────── 0
  tri     0 ──────── +1 ──────── 0 ──────── -1 ──────── 0

Sine, saw and triangle start at 0; square starts at +1. The envelope opens
from silence, so none of them click on a voice's first sample. Shapes are naive (not
band-limited); the lowpass after the source tames the aliasing at the
frequencies a step sequencer uses.

Noise is not periodic, so it is generated up front into a buffer that a
buffer source plays once. The generator is any `rand::Rng`, which lets tests
seed it and get identical renders.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Sawtooth,
    Square,
    Triangle,
}

impl OscillatorWaveform {
    /// Waveform value at `phase` in [0, 1).
    #[inline]
    pub fn value_at(self, phase: f32) -> f32 {
        match self {
            OscillatorWaveform::Sine => (TAU * phase).sin(),
            OscillatorWaveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Sawtooth => {
                let shifted = phase + 0.5;
                2.0 * (shifted - shifted.floor()) - 1.0
            }
            OscillatorWaveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Sawtooth)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = self.waveform.value_at(self.phase);
        self.phase += frequency / sample_rate;
        self.phase -= self.phase.floor();
        value
    }

    /// Fill `out` at a fixed frequency, continuing from the current phase.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Fill `buffer` with uniform white noise in [-1, 1].
pub fn fill_noise<R: Rng + ?Sized>(buffer: &mut [f32], rng: &mut R) {
    for sample in buffer.iter_mut() {
        *sample = rng.gen_range(-1.0f32..=1.0);
    }
}

/// Allocate and fill a noise buffer of `len` samples.
pub fn noise_buffer<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    let mut buffer = vec![0.0; len];
    fill_noise(&mut buffer, rng);
    buffer
}
