use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | output tap | passes             | rejects            | Q means          |
| --------- | ---------- | ------------------ | ------------------ | ---------------- |
| low-pass  | v2         | below cutoff       | above cutoff       | peak at cutoff   |
| band-pass | v1         | around the centre  | either side        | width of band    |

The lowpass takes its resonance in decibels (`q_from_db`), the bandpass takes
a plain linear Q. `k = 1 / Q` is the damping of the state-variable core.
*/

/// Lowest cutoff the filter will accept, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 10.0;
/// Cutoff ceiling as a fraction of the sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.49;
const MIN_Q: f32 = 0.01;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
}

/// Linear Q for a resonance given in dB.
#[inline]
pub fn q_from_db(resonance_db: f32) -> f32 {
    10f32.powf(resonance_db / 20.0)
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz: 1000.0,
            q: 1.0,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            ..Self::new(FilterType::LowPass)
        }
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self {
            cutoff_hz,
            ..Self::new(FilterType::BandPass)
        }
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    #[inline]
    pub fn compute_g(cutoff_hz: f32, sample_rate: f32) -> f32 {
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, sample_rate * MAX_CUTOFF_RATIO);
        let wd = TAU * cutoff;
        let wa = (2.0 * sample_rate) * (wd / (2.0 * sample_rate)).tan();
        wa / (2.0 * sample_rate)
    }

    #[inline]
    pub fn damping(q: f32) -> f32 {
        1.0 / q.max(MIN_Q)
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
        }
    }

    /// Filter one sample with coefficients computed from the current settings.
    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let g = Self::compute_g(self.cutoff_hz, sample_rate);
        let k = Self::damping(self.q);
        self.tap(sample, k, g)
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = Self::compute_g(self.cutoff_hz, sample_rate);
        let k = Self::damping(self.q);

        for sample in buffer.iter_mut() {
            *sample = self.tap(*sample, k, g);
        }
    }

    #[inline]
    fn tap(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let outputs = self.next_sample(sample, k, g);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::BandPass => outputs.bandpass,
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }
}
