//! Drive / Waveshaping
//!
//! Drive adds harmonics by reshaping the waveform through a transfer curve
//! stored as a lookup table. The amount of drive picks which curve is built.
//!
//! # The Drive Curve
//!
//! For `k = drive * 100` and `x` spread evenly over [-1, 1]:
//!
//!   curve(x) = ((3 + k) * x * 20°) / (π + k * |x|)
//!
//! where 20° is `20 * π / 180` radians. At `drive = 0` the curve is a gentle
//! straight line (`x * 0.33`). As `k` grows the denominator bends the curve
//! over, so loud input is compressed while quiet input is boosted:
//!
//!   drive   curve(0.1)   curve(1.0)
//!   0.0       0.033        0.333
//!   0.5       0.227        0.348
//!   1.0       0.274        0.349
//!
//! The output never leaves ±0.35 (20° in radians), so the shaper also acts as a
//! limiter on whatever the envelope feeds it.
//!
//! # Table Lookup
//!
//! Entry `i` of a table holds the curve at `x = 2i / len - 1`, so lookup
//! inverts that: `position = (x + 1) * len / 2`, and the two neighbouring
//! entries are linearly interpolated. Silence lands exactly on entry `len / 2`
//! and comes out as silence. Inputs past either end read the end entries.
//!
//! # Oversampling
//!
//! Shaping creates harmonics above Nyquist that fold back as aliasing. With
//! oversampling on, each input sample is split into N linearly interpolated
//! sub-samples, each is shaped, and the N results are averaged back down.

use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in a drive curve.
pub const DRIVE_CURVE_LEN: usize = 44_100;

const DEG: f32 = PI / 180.0;

/// Value of the drive curve at input `x` for a drive amount in [0, 1].
#[inline]
pub fn drive_curve_value(x: f32, drive: f32) -> f32 {
    let k = drive * 100.0;
    ((3.0 + k) * x * 20.0 * DEG) / (PI + k * x.abs())
}

/// Build the full lookup table for `drive`.
pub fn make_drive_curve(drive: f32) -> Vec<f32> {
    let n = DRIVE_CURVE_LEN as f32;
    (0..DRIVE_CURVE_LEN)
        .map(|i| drive_curve_value(i as f32 * 2.0 / n - 1.0, drive))
        .collect()
}

/// Shape one sample through `curve` with linear interpolation. The table is
/// read with the same sampling `make_drive_curve` writes it with.
#[inline]
pub fn shape(curve: &[f32], x: f32) -> f32 {
    match curve.len() {
        0 => x,
        1 => curve[0],
        len => {
            let last = len - 1;
            let position = (x + 1.0) * 0.5 * len as f32;
            if position <= 0.0 {
                return curve[0];
            }
            if position >= last as f32 {
                return curve[last];
            }
            let index = position as usize;
            let frac = position - index as f32;
            let next = (index + 1).min(last);
            curve[index] + (curve[next] - curve[index]) * frac
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Oversample {
    #[default]
    None,
    X2,
    X4,
}

impl Oversample {
    pub fn factor(self) -> usize {
        match self {
            Oversample::None => 1,
            Oversample::X2 => 2,
            Oversample::X4 => 4,
        }
    }
}

/// Lookup-table waveshaper.
pub struct WaveShaper {
    curve: Vec<f32>,
    oversample: Oversample,
    last_input: f32,
}

impl WaveShaper {
    pub fn new(curve: Vec<f32>) -> Self {
        Self {
            curve,
            oversample: Oversample::None,
            last_input: 0.0,
        }
    }

    /// Shaper loaded with the drive curve for `drive`.
    pub fn drive(drive: f32) -> Self {
        Self::new(make_drive_curve(drive))
    }

    pub fn with_oversample(mut self, oversample: Oversample) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn curve(&self) -> &[f32] {
        &self.curve
    }

    pub fn oversample(&self) -> Oversample {
        self.oversample
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        let factor = self.oversample.factor();
        if factor == 1 {
            for sample in buffer.iter_mut() {
                *sample = shape(&self.curve, *sample);
            }
            return;
        }

        let step = 1.0 / factor as f32;
        for sample in buffer.iter_mut() {
            let input = *sample;
            let mut acc = 0.0;
            for j in 1..=factor {
                let sub = self.last_input + (input - self.last_input) * (j as f32 * step);
                acc += shape(&self.curve, sub);
            }
            self.last_input = input;
            *sample = acc * step;
        }
    }

    pub fn reset(&mut self) {
        self.last_input = 0.0;
    }
}
