#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::OscillatorWaveform;

/// Drive used when a note does not carry its own.
pub const DEFAULT_DRIVE: f32 = 0.5;

/// Sound source of a step note.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    Sawtooth,
    Triangle,
    Noise,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Noise,
    ];

    /// The oscillator shape, or `None` for noise.
    pub fn oscillator(self) -> Option<OscillatorWaveform> {
        match self {
            Waveform::Sine => Some(OscillatorWaveform::Sine),
            Waveform::Square => Some(OscillatorWaveform::Square),
            Waveform::Sawtooth => Some(OscillatorWaveform::Sawtooth),
            Waveform::Triangle => Some(OscillatorWaveform::Triangle),
            Waveform::Noise => None,
        }
    }

    /// Next shape in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
            Waveform::Noise => "noise",
        }
    }
}

/// Parameter an LFO is routed to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoTarget {
    #[default]
    None,
    Freq,
    Vol,
    Filter,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    /// Drive amount in [0, 1]; `None` plays at `DEFAULT_DRIVE`
    #[cfg_attr(feature = "serde", serde(default))]
    pub drive: Option<f32>,
}

impl Adsr {
    pub fn drive(&self) -> f32 {
        self.drive.unwrap_or(DEFAULT_DRIVE)
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.2,
            drive: None,
        }
    }
}

/// Everything a step needs to make a sound.
///
/// Values are not range-checked. The editor keeps `vol`, `sustain`,
/// `noise_tone` and drive in [0, 1] and frequencies positive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    pub vol: f32,
    pub osc: Waveform,
    pub lfo_rate: f32,
    pub lfo_depth: f32,
    pub lfo_target: LfoTarget,
    pub filter_cutoff: f32,
    pub filter_res: f32,
    pub noise_tone: f32,
    pub adsr: Adsr,
}

impl Note {
    /// True when the LFO would actually modulate something.
    pub fn lfo_enabled(&self) -> bool {
        self.lfo_rate > 0.0 && self.lfo_depth > 0.0 && self.lfo_target != LfoTarget::None
    }
}

impl Default for Note {
    fn default() -> Self {
        Self {
            freq: 440.0,
            vol: 0.4,
            osc: Waveform::Square,
            lfo_rate: 0.0,
            lfo_depth: 0.0,
            lfo_target: LfoTarget::None,
            filter_cutoff: 10_000.0,
            filter_res: 0.0,
            noise_tone: 0.5,
            adsr: Adsr::default(),
        }
    }
}
