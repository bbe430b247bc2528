use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Audio Sources
=============

A step voice starts from one of two sources:

OscNode: a periodic waveform at a fixed pitch. Each step note carries its own
frequency, so the node does not track any keyboard; the pitch is set once at
construction and may be swept by an LFO through `OscParam::Frequency`.

  Sine:     Fundamental only. Smooth, hollow.
  Sawtooth: Every harmonic, falling off as 1/n. Bright, buzzy.
  Square:   Odd harmonics, falling off as 1/n. Hollow, punchy.
  Triangle: Odd harmonics, falling off as 1/n². Soft.

NoiseNode: a pre-generated buffer of white noise played once from the start.
When the buffer runs out the node outputs silence. Noise has no pitch, so
noise voices colour it with a bandpass instead (see `FilterNode::bandpass`).

Example usage:
  let lead = OscNode::sawtooth()
      .with_frequency(220.0)
      .through(FilterNode::lowpass(2000.0));

  let hat = NoiseNode::new(noise_buffer(9_600, &mut rng))
      .through(FilterNode::bandpass(6_600.0));
*/

/// Lowest and highest frequency a modulated oscillator may reach.
const FREQ_RANGE: (f32, f32) = (20.0, 20_000.0);

pub struct OscNode {
    osc: OscillatorBlock,
    base_frequency: f32,
    /// Frequency after modulation
    current_frequency: f32,
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    /// Oscillator frequency in Hz
    Frequency,
}

impl OscNode {
    pub fn from_waveform(waveform: OscillatorWaveform) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            base_frequency: 440.0,
            current_frequency: 440.0,
        }
    }

    pub fn sine() -> Self {
        Self::from_waveform(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::from_waveform(OscillatorWaveform::Sawtooth)
    }

    pub fn square() -> Self {
        Self::from_waveform(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::from_waveform(OscillatorWaveform::Triangle)
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = freq;
        self.current_frequency = freq;
        self
    }

    pub fn frequency(&self) -> f32 {
        self.current_frequency
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, self.current_frequency, ctx.sample_rate);
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                self.current_frequency = (base + modulation).clamp(FREQ_RANGE.0, FREQ_RANGE.1);
            }
        }
    }
}

/// One-shot buffer source.
pub struct NoiseNode {
    buffer: Vec<f32>,
    position: usize,
}

impl NoiseNode {
    pub fn new(buffer: Vec<f32>) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True once every sample of the buffer has been played.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }
}

impl GraphNode for NoiseNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let start = self.position.min(self.buffer.len());
        let available = (self.buffer.len() - start).min(out.len());

        out[..available].copy_from_slice(&self.buffer[start..start + available]);
        out[available..].fill(0.0);
        self.position += out.len();
    }
}
