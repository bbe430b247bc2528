use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

An oscillator at sub-audio rate, used as a modulator rather than heard.
Step voices use a sine LFO whose output in [-1, +1] is scaled by the note's
LFO depth and added to one parameter:

  // Vibrato: pitch wobbles ±10 Hz at 6 Hz
  OscNode::square().with_frequency(440.0)
      .modulate(LfoNode::sine(6.0), OscParam::Frequency, 10.0);

  // Auto-wah: cutoff sweeps 500 Hz - 1500 Hz at 2 Hz
  FilterNode::lowpass(1000.0)
      .modulate(LfoNode::sine(2.0), FilterParam::Cutoff, 500.0);

  // Tremolo: gain wobbles ±0.1 on top of the envelope
  GainNode::envelope(shape, t0, t0 + 0.12)
      .modulate(LfoNode::sine(8.0), GainParam::Gain, 0.1);

The LFO starts at phase zero when the voice starts, so every step of a
pattern wobbles the same way.
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32,
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::sine(),
            frequency,
        }
    }

    pub fn square(frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::square(),
            frequency,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfo_sine_output_range() {
        let mut lfo = LfoNode::sine(5.0);
        let mut buffer = vec![0.0; 1024];
        lfo.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));

        for &sample in &buffer {
            assert!(
                (-1.0..=1.0).contains(&sample),
                "LFO sine sample {} out of range [-1.0, 1.0]",
                sample
            );
        }
    }

    #[test]
    fn test_lfo_completes_one_cycle_per_period() {
        // 10 Hz at 1 kHz: one cycle every 100 samples
        let mut lfo = LfoNode::sine(10.0);
        let mut buffer = vec![0.0; 101];
        lfo.render_block(&mut buffer, &RenderCtx::new(1_000.0, 0.0));

        assert!((buffer[25] - 1.0).abs() < 1e-3);
        assert!((buffer[75] + 1.0).abs() < 1e-3);
        assert!(buffer[100].abs() < 1e-3);
    }
}
