use crate::dsp::distortion::{Oversample, WaveShaper};
use crate::graph::node::{GraphNode, RenderCtx};

/*
WaveShaper Node
===============

Drive stage at the end of a step voice, right before the output. The curve
is rebuilt from the note's drive amount every time a voice is made, and the
shaper runs 4× oversampled in voices.

Drive (0.0 - 1.0):
  0.0 = almost linear, about a third of the input level
  0.5 = default, quiet input boosted, loud input flattened
  1.0 = hard knee, most of the input range lands near ±0.35

Example usage:

  let voice = OscNode::sawtooth()
      .with_frequency(110.0)
      .through(FilterNode::lowpass(1200.0))
      .through(GainNode::envelope(shape, t0, t0 + 0.12))
      .through(WaveShaperNode::drive(0.5).with_oversample(Oversample::X4));
*/

pub struct WaveShaperNode {
    shaper: WaveShaper,
    drive: f32,
}

impl WaveShaperNode {
    pub fn drive(drive: f32) -> Self {
        Self {
            shaper: WaveShaper::drive(drive),
            drive,
        }
    }

    pub fn with_oversample(mut self, oversample: Oversample) -> Self {
        self.shaper = self.shaper.with_oversample(oversample);
        self
    }

    pub fn drive_amount(&self) -> f32 {
        self.drive
    }

    pub fn oversample(&self) -> Oversample {
        self.shaper.oversample()
    }
}

impl GraphNode for WaveShaperNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.shaper.process(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::distortion::drive_curve_value;

    #[test]
    fn silence_stays_silent() {
        let mut node = WaveShaperNode::drive(0.5).with_oversample(Oversample::X4);
        let mut buffer = vec![0.0f32; 64];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn shapes_through_drive_curve() {
        let mut node = WaveShaperNode::drive(0.2);
        let mut buffer = vec![0.3f32, -0.3];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));

        let expected = drive_curve_value(0.3, 0.2);
        assert!((buffer[0] - expected).abs() < 1e-3);
        assert!((buffer[1] + expected).abs() < 1e-3);
    }
}
