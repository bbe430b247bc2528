use crate::{
    dsp::filter::{SVFilter, MIN_CUTOFF_HZ},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
State-Variable Filter (SVF)
===========================

Subtractive synthesis starts from a harmonically rich waveform and filters
harmonics away. Every step voice passes through one lowpass; noise voices
also pass through a bandpass first to give the hiss a pitch centre.

Lowpass (LP): Passes frequencies BELOW the cutoff, attenuates above.
  - Higher cutoff = brighter sound
  - Lower cutoff = darker, muffled sound

Bandpass (BP): Passes frequencies AROUND the centre, attenuates both sides.
  - Sweeping the centre of a noise band moves it from rumble to hiss

Parameters:
-----------

Cutoff (Hz): Where the filter takes effect.
  - 200 Hz:    Muffled, like through a wall
  - 1000 Hz:   Warm, round
  - 10000 Hz:  Practically open

Q: Emphasis at the cutoff (LP) or narrowness of the band (BP).
  - 0.707: No peak
  - 1.0:   Slight peak
  - 10+:   Strong ringing

Example usage:
  let dark = OscNode::sawtooth().through(FilterNode::lowpass(800.0));

  let wah = FilterNode::lowpass(1000.0)
      .modulate(LfoNode::sine(2.0), FilterParam::Cutoff, 800.0);
*/

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::from_filter(SVFilter::lowpass(cutoff_hz))
    }

    pub fn bandpass(centre_hz: f32) -> Self {
        Self::from_filter(SVFilter::bandpass(centre_hz))
    }

    fn from_filter(filter: SVFilter) -> Self {
        FilterNode {
            base_cutoff: filter.cutoff_hz,
            filter,
        }
    }

    /// Set the linear Q.
    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.filter.q
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let final_value = base + modulation;
        match param {
            FilterParam::Cutoff => {
                self.base_cutoff = base;
                // The upper bound depends on the sample rate, SVFilter clamps it again
                self.filter.set_cutoff(final_value.max(MIN_CUTOFF_HZ));
            }
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_q_sets_filter_q() {
        let node = FilterNode::lowpass(1_000.0).with_q(2.0);
        assert_eq!(node.q(), 2.0);
    }

    #[test]
    fn cutoff_modulation_keeps_base() {
        let mut node = FilterNode::lowpass(1_000.0);
        node.apply_modulation(FilterParam::Cutoff, 1_000.0, -5_000.0);

        assert_eq!(node.get_param(FilterParam::Cutoff), 1_000.0);
        assert_eq!(node.cutoff(), MIN_CUTOFF_HZ);
    }

    #[test]
    fn renders_finite_output() {
        let mut node = FilterNode::bandpass(4_000.0).with_q(1.0);
        let mut buffer: Vec<f32> = (0..256).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
