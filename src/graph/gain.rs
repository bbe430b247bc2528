use crate::{
    dsp::{automation::ParamTimeline, envelope::EnvelopeShape},
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Gain Node
=========

Multiplies the signal by an automated gain. The gain follows a
`ParamTimeline` read at the block's clock time, so a voice scheduled in the
future stays silent until its envelope starts.

  input  ──→ (×) ──→ output
              ↑
     timeline value at t  +  modulation offset

Modulation is additive: the parameter's base is 0 and an LFO routed at
`GainParam::Gain` adds `lfo × depth` on top of the envelope.
*/

#[derive(Clone, Copy, Debug)]
pub enum GainParam {
    Gain,
}

pub struct GainNode {
    timeline: ParamTimeline,
    offset: f32,
    gain_buffer: Vec<f32>,
}

impl GainNode {
    pub fn new(timeline: ParamTimeline) -> Self {
        Self {
            timeline,
            offset: 0.0,
            gain_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Gain node carrying an envelope for a gate from `start` to `hold_until`.
    pub fn envelope(shape: EnvelopeShape, start: f64, hold_until: f64) -> Self {
        let mut timeline = ParamTimeline::new(0.0);
        shape.schedule(&mut timeline, start, hold_until);
        Self::new(timeline)
    }

    pub fn timeline(&self) -> &ParamTimeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut ParamTimeline {
        &mut self.timeline
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let chunk_ctx = ctx.at_offset(chunk_index * MAX_BLOCK_SIZE);
            let gains = &mut self.gain_buffer[..chunk.len()];
            self.timeline.render(gains, chunk_ctx.time, ctx.sample_rate);

            for (sample, gain) in chunk.iter_mut().zip(gains.iter()) {
                *sample *= gain + self.offset;
            }
        }
    }
}

impl Modulatable for GainNode {
    type Param = GainParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            GainParam::Gain => 0.0,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            GainParam::Gain => self.offset = base + modulation,
        }
    }
}
