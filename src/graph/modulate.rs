use crate::{
    dsp::modulate::block_average,
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Modulate Node
=============

Connects an LFO (or any signal) to a parameter on another node.

  // Auto-wah: LFO sweeps filter cutoff
  let wah = FilterNode::lowpass(1000.0)
      .modulate(LfoNode::sine(2.0), FilterParam::Cutoff, 800.0);

  // Vibrato on a step voice
  let vib = OscNode::triangle()
      .with_frequency(330.0)
      .modulate(LfoNode::sine(6.0), OscParam::Frequency, 12.0);

Each block the LFO is rendered into a scratch buffer, averaged, scaled by
depth and handed to the target through `Modulatable::apply_modulation`, then
the target renders with the updated parameter:

    modulated_value = base_value + (average(LFO) × depth)

See `dsp/modulate.rs` for the block-rate tradeoffs and clamping.
*/

pub struct Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    source: S,            // The node being modulated (e.g., FilterNode)
    lfo: L,               // The modulation source (e.g., LfoNode)
    param: S::Param,      // Which parameter to modulate (e.g., FilterParam::Cutoff)
    depth: f32,           // Modulation amount (scales LFO output)
    lfo_buffer: Vec<f32>, // Temp buffer for LFO output
}

impl<S, L> Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    pub fn new(source: S, lfo: L, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            lfo,
            param,
            depth,
            lfo_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S, L> GraphNode for Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (chunk_index, chunk) in out.chunks_mut(MAX_BLOCK_SIZE).enumerate() {
            let chunk_ctx = ctx.at_offset(chunk_index * MAX_BLOCK_SIZE);
            let len = chunk.len();

            // LFO values in [-1.0, +1.0]
            self.lfo.render_block(&mut self.lfo_buffer[..len], &chunk_ctx);
            let lfo_avg = block_average(&self.lfo_buffer[..len]);

            let base_value = self.source.get_param(self.param);
            self.source
                .apply_modulation(self.param, base_value, lfo_avg * self.depth);

            self.source.render_block(chunk, &chunk_ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        lfo::LfoNode,
        oscillator::{OscNode, OscParam},
    };

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0, 0.0)
    }

    #[test]
    fn test_modulation_keeps_base_value() {
        let lfo = LfoNode::sine(5.0);
        let mut filter = FilterNode::lowpass(1000.0).modulate(lfo, FilterParam::Cutoff, 500.0);

        let mut buffer = vec![0.0; 512];
        filter.render_block(&mut buffer, &ctx());

        assert_eq!(filter.source().get_param(FilterParam::Cutoff), 1000.0);
        assert!(filter.source().cutoff() > 1000.0, "rising sine should lift the cutoff");
    }

    #[test]
    fn test_modulation_clamping() {
        let lfo = LfoNode::square(1.0);
        let mut filter = FilterNode::lowpass(1000.0).modulate(lfo, FilterParam::Cutoff, 100_000.0);

        let mut buffer = vec![0.1; 1024];
        filter.render_block(&mut buffer, &ctx());

        for &sample in &buffer {
            assert!(sample.is_finite(), "Output contains non-finite value: {}", sample);
        }
    }

    #[test]
    fn test_pitch_modulation_moves_frequency() {
        let mut osc = OscNode::sine()
            .with_frequency(440.0)
            .modulate(LfoNode::square(1.0), OscParam::Frequency, 100.0);

        let mut buffer = vec![0.0; 128];
        osc.render_block(&mut buffer, &ctx());

        // A square LFO starts high, so the first block is +depth
        assert_eq!(osc.source().frequency(), 540.0);
    }
}
