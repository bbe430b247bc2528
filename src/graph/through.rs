use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect).

  1. Render the source into the output buffer
  2. Pass that buffer through the effect (in-place processing)

A step voice is four links of this:

  [Source] ──→ [Lowpass] ──→ [Envelope gain] ──→ [Drive] ──→ output

     let voice = OscNode::sawtooth()
         .with_frequency(110.0)
         .through(FilterNode::lowpass(1000.0))
         .through(GainNode::envelope(shape, t0, t0 + 0.12))
         .through(WaveShaperNode::drive(0.5));

Noise voices add one more link, a bandpass between the source and the lowpass.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }
}
