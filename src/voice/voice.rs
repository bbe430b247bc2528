use rand::Rng;

use crate::{
    dsp::{distortion::Oversample, oscillator::noise_buffer},
    graph::{
        distortion::WaveShaperNode,
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        gain::{GainNode, GainParam},
        lfo::LfoNode,
        node::{GraphNode, RenderCtx},
        oscillator::{NoiseNode, OscNode, OscParam},
    },
    voice::plan::{LfoRoute, ModTarget, SourcePlan, VoicePlan, NOISE_TONE_Q},
};

/// Oversampling used by every voice's drive stage.
pub const VOICE_OVERSAMPLE: Oversample = Oversample::X4;

/// Convert a clock time to a frame index, rounding to the nearest sample.
#[inline]
pub fn time_to_frame(time: f64, sample_rate: f32) -> u64 {
    (time * sample_rate as f64).round().max(0.0) as u64
}

/// One step voice: a render graph that plays between two frames of the
/// audio clock and is discarded afterwards.
pub struct ScheduledVoice {
    graph: Box<dyn GraphNode>,
    start_frame: u64,
    stop_frame: u64,
}

impl ScheduledVoice {
    pub fn from_plan<R: Rng + ?Sized>(plan: &VoicePlan, sample_rate: f32, rng: &mut R) -> Self {
        let route = plan.lfo;
        let lfo_for = |target: ModTarget| {
            route
                .filter(|r| r.target == target)
                .map(|LfoRoute { rate, depth, .. }| (LfoNode::sine(rate), depth))
        };

        let source: Box<dyn GraphNode> = match plan.source {
            SourcePlan::Oscillator { waveform, freq } => {
                let osc = OscNode::from_waveform(waveform).with_frequency(freq);
                match lfo_for(ModTarget::Pitch) {
                    Some((lfo, depth)) => osc.modulate(lfo, OscParam::Frequency, depth).boxed(),
                    None => osc.boxed(),
                }
            }
            SourcePlan::Noise { buffer_len, tone_hz } => NoiseNode::new(noise_buffer(buffer_len, rng))
                .through(FilterNode::bandpass(tone_hz).with_q(NOISE_TONE_Q))
                .boxed(),
        };

        let lowpass = FilterNode::lowpass(plan.cutoff).with_q(plan.q);
        let lowpass: Box<dyn GraphNode> = match lfo_for(ModTarget::Cutoff) {
            Some((lfo, depth)) => lowpass.modulate(lfo, FilterParam::Cutoff, depth).boxed(),
            None => lowpass.boxed(),
        };

        let gain = GainNode::new(plan.gain.clone());
        let gain: Box<dyn GraphNode> = match lfo_for(ModTarget::Gain) {
            Some((lfo, depth)) => gain.modulate(lfo, GainParam::Gain, depth).boxed(),
            None => gain.boxed(),
        };

        let drive = WaveShaperNode::drive(plan.drive).with_oversample(VOICE_OVERSAMPLE);

        let graph = source.through(lowpass).through(gain).through(drive).boxed();

        Self {
            graph,
            start_frame: time_to_frame(plan.start, sample_rate),
            stop_frame: time_to_frame(plan.stop, sample_rate),
        }
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn stop_frame(&self) -> u64 {
        self.stop_frame
    }

    /// Mix this voice into `out`, whose first sample is clock frame
    /// `block_start`. Frames outside the voice's lifetime are left untouched.
    ///
    /// The graph renders into `scratch`, which the caller shares between
    /// voices; it is processed in chunks of its length.
    pub fn render(
        &mut self,
        out: &mut [f32],
        scratch: &mut [f32],
        block_start: u64,
        sample_rate: f32,
    ) {
        let block_end = block_start + out.len() as u64;
        let from = self.start_frame.max(block_start);
        let to = self.stop_frame.min(block_end);
        if from >= to || scratch.is_empty() {
            return;
        }

        let offset = (from - block_start) as usize;
        let span = &mut out[offset..offset + (to - from) as usize];

        let mut frame = from;
        for chunk in span.chunks_mut(scratch.len()) {
            let scratch = &mut scratch[..chunk.len()];
            scratch.fill(0.0);

            let ctx = RenderCtx::new(sample_rate, frame as f64 / sample_rate as f64);
            self.graph.render_block(scratch, &ctx);

            for (o, v) in chunk.iter_mut().zip(scratch.iter()) {
                *o += v;
            }
            frame += chunk.len() as u64;
        }
    }

    /// True once the clock at `frame` has passed the voice's stop time.
    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.stop_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        voice::note::{LfoTarget, Note, Waveform},
        MAX_BLOCK_SIZE,
    };
    use rand::{rngs::SmallRng, SeedableRng};

    const SAMPLE_RATE: f32 = 8_000.0;

    fn voice_for(note: &Note, start: f64) -> ScheduledVoice {
        let plan = VoicePlan::new(note, 0.12, start, SAMPLE_RATE);
        ScheduledVoice::from_plan(&plan, SAMPLE_RATE, &mut SmallRng::seed_from_u64(3))
    }

    fn render_all(voice: &mut ScheduledVoice, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames];
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        for (index, chunk) in out.chunks_mut(128).enumerate() {
            voice.render(chunk, &mut scratch, (index * 128) as u64, SAMPLE_RATE);
        }
        out
    }

    #[test]
    fn voice_is_silent_outside_its_lifetime() {
        let mut voice = voice_for(&Note::default(), 0.1);
        let out = render_all(&mut voice, 8_000);

        let start = voice.start_frame() as usize;
        let stop = voice.stop_frame() as usize;
        assert_eq!(start, 800);
        assert!(out[..start].iter().all(|&s| s == 0.0));
        assert!(out[stop..].iter().all(|&s| s == 0.0));
        assert!(out[start..stop].iter().any(|&s| s.abs() > 0.01));
    }

    #[test]
    fn output_is_bounded_by_drive_curve() {
        let note = Note {
            vol: 1.0,
            osc: Waveform::Sawtooth,
            lfo_rate: 6.0,
            lfo_depth: 0.5,
            lfo_target: LfoTarget::Vol,
            ..Note::default()
        };
        let mut voice = voice_for(&note, 0.0);
        let out = render_all(&mut voice, 4_000);
        assert!(out.iter().all(|s| s.is_finite() && s.abs() < 0.36));
    }

    #[test]
    fn noise_voice_renders() {
        let note = Note {
            osc: Waveform::Noise,
            vol: 0.9,
            ..Note::default()
        };
        let mut voice = voice_for(&note, 0.0);
        let out = render_all(&mut voice, 4_000);
        assert!(out.iter().any(|&s| s.abs() > 0.001));
        assert!(voice.is_finished(voice.stop_frame()));
        assert!(!voice.is_finished(voice.stop_frame() - 1));
    }

    #[test]
    fn render_adds_into_existing_signal() {
        let mut voice = voice_for(&Note::default(), 0.0);
        let mut out = vec![1.0f32; 16];
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        voice.render(&mut out, &mut scratch, 10_000, SAMPLE_RATE);
        assert!(out.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn small_scratch_renders_the_same_samples() {
        let mut whole = voice_for(&Note::default(), 0.0);
        let mut split = voice_for(&Note::default(), 0.0);

        let mut expected = vec![0.0f32; 256];
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];
        whole.render(&mut expected, &mut scratch, 0, SAMPLE_RATE);

        let mut out = vec![0.0f32; 256];
        let mut small = vec![0.0f32; 64];
        split.render(&mut out, &mut small, 0, SAMPLE_RATE);

        for (a, b) in out.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
