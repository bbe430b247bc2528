use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    engine::arena::VoiceArena,
    voice::{note::Note, plan::VoicePlan, voice::ScheduledVoice},
    SequencerError, RENDER_QUANTUM,
};

/// Lifecycle of an audio context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Created or paused: renders silence, clock stands still
    Suspended,
    Running,
    /// Terminal: voices dropped, every call that would make sound fails
    Closed,
}

/// The audio output capability: a sample clock, a state, and the voices
/// scheduled against that clock.
///
/// The audio callback owns the context and calls `render_block` for each
/// device buffer. Voices are rendered in `RENDER_QUANTUM` chunks so block-rate
/// modulation has the same resolution whatever buffer size the device asks
/// for.
pub struct AudioContext {
    sample_rate: f32,
    frames: u64,
    state: ContextState,
    arena: VoiceArena,
    rng: SmallRng,
}

impl AudioContext {
    /// New suspended context with an entropy-seeded noise generator.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, None)
    }

    /// New suspended context. `Some(seed)` makes noise voices reproducible.
    pub fn with_seed(sample_rate: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            sample_rate,
            frames: 0,
            state: ContextState::Suspended,
            arena: VoiceArena::new(),
            rng,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Frames rendered while running.
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Clock time in seconds.
    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn active_voices(&self) -> usize {
        self.arena.len()
    }

    /// Start the clock. Resuming a running context is a no-op.
    pub fn resume(&mut self) -> Result<(), SequencerError> {
        match self.state {
            ContextState::Running => Ok(()),
            ContextState::Suspended => {
                self.state = ContextState::Running;
                info!("audio context running at {} Hz", self.sample_rate);
                Ok(())
            }
            ContextState::Closed => Err(closed()),
        }
    }

    pub fn suspend(&mut self) -> Result<(), SequencerError> {
        match self.state {
            ContextState::Suspended => Ok(()),
            ContextState::Running => {
                self.state = ContextState::Suspended;
                info!("audio context suspended at {:.3}s", self.current_time());
                Ok(())
            }
            ContextState::Closed => Err(closed()),
        }
    }

    pub fn close(&mut self) {
        if self.state != ContextState::Closed {
            info!("audio context closed, dropping {} voices", self.arena.len());
        }
        self.state = ContextState::Closed;
        self.arena.clear();
    }

    /// Resolve a note into a voice plan against this context's sample rate.
    pub fn plan(&self, note: &Note, base_duration: f32, start: f64) -> VoicePlan {
        VoicePlan::new(note, base_duration, start, self.sample_rate)
    }

    /// Play `note` now for `base_duration` seconds plus its release.
    pub fn play_once(&mut self, note: &Note, base_duration: f32) -> Result<(), SequencerError> {
        let now = self.current_time();
        self.play_once_at(note, base_duration, now)
    }

    /// Play `note` starting at clock time `start`.
    pub fn play_once_at(
        &mut self,
        note: &Note,
        base_duration: f32,
        start: f64,
    ) -> Result<(), SequencerError> {
        if self.state == ContextState::Closed {
            return Err(closed());
        }

        let plan = self.plan(note, base_duration, start);
        debug!(
            "voice {:?} {:.1} Hz at {:.4}s until {:.4}s, lfo {:?}",
            note.osc, note.freq, plan.start, plan.stop, plan.lfo
        );
        let voice = ScheduledVoice::from_plan(&plan, self.sample_rate, &mut self.rng);
        self.arena.schedule(voice);
        Ok(())
    }

    /// Render the next `out.len()` frames. A context that is not running
    /// writes silence and keeps its clock where it is.
    pub fn render_block(&mut self, out: &mut [f32]) {
        if self.state != ContextState::Running {
            out.fill(0.0);
            return;
        }

        for chunk in out.chunks_mut(RENDER_QUANTUM) {
            self.arena.render(chunk, self.frames, self.sample_rate);
            self.frames += chunk.len() as u64;
        }
    }
}

fn closed() -> SequencerError {
    SequencerError::DeviceUnavailable("audio context is closed".to_string())
}
