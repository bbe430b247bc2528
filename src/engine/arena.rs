use crate::{voice::voice::ScheduledVoice, MAX_BLOCK_SIZE};

/// Holds every voice that has been scheduled and not yet reaped.
///
/// Voices are fire-and-forget: the arena owns them from `schedule` until the
/// clock passes their stop frame, then drops them on the next `render`.
/// Voices render one after another through a single scratch buffer.
pub struct VoiceArena {
    voices: Vec<ScheduledVoice>,
    scratch: Vec<f32>,
}

impl VoiceArena {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            voices: Vec::with_capacity(capacity),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn schedule(&mut self, voice: ScheduledVoice) {
        self.voices.push(voice);
    }

    /// Mix all live voices into `out` (overwritten) starting at clock frame
    /// `block_start`, then reap the voices that finished within the block.
    pub fn render(&mut self, out: &mut [f32], block_start: u64, sample_rate: f32) {
        out.fill(0.0);
        for voice in &mut self.voices {
            voice.render(out, &mut self.scratch, block_start, sample_rate);
        }

        let block_end = block_start + out.len() as u64;
        self.reap(block_end);
    }

    /// Drop every voice whose stop frame is at or before `frame`.
    pub fn reap(&mut self, frame: u64) -> usize {
        let before = self.voices.len();
        self.voices.retain(|voice| !voice.is_finished(frame));
        before - self.voices.len()
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl Default for VoiceArena {
    fn default() -> Self {
        Self::new()
    }
}
