//! Snapshot of the session taken under the engine lock
//!
//! The lock is held only while copying; drawing works from the snapshot.

use stepgrid::{
    sequencing::{EditorControls, Selection},
    voice::Waveform,
};

use crate::app::Engine;

#[derive(Clone, Debug)]
pub struct UiSnapshot {
    pub tempo: f32,
    pub playing: bool,
    /// Play was pressed and the device has not answered yet
    pub resuming: bool,
    /// Step sounding right now, if playing
    pub playhead: Option<usize>,
    pub pattern: usize,
    pub pattern_count: usize,
    pub chain_mode: bool,
    pub pending_chain: Vec<usize>,
    pub queue: Vec<usize>,
    /// `cells[track][step]`, the shape of the note or `None` when empty
    pub cells: Vec<Vec<Option<Waveform>>>,
    /// Notes per track in the current pattern
    pub hits: Vec<usize>,
    pub selected: Selection,
    pub controls: EditorControls,
    pub active_voices: usize,
    pub sample_rate: f32,
}

impl UiSnapshot {
    pub fn capture(engine: &Engine) -> Self {
        let session = &engine.session;
        let transport = session.transport();
        let store = session.store();
        let steps = store.steps().max(1);

        let cells = match store.pattern(session.current_pattern()) {
            Ok(pattern) => (0..pattern.tracks())
                .map(|track| {
                    (0..pattern.steps())
                        .map(|step| pattern.get(track, step).ok().flatten().map(|n| n.osc))
                        .collect()
                })
                .collect(),
            Err(_) => Vec::new(),
        };

        let hits = (0..store.tracks())
            .map(|track| {
                store
                    .active_steps(session.current_pattern(), track)
                    .map_or(0, |steps| steps.len())
            })
            .collect();

        // The transport's cursor is the step the next tick plays
        let playhead = transport
            .is_playing()
            .then(|| (transport.current_step() + steps - 1) % steps);

        Self {
            tempo: transport.tempo(),
            playing: transport.is_playing(),
            resuming: session.is_resuming(),
            playhead,
            pattern: session.current_pattern(),
            pattern_count: store.pattern_count(),
            chain_mode: session.chain_mode(),
            pending_chain: session.pending_chain().to_vec(),
            queue: transport.queue().to_vec(),
            cells,
            hits,
            selected: session.selected(),
            controls: *session.controls(),
            active_voices: engine.context.active_voices(),
            sample_rate: engine.context.sample_rate(),
        }
    }
}
