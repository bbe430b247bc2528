/*
Editor Session
==============

Everything the editor knows besides the grid itself: the values currently
dialled into its controls, which cell is selected, whether pattern buttons
build a chain, and the play/stop wiring.

    keyboard / UI ──▶ Session ──▶ PatternStore      (edits)
                         │
                         └──────▶ Transport         (play, tempo, patterns)

    audio callback ──▶ Session::process_block(ctx, out)
                         1. poll a pending device resume
                         2. advance the transport by the block length
                         3. play every note of each tick's step
                         4. render the context into `out`

The pattern being edited is always the transport's current pattern, so when a
chain moves on to the next pattern the editor follows it.

Chain mode
----------
While chain mode is on, selecting a pattern appends it to a pending chain
(each index at most once) instead of switching to it. Leaving chain mode hands
the chain to the transport, which jumps to its first entry and then walks the
chain one pattern per cycle.
*/

use std::ops::ControlFlow;

use log::{info, warn};

use crate::{
    engine::context::AudioContext,
    error::{IndexAxis, SequencerError},
    io::device::{OutputDevice, Resume},
    sequencing::{
        pattern::PatternStore,
        transport::{Transport, DEFAULT_TEMPO},
    },
    voice::note::{Adsr, LfoTarget, Note, Waveform},
};

/// Gate time of every step before the release, in seconds.
pub const DEFAULT_BASE_DURATION: f32 = 0.12;

/// The values currently set on the editor's controls. New notes are made from
/// these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorControls {
    pub freq: f32,
    pub vol: f32,
    pub osc: Waveform,
    pub lfo_rate: f32,
    pub lfo_depth: f32,
    pub lfo_target: LfoTarget,
    pub filter_cutoff: f32,
    pub filter_res: f32,
    pub noise_tone: f32,
    pub adsr: Adsr,
    /// `None` until the drive control is touched; notes then play at the
    /// default drive
    pub drive: Option<f32>,
}

impl EditorControls {
    /// A complete note carrying the current control values.
    pub fn note(&self) -> Note {
        Note {
            freq: self.freq,
            vol: self.vol,
            osc: self.osc,
            lfo_rate: self.lfo_rate,
            lfo_depth: self.lfo_depth,
            lfo_target: self.lfo_target,
            filter_cutoff: self.filter_cutoff,
            filter_res: self.filter_res,
            noise_tone: self.noise_tone,
            adsr: Adsr {
                drive: self.drive,
                ..self.adsr
            },
        }
    }

    /// Show `note` on the controls.
    pub fn load(&mut self, note: &Note) {
        self.freq = note.freq;
        self.vol = note.vol;
        self.osc = note.osc;
        self.lfo_rate = note.lfo_rate;
        self.lfo_depth = note.lfo_depth;
        self.lfo_target = note.lfo_target;
        self.filter_cutoff = note.filter_cutoff;
        self.filter_res = note.filter_res;
        self.noise_tone = note.noise_tone;
        self.adsr = note.adsr;
        if note.adsr.drive.is_some() {
            self.drive = note.adsr.drive;
        }
    }

    fn apply(&mut self, param: StepParam) {
        match param {
            StepParam::Freq(v) => self.freq = v,
            StepParam::Vol(v) => self.vol = v,
            StepParam::Osc(w) => self.osc = w,
            StepParam::LfoRate(v) => self.lfo_rate = v,
            StepParam::LfoDepth(v) => self.lfo_depth = v,
            StepParam::LfoTarget(t) => self.lfo_target = t,
            StepParam::FilterCutoff(v) => self.filter_cutoff = v,
            StepParam::FilterRes(v) => self.filter_res = v,
            StepParam::NoiseTone(v) => self.noise_tone = v,
            StepParam::Attack(v) => self.adsr.attack = v,
            StepParam::Decay(v) => self.adsr.decay = v,
            StepParam::Sustain(v) => self.adsr.sustain = v,
            StepParam::Release(v) => self.adsr.release = v,
            StepParam::Drive(v) => self.drive = Some(v),
        }
    }
}

impl Default for EditorControls {
    fn default() -> Self {
        let note = Note::default();
        Self {
            freq: note.freq,
            vol: note.vol,
            osc: note.osc,
            lfo_rate: note.lfo_rate,
            lfo_depth: note.lfo_depth,
            lfo_target: note.lfo_target,
            filter_cutoff: note.filter_cutoff,
            filter_res: note.filter_res,
            noise_tone: note.noise_tone,
            adsr: note.adsr,
            drive: None,
        }
    }
}

/// One editable note parameter with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepParam {
    Freq(f32),
    Vol(f32),
    Osc(Waveform),
    LfoRate(f32),
    LfoDepth(f32),
    LfoTarget(LfoTarget),
    FilterCutoff(f32),
    FilterRes(f32),
    NoiseTone(f32),
    Attack(f32),
    Decay(f32),
    Sustain(f32),
    Release(f32),
    Drive(f32),
}

impl StepParam {
    fn apply_to(self, note: &mut Note) {
        match self {
            StepParam::Freq(v) => note.freq = v,
            StepParam::Vol(v) => note.vol = v,
            StepParam::Osc(w) => note.osc = w,
            StepParam::LfoRate(v) => note.lfo_rate = v,
            StepParam::LfoDepth(v) => note.lfo_depth = v,
            StepParam::LfoTarget(t) => note.lfo_target = t,
            StepParam::FilterCutoff(v) => note.filter_cutoff = v,
            StepParam::FilterRes(v) => note.filter_res = v,
            StepParam::NoiseTone(v) => note.noise_tone = v,
            StepParam::Attack(v) => note.adsr.attack = v,
            StepParam::Decay(v) => note.adsr.decay = v,
            StepParam::Sustain(v) => note.adsr.sustain = v,
            StepParam::Release(v) => note.adsr.release = v,
            StepParam::Drive(v) => note.adsr.drive = Some(v),
        }
    }
}

/// Grid cell the editor is pointing at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub track: usize,
    pub step: usize,
}

pub struct Session {
    store: PatternStore,
    transport: Transport,
    controls: EditorControls,
    selected: Selection,
    chain_mode: bool,
    chain: Vec<usize>,
    base_duration: f32,
    pending_resume: Option<Resume>,
}

impl Session {
    pub fn new(store: PatternStore, tempo: f32, base_duration: f32) -> Self {
        let transport = Transport::new(store.steps(), tempo);
        Self {
            store,
            transport,
            controls: EditorControls::default(),
            selected: Selection::default(),
            chain_mode: false,
            chain: Vec::new(),
            base_duration,
            pending_resume: None,
        }
    }

    pub fn store(&self) -> &PatternStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PatternStore {
        &mut self.store
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn controls(&self) -> &EditorControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut EditorControls {
        &mut self.controls
    }

    pub fn selected(&self) -> Selection {
        self.selected
    }

    pub fn base_duration(&self) -> f32 {
        self.base_duration
    }

    /// Pattern being edited and played.
    pub fn current_pattern(&self) -> usize {
        self.transport.current_pattern()
    }

    pub fn chain_mode(&self) -> bool {
        self.chain_mode
    }

    /// Patterns collected while in chain mode.
    pub fn pending_chain(&self) -> &[usize] {
        &self.chain
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// True while a play request waits for the device.
    pub fn is_resuming(&self) -> bool {
        self.pending_resume.is_some()
    }

    /// Note at the selected cell of the current pattern, if any.
    pub fn selected_note(&self) -> Option<&Note> {
        let Selection { track, step } = self.selected;
        self.store
            .get_note(self.current_pattern(), track, step)
            .ok()
            .flatten()
    }

    /// Point the editor at a cell and show its note on the controls. An empty
    /// cell resets pitch, volume and shape to their defaults.
    pub fn select_step(&mut self, track: usize, step: usize) -> Result<(), SequencerError> {
        let note = self
            .store
            .get_note(self.current_pattern(), track, step)?
            .copied();
        self.selected = Selection { track, step };

        match note {
            Some(note) => self.controls.load(&note),
            None => {
                let defaults = Note::default();
                self.controls.freq = defaults.freq;
                self.controls.vol = defaults.vol;
                self.controls.osc = defaults.osc;
            }
        }
        Ok(())
    }

    /// Turn a cell on (with a note from the current controls) or off, and
    /// select it. Returns whether the cell now holds a note.
    pub fn toggle_step(&mut self, track: usize, step: usize) -> Result<bool, SequencerError> {
        let pattern = self.current_pattern();
        let active = self.store.get_note(pattern, track, step)?.is_none();
        let note = active.then(|| self.controls.note());
        self.store.set_note(pattern, track, step, note)?;
        self.select_step(track, step)?;
        Ok(active)
    }

    /// Set one parameter on the controls and on the selected note, creating
    /// a default note first when the cell is empty.
    pub fn update_selected(&mut self, param: StepParam) -> Result<(), SequencerError> {
        let Selection { track, step } = self.selected;
        let pattern = self.current_pattern();
        self.controls.apply(param);

        if self.store.get_note(pattern, track, step)?.is_none() {
            let note = Note {
                noise_tone: self.controls.noise_tone,
                ..Note::default()
            };
            self.store.set_note(pattern, track, step, Some(note))?;
        }
        if let Some(note) = self.store.note_mut(pattern, track, step)? {
            param.apply_to(note);
        }
        Ok(())
    }

    /// Remove every note from the current pattern.
    pub fn clear_current_pattern(&mut self) -> Result<(), SequencerError> {
        self.store.clear_pattern(self.current_pattern())
    }

    /// Save the current pattern into slot `to`, replacing what was there.
    pub fn copy_current_pattern(&mut self, to: usize) -> Result<(), SequencerError> {
        let from = self.current_pattern();
        self.store.copy_pattern(from, to)?;
        info!("copied pattern {from} to {to}");
        Ok(())
    }

    /// Switch to `pattern`, or in chain mode append it to the pending chain.
    pub fn select_pattern(&mut self, pattern: usize) -> Result<(), SequencerError> {
        SequencerError::check_index(IndexAxis::Pattern, pattern, self.store.pattern_count())?;

        if self.chain_mode {
            if !self.chain.contains(&pattern) {
                self.chain.push(pattern);
            }
        } else {
            self.transport.set_pattern(pattern);
        }
        Ok(())
    }

    /// Enter or leave chain mode. Entering picks up the chain the transport
    /// is already walking; leaving hands a non-empty chain to the transport.
    pub fn set_chain_mode(&mut self, on: bool) {
        if on == self.chain_mode {
            return;
        }
        self.chain_mode = on;

        if on {
            self.chain = self.transport.queue().to_vec();
        } else if !self.chain.is_empty() {
            info!("chaining patterns {:?}", self.chain);
            self.transport.queue_patterns(self.chain.clone());
        }
    }

    pub fn toggle_chain_mode(&mut self) {
        self.set_chain_mode(!self.chain_mode);
    }

    /// Drop both the pending and the playing chain.
    pub fn clear_chain(&mut self) {
        self.chain.clear();
        self.transport.clear_queue();
    }

    pub fn set_tempo(&mut self, bpm: f32) {
        self.transport.set_tempo(bpm);
    }

    /// Ask `device` to start; the transport starts once the resume completes.
    pub fn play(&mut self, device: &mut dyn OutputDevice) {
        if self.transport.is_playing() || self.pending_resume.is_some() {
            return;
        }
        self.pending_resume = Some(device.resume());
    }

    pub fn stop(&mut self) {
        self.pending_resume = None;
        self.transport.stop();
    }

    pub fn toggle_playback(&mut self, device: &mut dyn OutputDevice) {
        if self.transport.is_playing() || self.pending_resume.is_some() {
            self.stop();
        } else {
            self.play(device);
        }
    }

    /// Check a pending device resume. On success the context is resumed and
    /// the transport started; a failed or abandoned resume leaves it stopped.
    pub fn poll_resume(&mut self, ctx: &mut AudioContext) {
        let Some(resume) = self.pending_resume.as_mut() else {
            return;
        };

        match resume.poll() {
            Some(Ok(())) => {
                self.pending_resume = None;
                match ctx.resume() {
                    Ok(()) => {
                        info!("output device resumed");
                        self.transport.start();
                    }
                    Err(err) => warn!("cannot start playback: {err}"),
                }
            }
            Some(Err(err)) => {
                self.pending_resume = None;
                warn!("output device failed to resume: {err}");
            }
            None if resume.is_abandoned() => {
                self.pending_resume = None;
                warn!("output device resume was abandoned");
            }
            None => {}
        }
    }

    /// Run the sequencer for one device buffer and render it into `out`.
    pub fn process_block(&mut self, ctx: &mut AudioContext, out: &mut [f32]) {
        self.poll_resume(ctx);

        let elapsed = out.len() as f64 / ctx.sample_rate() as f64;
        let block_start = ctx.current_time();
        let Self {
            store,
            transport,
            base_duration,
            ..
        } = self;

        transport.advance(elapsed, |tick| {
            let Ok(pattern) = store.pattern(tick.pattern) else {
                warn!("pattern {} does not exist, step {} skipped", tick.pattern, tick.step);
                return ControlFlow::Continue(());
            };

            for (track, note) in pattern.notes_at_step(tick.step) {
                if let Err(err) = ctx.play_once_at(note, *base_duration, block_start + tick.offset) {
                    warn!("track {track} step {} skipped: {err}", tick.step);
                }
            }
            ControlFlow::Continue(())
        });

        ctx.render_block(out);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PatternStore::default(), DEFAULT_TEMPO, DEFAULT_BASE_DURATION)
    }
}
