/*
Transport
=========

A fixed-tempo step clock. While running it fires one tick every sixteenth
note:

    interval = 60 / bpm / 4        (120 bpm -> 0.125 s)

The first tick fires one full interval after `start`, like an interval timer.
Each tick hands the current step and pattern to the caller, then moves the
cursor on:

    step:     0 ─ 1 ─ 2 ─ ... ─ 15 ─┐
              ▲                     │ wrap
              └─────────────────────┘ + next queued pattern, if any

The transport is clocked from outside. The audio callback calls `advance`
with the duration of the block it is about to render; every tick that falls
inside that window is delivered in order, with its offset from the start of
the window so the voice can start on the exact sample.

Tempo changes restart the clock (stop + start), which sends the cursor back
to step 0.
*/

use std::ops::ControlFlow;

use log::{debug, info, warn};

pub const DEFAULT_TEMPO: f32 = 120.0;

/// One firing of the step clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTick {
    pub step: usize,
    pub pattern: usize,
    /// Seconds from the start of the `advance` window to this tick
    pub offset: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

pub type StepObserver = Box<dyn FnMut(StepTick) + Send>;

pub struct Transport {
    steps: usize,
    tempo: f32,
    state: TransportState,
    current_step: usize,
    current_pattern: usize,
    queue: Vec<usize>,
    queue_index: usize,
    until_next_tick: f64,
    on_step: Option<StepObserver>,
}

impl Transport {
    /// A stopped transport. An unusable `tempo` falls back to
    /// [`DEFAULT_TEMPO`].
    pub fn new(steps: usize, tempo: f32) -> Self {
        let tempo = if valid_tempo(tempo) {
            tempo
        } else {
            warn!("tempo {tempo} is not a positive number of bpm, using {DEFAULT_TEMPO}");
            DEFAULT_TEMPO
        };
        Self {
            steps: steps.max(1),
            tempo,
            state: TransportState::Stopped,
            current_step: 0,
            current_pattern: 0,
            queue: Vec::new(),
            queue_index: 0,
            until_next_tick: 0.0,
            on_step: None,
        }
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Running
    }

    /// Step the next tick will play.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_pattern(&self) -> usize {
        self.current_pattern
    }

    pub fn queue(&self) -> &[usize] {
        &self.queue
    }

    /// Seconds between ticks at the current tempo.
    pub fn step_interval(&self) -> f64 {
        60.0 / self.tempo as f64 / 4.0
    }

    /// Register the observer called with every tick before it is handled.
    pub fn set_on_step(&mut self, observer: impl FnMut(StepTick) + Send + 'static) {
        self.on_step = Some(Box::new(observer));
    }

    pub fn clear_on_step(&mut self) {
        self.on_step = None;
    }

    pub fn start(&mut self) {
        if self.is_playing() {
            return;
        }
        self.state = TransportState::Running;
        self.until_next_tick = self.step_interval();
        info!(
            "transport started at {} bpm, step {} of pattern {}",
            self.tempo, self.current_step, self.current_pattern
        );
    }

    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state = TransportState::Stopped;
        self.current_step = 0;
        self.until_next_tick = 0.0;
        info!("transport stopped");
    }

    /// Change the tempo. A running transport restarts from step 0.
    pub fn set_tempo(&mut self, bpm: f32) {
        if !valid_tempo(bpm) {
            warn!("ignoring tempo {bpm}, must be a positive number of bpm");
            return;
        }

        self.tempo = bpm;
        info!("tempo set to {bpm} bpm");
        if self.is_playing() {
            self.stop();
            self.start();
        }
    }

    pub fn set_pattern(&mut self, pattern: usize) {
        self.current_pattern = pattern;
    }

    /// Chain `patterns`: the first becomes current now, the rest follow in
    /// order, one per cycle, round-robin. An empty list clears the chain.
    pub fn queue_patterns(&mut self, patterns: Vec<usize>) {
        self.queue = patterns;
        self.queue_index = 0;
        if let Some(&first) = self.queue.first() {
            self.current_pattern = first;
            debug!("pattern chain {:?}", self.queue);
        }
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.queue_index = 0;
    }

    /// Move the clock forward by `elapsed` seconds, delivering every tick in
    /// that window to `handler` in order. A handler returning
    /// `ControlFlow::Break` stops the transport before any further tick.
    pub fn advance<F>(&mut self, elapsed: f64, mut handler: F)
    where
        F: FnMut(&StepTick) -> ControlFlow<()>,
    {
        if !self.is_playing() {
            return;
        }

        let mut remaining = elapsed;
        let mut offset = 0.0;
        loop {
            if self.until_next_tick > remaining {
                self.until_next_tick -= remaining;
                return;
            }

            offset += self.until_next_tick;
            remaining -= self.until_next_tick;

            let tick = StepTick {
                step: self.current_step,
                pattern: self.current_pattern,
                offset,
            };
            if let Some(observer) = self.on_step.as_mut() {
                observer(tick);
            }
            let flow = handler(&tick);

            self.advance_cursor();
            self.until_next_tick = self.step_interval();

            if flow.is_break() {
                self.stop();
                return;
            }
        }
    }

    fn advance_cursor(&mut self) {
        self.current_step = (self.current_step + 1) % self.steps;
        if self.current_step == 0 && !self.queue.is_empty() {
            self.queue_index = (self.queue_index + 1) % self.queue.len();
            self.current_pattern = self.queue[self.queue_index];
            debug!("pattern chain advanced to {}", self.current_pattern);
        }
    }
}

fn valid_tempo(bpm: f32) -> bool {
    bpm.is_finite() && bpm > 0.0
}
