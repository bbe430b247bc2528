//! TUI module for stepgrid
//!
//! Draws the grid of the current pattern and edits the session from the
//! keyboard.

mod controls;
mod grid;
mod scope;
pub mod state;
mod transport;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::warn;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use stepgrid::{
    sequencing::{Session, StepParam},
    voice::{LfoTarget, DEFAULT_DRIVE},
    SequencerError,
};

use crate::app::{CpalDevice, Engine};

pub use state::UiSnapshot;

use controls::render_controls;
use grid::render_grid;
use scope::render_scope;
use transport::{render_transport, AudioStats};

/// Samples shown by the scope and measured by the level meter
const VIS_BUFFER_SIZE: usize = 2048;
const TEMPO_STEP: f32 = 5.0;
const MIN_TEMPO: f32 = 20.0;
const DRIVE_STEP: f32 = 0.05;
const SEMITONE: f32 = 1.059_463_1;

pub struct UiApp {
    engine: Arc<Mutex<Engine>>,
    device: CpalDevice,
    /// Ring buffer receiver for rendered samples
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: Arc<Mutex<Engine>>,
        device: CpalDevice,
        scope_rx: Consumer<f32>,
    ) -> Self {
        Self {
            engine,
            device,
            scope_rx,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            let Some(snapshot) = self.snapshot() else {
                break;
            };
            terminal.draw(|frame| self.render(frame, &snapshot))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        Ok(())
    }

    fn poll_scope(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(0..excess);
        }
    }

    /// `None` once the audio thread has poisoned the lock.
    fn snapshot(&self) -> Option<UiSnapshot> {
        let engine = self.engine.lock().ok()?;
        Some(UiSnapshot::capture(&engine))
    }

    fn handle_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
            self.should_quit = true;
            return;
        }

        let Ok(mut engine) = self.engine.lock() else {
            self.should_quit = true;
            return;
        };
        let session = &mut engine.session;

        let result = match key {
            KeyCode::Left => move_selection(session, 0, -1),
            KeyCode::Right => move_selection(session, 0, 1),
            KeyCode::Up => move_selection(session, -1, 0),
            KeyCode::Down => move_selection(session, 1, 0),
            KeyCode::Enter | KeyCode::Char('x') => {
                let sel = session.selected();
                session.toggle_step(sel.track, sel.step).map(|_| ())
            }
            KeyCode::Char(' ') => {
                session.toggle_playback(&mut self.device);
                Ok(())
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let tempo = session.transport().tempo();
                session.set_tempo(tempo + TEMPO_STEP);
                Ok(())
            }
            KeyCode::Char('-') => {
                let tempo = session.transport().tempo();
                session.set_tempo((tempo - TEMPO_STEP).max(MIN_TEMPO));
                Ok(())
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                session.select_pattern(index)
            }
            KeyCode::Char('p') => copy_to_next_pattern(session),
            KeyCode::Char('c') => {
                session.toggle_chain_mode();
                Ok(())
            }
            KeyCode::Char('C') => {
                session.clear_chain();
                Ok(())
            }
            KeyCode::Char('w') => {
                let next = session.controls().osc.next();
                session.update_selected(StepParam::Osc(next))
            }
            KeyCode::Char(',') => {
                let freq = session.controls().freq / SEMITONE;
                session.update_selected(StepParam::Freq(freq))
            }
            KeyCode::Char('.') => {
                let freq = session.controls().freq * SEMITONE;
                session.update_selected(StepParam::Freq(freq))
            }
            KeyCode::Char('[') => nudge_drive(session, -DRIVE_STEP),
            KeyCode::Char(']') => nudge_drive(session, DRIVE_STEP),
            KeyCode::Char('l') => {
                let next = match session.controls().lfo_target {
                    LfoTarget::None => LfoTarget::Freq,
                    LfoTarget::Freq => LfoTarget::Vol,
                    LfoTarget::Vol => LfoTarget::Filter,
                    LfoTarget::Filter => LfoTarget::None,
                };
                session.update_selected(StepParam::LfoTarget(next))
            }
            KeyCode::Delete | KeyCode::Backspace => session.clear_current_pattern(),
            _ => Ok(()),
        };

        if let Err(err) = result {
            warn!("{err}");
        }
    }

    fn render(&self, frame: &mut Frame, state: &UiSnapshot) {
        let area = frame.area();
        let grid_height = state.cells.len() as u16 + 3;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),           // Transport bar
                Constraint::Length(grid_height), // Grid
                Constraint::Min(9),              // Controls + scope
                Constraint::Length(1),           // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.scope);
        render_transport(frame, chunks[0], state, &stats);
        render_grid(frame, chunks[1], state);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(20)])
            .split(chunks[2]);
        render_controls(frame, lower[0], state);
        render_scope(frame, lower[1], &self.scope);

        let help = Paragraph::new(
            " [←↑↓→] Select  [Enter] Toggle  [Space] Play/Stop  [+/-] Tempo  [1-9] Pattern  \
             [p] Copy  [c] Chain  [w] Wave  [,.] Pitch  [[]] Drive  [l] LFO  [Del] Clear  [q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

fn move_selection(session: &mut Session, tracks: isize, steps: isize) -> Result<(), SequencerError> {
    let sel = session.selected();
    let track_count = session.store().tracks() as isize;
    let step_count = session.store().steps() as isize;

    let track = (sel.track as isize + tracks).rem_euclid(track_count.max(1)) as usize;
    let step = (sel.step as isize + steps).rem_euclid(step_count.max(1)) as usize;
    session.select_step(track, step)
}

/// Copy the current pattern into the next slot and switch to it.
fn copy_to_next_pattern(session: &mut Session) -> Result<(), SequencerError> {
    let count = session.store().pattern_count().max(1);
    let next = (session.current_pattern() + 1) % count;
    session.copy_current_pattern(next)?;
    session.select_pattern(next)
}

fn nudge_drive(session: &mut Session, delta: f32) -> Result<(), SequencerError> {
    let drive = session.controls().drive.unwrap_or(DEFAULT_DRIVE);
    session.update_selected(StepParam::Drive((drive + delta).clamp(0.0, 1.0)))
}
