//! Transport bar widget - tempo, play state, pattern chain and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiSnapshot;

/// Output level over the samples the scope holds
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

fn chain_label(patterns: &[usize]) -> String {
    patterns
        .iter()
        .map(|p| format!("P{}", p + 1))
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiSnapshot, stats: &AudioStats) {
    let block = Block::default().title(" stepgrid ").borders(Borders::ALL);

    let (symbol, label, color) = if state.playing {
        ("▶", "Playing", Color::Green)
    } else if state.resuming {
        ("…", "Starting", Color::Yellow)
    } else {
        ("■", "Stopped", Color::Yellow)
    };

    let step = state
        .playhead
        .map_or_else(|| "--".to_string(), |s| format!("{:02}", s + 1));

    let chain = if state.chain_mode {
        format!("Chain: {}  ", chain_label(&state.pending_chain))
    } else if !state.queue.is_empty() {
        format!("Queue: {}  ", chain_label(&state.queue))
    } else {
        String::new()
    };

    let line = Line::from(vec![
        Span::styled(format!(" BPM: {:.0}  ", state.tempo), Style::default().fg(Color::Cyan)),
        Span::styled(format!("{symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("Step {step}  P{}/{}  ", state.pattern + 1, state.pattern_count),
            Style::default().fg(Color::White),
        ),
        Span::styled(chain, Style::default().fg(Color::LightBlue)),
        Span::styled(
            format!("{:.1}kHz  {} voices  ", state.sample_rate / 1000.0, state.active_voices),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
