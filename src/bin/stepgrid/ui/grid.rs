//! Step grid widget - one row per track, playhead and selection highlighted

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use stepgrid::voice::Waveform;

use super::UiSnapshot;

fn waveform_color(waveform: Waveform) -> Color {
    match waveform {
        Waveform::Sine => Color::Cyan,
        Waveform::Square => Color::Yellow,
        Waveform::Sawtooth => Color::Red,
        Waveform::Triangle => Color::Green,
        Waveform::Noise => Color::Magenta,
    }
}

pub fn render_grid(frame: &mut Frame, area: Rect, state: &UiSnapshot) {
    let title = if state.chain_mode {
        format!(" Pattern {} (chaining) ", state.pattern + 1)
    } else {
        format!(" Pattern {} ", state.pattern + 1)
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    let steps = state.cells.first().map_or(0, Vec::len);
    let mut lines = Vec::with_capacity(state.cells.len() + 1);

    // Step numbers, every beat
    let mut header = vec![Span::raw("     ")];
    for step in 0..steps {
        let label = if step % 4 == 0 {
            format!("{:<2}", step + 1)
        } else {
            "  ".to_string()
        };
        header.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        if step % 4 == 3 {
            header.push(Span::raw(" "));
        }
    }
    lines.push(Line::from(header));

    for (track, row) in state.cells.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!(" T{:<2} ", track + 1),
            Style::default().fg(Color::White),
        )];

        for (step, cell) in row.iter().enumerate() {
            let (glyph, mut style) = match cell {
                Some(waveform) => ("■ ", Style::default().fg(waveform_color(*waveform))),
                None => ("· ", Style::default().fg(Color::DarkGray)),
            };
            if state.playhead == Some(step) {
                style = style.bg(Color::Rgb(50, 50, 50));
            }
            if state.selected.track == track && state.selected.step == step {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(glyph, style));
            if step % 4 == 3 {
                spans.push(Span::raw(" "));
            }
        }
        if let Some(&hits) = state.hits.get(track) {
            spans.push(Span::styled(
                format!("{hits:>3}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
