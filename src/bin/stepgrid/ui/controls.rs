//! Editor controls panel - the values new notes are made from

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use stepgrid::voice::{LfoTarget, Waveform, DEFAULT_DRIVE};

use super::UiSnapshot;

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<8}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn lfo_target_name(target: LfoTarget) -> &'static str {
    match target {
        LfoTarget::None => "none",
        LfoTarget::Freq => "freq",
        LfoTarget::Vol => "vol",
        LfoTarget::Filter => "filter",
    }
}

pub fn render_controls(frame: &mut Frame, area: Rect, state: &UiSnapshot) {
    let c = &state.controls;
    let block = Block::default()
        .title(format!(
            " T{} / step {} ",
            state.selected.track + 1,
            state.selected.step + 1
        ))
        .borders(Borders::ALL);

    let pitch = if c.osc == Waveform::Noise {
        format!("tone {:.2}", c.noise_tone)
    } else {
        format!("{:.1} Hz", c.freq)
    };
    let drive = match c.drive {
        Some(d) => format!("{d:.2}"),
        None => format!("{DEFAULT_DRIVE:.2} (default)"),
    };

    let lines = vec![
        row("osc", c.osc.name().to_string()),
        row("pitch", pitch),
        row("vol", format!("{:.2}", c.vol)),
        row("filter", format!("{:.0} Hz  res {:.1}", c.filter_cutoff, c.filter_res)),
        row(
            "lfo",
            format!(
                "{} {:.1} Hz × {:.1}",
                lfo_target_name(c.lfo_target),
                c.lfo_rate,
                c.lfo_depth
            ),
        ),
        row(
            "adsr",
            format!(
                "{:.2} {:.2} {:.2} {:.2}",
                c.adsr.attack, c.adsr.decay, c.adsr.sustain, c.adsr.release
            ),
        ),
        row("drive", drive),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
