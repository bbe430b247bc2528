//! Output scope - peak level per column over the most recent samples

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Sparkline},
    Frame,
};

/// Resolution of the bar heights
const LEVELS: f32 = 100.0;

pub fn render_scope(frame: &mut Frame, area: Rect, samples: &[f32]) {
    let block = Block::default().title(" Output ").borders(Borders::ALL);
    let columns = block.inner(area).width.max(1) as usize;
    let bin = samples.len().div_ceil(columns).max(1);

    let peaks: Vec<u64> = samples
        .chunks(bin)
        .map(|chunk| {
            let peak = chunk.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
            (peak.min(1.0) * LEVELS) as u64
        })
        .collect();

    let sparkline = Sparkline::default()
        .block(block)
        .data(&peaks)
        .max(LEVELS as u64)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(sparkline, area);
}
