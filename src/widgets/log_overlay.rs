use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::utils::logging::LogRingBuffer;

/// Recent log lines (F12). Read-only view over the ring buffer the tracing
/// subscriber writes into.
pub fn render_log_overlay(f: &mut Frame, area: Rect, buffer: &LogRingBuffer) {
    let visible = area.height.saturating_sub(2) as usize;
    let entries = buffer.get_recent(visible);

    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from("No log entries yet")]
    } else {
        entries
            .iter()
            .map(|e| {
                let color = match e.level.as_str() {
                    "ERROR" => Color::Red,
                    "WARN" => Color::Yellow,
                    "DEBUG" | "TRACE" => Color::DarkGray,
                    _ => Color::Gray,
                };
                Line::styled(e.format_for_display(), Style::default().fg(color))
            })
            .collect()
    };

    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Log "));

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
