use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// The free-text AI analysis, wrapped and vertically scrollable
/// (PgUp/PgDn in the controller).
pub fn render_analysis(f: &mut Frame, area: Rect, analysis: &str, scroll: u16) {
    let text = if analysis.is_empty() {
        "No analysis returned."
    } else {
        analysis
    };

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" AI Analysis "))
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}
