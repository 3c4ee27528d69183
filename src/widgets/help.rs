use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

/// Keyboard reference popup (F1).
pub fn render_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![key("  Enter     "), Span::raw("Search the typed ticker or company name")]),
        Line::from(vec![key("  Up/Down   "), Span::raw("Recall earlier queries (input) / move selection (sources)")]),
        Line::from(vec![key("  Tab       "), Span::raw("Switch between input and sources list")]),
        Line::from(vec![key("  PgUp/PgDn "), Span::raw("Scroll the analysis text")]),
        Line::from(vec![key("  y         "), Span::raw("Copy selected source link to clipboard")]),
        Line::from(vec![key("  1-5       "), Span::raw("Fill the input with a suggested ticker (idle screen)")]),
        Line::from(vec![key("  Ctrl+L    "), Span::raw("Home: clear everything, back to the start screen")]),
        Line::from(vec![key("  Esc       "), Span::raw("Dismiss error / leave results / close popup / quit")]),
        Line::from(vec![key("  F1        "), Span::raw("Toggle this help")]),
        Line::from(vec![key("  F12       "), Span::raw("Toggle the log view")]),
        Line::from(vec![key("  Ctrl+C    "), Span::raw("Quit")]),
    ];

    let popup = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
