use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Loading indicator shown while a search is in flight. `tick` comes from the
/// event loop; each poll interval advances one frame.
pub fn render_loading(f: &mut Frame, area: Rect, query: &str, tick: usize) {
    let frame = FRAMES[tick % FRAMES.len()];

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(frame, Style::default().fg(Color::Cyan)),
            Span::raw(" Fetching data and analysis for "),
            Span::styled(query, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" ..."),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "The AI is searching the web; this usually takes a few seconds.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
