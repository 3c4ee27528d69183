use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::models::StockData;

/// Quote header, fundamentals and company description for a resolved
/// instrument.
pub fn render_overview(f: &mut Frame, area: Rect, data: &StockData) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", data.symbol));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // name + price + change
            Constraint::Length(2), // fundamentals
            Constraint::Min(0),    // description
        ])
        .split(inner);

    let change_color = if data.is_losing() {
        Color::Red
    } else {
        Color::Green
    };

    let header = Line::from(vec![
        Span::styled(
            data.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            data.price.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} ({})", data.change, data.change_percent),
            Style::default().fg(change_color),
        ),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let label = Style::default().fg(Color::DarkGray);
    let fundamentals = Table::new(
        vec![
            Row::new(vec![
                Line::from(vec![Span::styled("Mkt Cap ", label), Span::raw(data.market_cap.clone())]),
                Line::from(vec![Span::styled("P/E ", label), Span::raw(data.pe_ratio.clone())]),
                Line::from(vec![Span::styled("Sector ", label), Span::raw(data.sector.clone())]),
            ]),
            Row::new(vec![
                Line::from(vec![Span::styled("52W High ", label), Span::raw(data.high_52.clone())]),
                Line::from(vec![Span::styled("52W Low ", label), Span::raw(data.low_52.clone())]),
                Line::from(""),
            ]),
        ],
        [
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ],
    );
    f.render_widget(fundamentals, chunks[1]);

    if !data.description.is_empty() {
        let description = Paragraph::new(data.description.clone())
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(description, chunks[2]);
    }
}
