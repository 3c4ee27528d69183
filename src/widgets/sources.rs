use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::SourceRef;

/// Citation list. When focused, Up/Down move the selection and `y` copies
/// the selected URI (handled by the controller).
pub fn render_sources(
    f: &mut Frame,
    area: Rect,
    sources: &[SourceRef],
    state: &mut ListState,
    focused: bool,
    max_sources: usize,
) {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" Sources ({}) ", sources.len()));

    if sources.is_empty() {
        let empty = List::new(vec![ListItem::new(Span::styled(
            "No sources cited",
            Style::default().fg(Color::DarkGray),
        ))])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = sources
        .iter()
        .take(max_sources)
        .enumerate()
        .map(|(i, source)| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(Color::DarkGray)),
                    Span::raw(source.title.clone()),
                ]),
                Line::from(Span::styled(
                    format!("    {}", source.uri),
                    Style::default().fg(Color::Blue),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(list, area, state);
}
