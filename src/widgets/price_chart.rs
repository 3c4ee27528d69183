use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::ChartPoint;

/// Price history chart. The points arrive oldest-first and are plotted by
/// index; this widget never reorders them.
pub fn render_price_chart(f: &mut Frame, area: Rect, points: &[ChartPoint], losing: bool) {
    let block = Block::default().borders(Borders::ALL).title(" Price ");

    if points.len() < 2 {
        let placeholder = Paragraph::new("No historical data available")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let (min, max) = value_bounds(points);
    let color = if losing { Color::Red } else { Color::Green };

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let x_labels = vec![
        Span::raw(points[0].time.clone()),
        Span::raw(points[points.len() - 1].time.clone()),
    ];
    let y_labels = vec![
        Span::raw(format!("{:.2}", min)),
        Span::raw(format!("{:.2}", (min + max) / 2.0)),
        Span::raw(format!("{:.2}", max)),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, (points.len() - 1) as f64])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([min, max])
                .labels(y_labels)
                .style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(chart, area);
}

/// Y bounds with a little headroom so the line does not hug the frame.
/// A flat series still gets a non-zero range.
fn value_bounds(points: &[ChartPoint]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for p in points {
        min = min.min(p.value);
        max = max.max(p.value);
    }
    let pad = ((max - min) * 0.05).max(max.abs() * 0.001).max(0.01);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64) -> ChartPoint {
        ChartPoint {
            time: "2025-07-01".to_string(),
            value,
        }
    }

    #[test]
    fn bounds_pad_around_series() {
        let (min, max) = value_bounds(&[point(100.0), point(110.0)]);
        assert!(min < 100.0);
        assert!(max > 110.0);
    }

    #[test]
    fn flat_series_still_has_positive_range() {
        let (min, max) = value_bounds(&[point(50.0), point(50.0)]);
        assert!(max > min);
    }
}
