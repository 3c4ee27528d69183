//! Plain-stdout rendering for the one-shot classic mode.

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use crate::models::{SearchResult, StockData};

pub fn print_result(result: &SearchResult) {
    match &result.data {
        Some(data) => print_stock(data),
        None => {
            println!(
                "{}",
                "No concrete instrument matched this query.".yellow()
            );
        }
    }

    if !result.analysis.is_empty() {
        println!();
        println!("{}", "AI Analysis".bold());
        println!("{}", result.analysis);
    }

    if !result.sources.is_empty() {
        println!();
        println!("{}", "Sources".bold());
        for (i, source) in result.sources.iter().enumerate() {
            println!("  {:>2}. {} ({})", i + 1, source.title, source.uri.as_str().blue());
        }
    }
}

fn print_stock(data: &StockData) {
    let change = format!("{} ({})", data.change, data.change_percent);
    let change = if data.is_losing() {
        change.red()
    } else {
        change.green()
    };
    println!(
        "{}  {}  {}  {}",
        data.symbol.as_str().bold(),
        data.name.as_str(),
        data.price.as_str().bold(),
        change
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Market Cap").add_attribute(Attribute::Bold),
        Cell::new("P/E").add_attribute(Attribute::Bold),
        Cell::new("Sector").add_attribute(Attribute::Bold),
        Cell::new("52W High").add_attribute(Attribute::Bold),
        Cell::new("52W Low").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        data.market_cap.clone(),
        data.pe_ratio.clone(),
        data.sector.clone(),
        data.high_52.clone(),
        data.low_52.clone(),
    ]);
    println!("{table}");

    if !data.description.is_empty() {
        println!("{}", data.description.as_str().dark_grey());
    }

    if let (Some(first), Some(last)) = (data.chart_data.first(), data.chart_data.last()) {
        println!(
            "{}",
            format!(
                "{} chart points, {} to {}",
                data.chart_data.len(),
                first.time,
                last.time
            )
            .dark_grey()
        );
    }
}
