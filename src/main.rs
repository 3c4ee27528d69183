use crossterm::style::Stylize;
use std::sync::Arc;

use market_insight::config::Config;
use market_insight::report;
use market_insight::search_client::GeminiSearchClient;
use market_insight::state::SEARCH_FAILED_MESSAGE;
use market_insight::tui_app;

fn print_help() {
    println!("{}", "MarketInsight - AI stock search".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  market-insight [OPTIONS] [QUERY]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!(
        "  {}          - One-shot mode: print the result and exit",
        "--classic".green()
    );
    println!("  {}             - Show this help", "--help".green());
    println!();
    println!("With no QUERY the interactive TUI starts.");
    println!("A QUERY argument implies one-shot mode: market-insight TSLA");
    println!();
    println!(
        "The Gemini API key is read from the {} environment variable.",
        "GEMINI_API_KEY".green()
    );
}

fn main() -> anyhow::Result<()> {
    market_insight::utils::logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--generate-config") {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at: {:?}", path);
        println!("Edit this file to customize MarketInsight.");
        return Ok(());
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("{}", "GEMINI_API_KEY is not set.".red());
            eprintln!("Export your Gemini API key first, e.g.:");
            eprintln!("  export GEMINI_API_KEY=...");
            std::process::exit(1);
        }
    };

    let mut client = GeminiSearchClient::new(api_key)
        .with_model(config.api.model.clone())
        .with_timeout(std::time::Duration::from_secs(config.api.request_timeout_secs));
    if let Some(base_url) = &config.api.base_url {
        client = client.with_base_url(base_url.clone());
    }

    let use_classic = args.iter().any(|a| a == "--classic");
    let query: String = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");

    // A query argument means one-shot mode even without --classic.
    if use_classic || !query.is_empty() {
        if query.trim().is_empty() {
            eprintln!("{}", "Usage: market-insight --classic <QUERY>".red());
            std::process::exit(1);
        }
        return run_one_shot(&client, &query);
    }

    tui_app::run_tui(config, Arc::new(client))
}

fn run_one_shot(client: &GeminiSearchClient, query: &str) -> anyhow::Result<()> {
    use market_insight::search_client::StockSearch;

    println!("{}", format!("Searching for: {}", query).cyan());

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(client.search(query)) {
        Ok(result) => {
            report::print_result(&result);
            Ok(())
        }
        Err(e) => {
            tracing::error!(target: "search", "One-shot search failed: {}", e);
            eprintln!("{}", SEARCH_FAILED_MESSAGE.red());
            std::process::exit(1);
        }
    }
}
