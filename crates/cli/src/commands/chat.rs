//! `marquee chat` — Interactive or single-message chat mode.

use crate::sink::StdoutSink;
use marquee_assistant::{Assistant, Dispatcher};
use marquee_config::AppConfig;
use marquee_core::function::CapabilitySet;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!("    MARQUEE_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let client = marquee_providers::build_from_config(&config)?;
    let movie_api = Arc::new(marquee_functions::build_from_config(&config));

    let capabilities = if config.assistant.confirm_purchases {
        CapabilitySet::two_step()
    } else {
        CapabilitySet::one_step()
    };

    let assistant = Assistant::new(
        client,
        Dispatcher::new(movie_api, capabilities),
        &config.model,
    )
    .with_temperature(config.temperature)
    .with_max_tokens(config.max_tokens)
    .with_max_rounds(config.assistant.max_rounds)
    .with_repeat_limit(config.assistant.repeat_limit);

    let mut transcript = assistant.new_transcript();
    let sink = StdoutSink;

    if let Some(msg) = message {
        // Single message mode
        assistant.handle_message(&mut transcript, &msg, &sink).await?;
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  Marquee — your movie assistant");
    println!();
    println!("  Model: {}", config.model);
    if config.tmdb.api_key.is_none() {
        println!("  Note: TMDB_API_KEY not set; listings and reviews are unavailable.");
    }
    if config.serp.api_key.is_none() {
        println!("  Note: SERPAPI_API_KEY not set; showtimes are unavailable.");
    }
    println!();
    println!("  Ask about movies, showtimes, or tickets.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_prompt()?;
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            print_prompt()?;
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        println!();
        if let Err(e) = assistant.handle_message(&mut transcript, input, &sink).await {
            eprintln!("  [Error] {e}");
        }
        println!();

        print_prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn print_prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}
