//! `marquee onboard` — First-time setup.

use marquee_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("Marquee — First-Time Setup");
    println!("==========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    } else {
        println!("Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\nConfig already exists at: {}", config_path.display());
        println!("Edit it manually or delete and re-run onboard.\n");
    } else {
        let default_toml = AppConfig::default_toml();
        std::fs::write(&config_path, &default_toml)?;
        println!("Created config.toml at: {}", config_path.display());
        println!("\nNext steps:");
        println!("  1. Edit {} and add your API keys,", config_path.display());
        println!("     or set them in the environment:");
        println!("       OPENAI_API_KEY   — completion backend");
        println!("       TMDB_API_KEY     — now-playing listings and reviews");
        println!("       SERPAPI_API_KEY  — showtimes");
        println!("  2. Run: marquee chat\n");
    }

    println!("Setup complete. Run `marquee chat` to start.\n");

    Ok(())
}
