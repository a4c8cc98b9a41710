//! CLI administration tool for short-url.
//!
//! Talks to the configured Redis store directly, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- create https://example.com/some/long/path
//!
//! # Resolve a token or a full short URL
//! cargo run --bin admin -- resolve 2bI
//!
//! # Inspect the ID counter
//! cargo run --bin admin -- counter show
//!
//! # Make the next allocated ID 50000 (never lowers the counter)
//! cargo run --bin admin -- counter seed --offset 50000
//!
//! # Check the store connection
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `short_url::config`.

use short_url::application::services::ShortenerService;
use short_url::config::{self, Config, mask_connection_string};
use short_url::domain::mapping_store::MappingStore;
use short_url::infrastructure::store::RedisStore;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing short-url.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a long URL
    Create {
        /// The long URL, stored byte for byte
        url: String,
    },

    /// Resolve a token or short URL to its long URL
    Resolve {
        /// Bare token (`2bI`) or full short URL
        token: String,
    },

    /// Inspect or seed the ID counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// ID counter subcommands.
#[derive(Subcommand)]
enum CounterAction {
    /// Show the current counter value
    Show,

    /// Raise the counter so the next allocated ID is `offset`
    Seed {
        /// Next ID to hand out (defaults to `ID_OFFSET`)
        #[arg(short, long)]
        offset: Option<u64>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Store subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check the store connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let store = RedisStore::connect(&config.redis_url, config.store_timeout())
        .await
        .with_context(|| {
            format!(
                "Failed to connect to Redis at {}",
                mask_connection_string(&config.redis_url)
            )
        })?;

    let shortener = ShortenerService::new(Arc::new(store), config.shortener_settings());

    match cli.command {
        Commands::Create { url } => create(&shortener, &url).await?,
        Commands::Resolve { token } => resolve(&shortener, &token).await?,
        Commands::Counter { action } => handle_counter_action(action, &shortener, &config).await?,
        Commands::Store { action } => handle_store_action(action, &shortener, &config).await?,
    }

    Ok(())
}

async fn create(shortener: &ShortenerService, url: &str) -> Result<()> {
    let link = shortener
        .create_link(url)
        .await
        .context("Failed to shorten URL")?;

    let status = if link.newly_allocated {
        "NEW".green()
    } else {
        "EXISTING".yellow()
    };

    println!();
    println!("  Long URL:  {}", url.bright_white());
    println!("  Token:     {}", link.token.as_str().cyan());
    println!("  Short URL: {}", link.short_url.bright_yellow().bold());
    println!("  Status:    {}", status);
    println!();

    Ok(())
}

async fn resolve(shortener: &ShortenerService, input: &str) -> Result<()> {
    let token = shortener.token_from_input(input);

    match shortener
        .resolve(token)
        .await
        .context("Failed to resolve token")?
    {
        Some(long_url) => {
            println!("  {} -> {}", token.cyan(), long_url.bright_white());
        }
        None => {
            println!("{}", format!("⚠️  Unknown token: {}", token).yellow());
        }
    }

    Ok(())
}

/// Dispatches counter subcommands.
async fn handle_counter_action(
    action: CounterAction,
    shortener: &ShortenerService,
    config: &Config,
) -> Result<()> {
    let mappings = shortener.mappings();

    match action {
        CounterAction::Show => show_counter(mappings, config).await?,
        CounterAction::Seed { offset, yes } => {
            seed_counter(mappings, offset.unwrap_or(config.id_offset), yes).await?
        }
    }

    Ok(())
}

async fn show_counter(mappings: &MappingStore, config: &Config) -> Result<()> {
    println!("{}", "🔢 ID Counter".bright_blue().bold());
    println!();
    println!("  Key:    {}", mappings.keys().counter_key().cyan());

    match mappings.current_counter().await? {
        Some(value) => {
            println!("  Value:  {}", value.bright_green().bold());
        }
        None => {
            println!("  Value:  {}", "not created yet".yellow());
            println!(
                "  The first create will allocate ID {}",
                config.id_offset.to_string().bright_white()
            );
        }
    }
    println!();

    Ok(())
}

/// Raises the counter so that the next increment yields `next_id`.
///
/// # Safety
///
/// - Never lowers the counter, so no ID is handed out twice
/// - Uses set-if-absent or compare-and-swap, so a concurrent allocation
///   makes the seed fail instead of being overwritten
/// - Requires confirmation unless `--yes` is given
async fn seed_counter(mappings: &MappingStore, next_id: u64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🌱 Seed ID Counter".bright_blue().bold());
    println!();

    let next_id = i64::try_from(next_id)
        .ok()
        .filter(|id| *id >= 1)
        .context("Offset must be between 1 and i64::MAX")?;
    let target = next_id - 1;

    let current = match mappings.current_counter().await? {
        Some(raw) => Some(
            raw.parse::<i64>()
                .with_context(|| format!("Counter holds a non-integer value '{}'", raw))?,
        ),
        None => None,
    };

    if let Some(current) = current
        && current >= target
    {
        println!(
            "{}",
            format!(
                "⚠️  Counter is already at {}; refusing to lower it to {}",
                current, target
            )
            .yellow()
        );
        return Ok(());
    }

    println!("  Key:     {}", mappings.keys().counter_key().cyan());
    println!(
        "  Current: {}",
        current
            .map(|c| c.to_string())
            .unwrap_or_else(|| "not created".to_string())
            .bright_black()
    );
    println!("  Next ID: {}", next_id.to_string().bright_green().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Seed the counter?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let seeded = match current {
        Some(current) => mappings.seed_counter(current, target).await?,
        None => mappings.init_counter(target).await?,
    };

    if seeded {
        println!("{}", "✅ Counter seeded".green().bold());
    } else {
        println!(
            "{}",
            "❌ Counter changed while seeding; nothing was written. Try again."
                .red()
                .bold()
        );
    }
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(
    action: StoreAction,
    shortener: &ShortenerService,
    config: &Config,
) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!(
                "{}",
                format!(
                    "🔍 Checking {}...",
                    mask_connection_string(&config.redis_url)
                )
                .bright_blue()
            );

            if shortener.mappings().ping().await {
                println!("{}", "✅ Store connection OK".green().bold());
            } else {
                anyhow::bail!("Store did not answer PING");
            }
        }
    }

    Ok(())
}
