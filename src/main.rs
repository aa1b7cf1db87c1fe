//! rw - rate a media collection in a full-coverage pseudo-random walk
//!
//! CLI entry point: resolves the item list from a glob pattern, opens the
//! session over file-backed stores, and dispatches one command per run.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, bail, eyre};
use tracing::info;

use ratewalk::cli::{Cli, Command};
use ratewalk::config::Config;
use ratewalk::{ConsoleProgress, Entry, JsonStore, RatingRecord, RatingSession};

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

/// Expand the item glob into the session's ordered item sequence
///
/// The walk only persists indexes, so the order must be stable across runs:
/// matches are sorted before use.
fn resolve_items(pattern: &str) -> Result<Vec<String>> {
    let mut items: Vec<String> = glob::glob(pattern)
        .context("Invalid items pattern")?
        .filter_map(|entry| entry.ok())
        .map(|path| path.to_string_lossy().into_owned())
        .collect();
    items.sort();
    if items.is_empty() {
        bail!("No items match pattern '{pattern}'");
    }
    Ok(items)
}

fn print_entry(entry: &Entry) {
    match &entry.rating {
        Some(rating) => {
            let fields = serde_json::to_string(&rating.fields).unwrap_or_default();
            println!("{} {}", entry.key.cyan(), fields.dimmed());
        }
        None => println!("{} {}", entry.key.cyan(), "(unrated)".yellow()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let key = cli.key.unwrap_or_else(|| config.key.clone());
    let pattern = cli
        .items
        .or_else(|| config.items.clone())
        .ok_or_else(|| eyre!("No items pattern given (use --items or set it in the config file)"))?;
    let items = resolve_items(&pattern)?;

    info!(key = %key, items = items.len(), "rw starting");

    let meta = JsonStore::open(&config.store_path, "walks")?;
    let ratings = JsonStore::open(&config.store_path, &format!("ratings-{key}"))?;
    let sink = ConsoleProgress::with_title(&key);

    let mut session = RatingSession::open(items, &key, Arc::new(meta), Arc::new(ratings), Arc::new(sink)).await?;

    match cli.command {
        Command::Status => {
            println!("Session: {}", session.key().cyan());
            println!("  Items: {}", session.len());
            println!("  Position: {} (step {})", session.position(), session.step());
            println!(
                "  {} / {}",
                format!("Saved: {}", session.saved_count()).green(),
                format!("Remaining: {}", session.remaining()).yellow()
            );
        }
        Command::Show => {
            let entry = session.current().await?;
            print_entry(&entry);
        }
        Command::Next => {
            let entry = session.advance().await?;
            print_entry(&entry);
        }
        Command::Prev => {
            let entry = session.retreat().await?;
            print_entry(&entry);
        }
        Command::Unrated => match session.advance_to_unrated().await? {
            Some(entry) => print_entry(&entry),
            None => println!("{}", "All items are rated".green()),
        },
        Command::Rate { fields } => {
            let fields: serde_json::Map<String, serde_json::Value> =
                serde_json::from_str(&fields).context("Rating fields must be a JSON object")?;
            let current = session.current().await?;
            let record = RatingRecord {
                key: current.key.clone(),
                fields,
            };
            session.record_rating(record).await?;
            println!("{} Rated: {}", "✓".green(), current.key.cyan());
        }
        Command::Export => {
            print!("{}", session.export().await?);
        }
        Command::Reset { force } => {
            if !force {
                print!("Delete all ratings for '{key}'? [y/N] ");
                std::io::stdout().flush()?;
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Aborted");
                    return Ok(());
                }
            }
            session.reset().await?;
            println!("{} Ratings cleared", "✓".green());
        }
    }

    Ok(())
}
