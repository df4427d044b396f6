//! CLI administration tool for shortcode.
//!
//! Provides commands for inspecting and deleting short links and checking the
//! store without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links
//! cargo run --bin admin -- links list --limit 20
//!
//! # Delete a link
//! cargo run --bin admin -- links delete abc123
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same configuration as the server; see [`shortcode::config`].
//! Without `DATABASE_URL` the local SQLite file is opened.

use shortcode::config;
use shortcode::domain::repositories::UrlRepository;
use shortcode::infrastructure::persistence::open_repository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing shortcode.
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
    /// Inspect and delete short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List links, newest first
    List {
        /// Maximum number of links to show
        #[arg(short, long, default_value_t = 50)]
        limit: i64,

        /// Number of links to skip
        #[arg(short, long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a link by short code
    Delete {
        short_code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let repo = open_repository(&config)
        .await
        .context("Failed to open the store")?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, repo).await?,
        Commands::Stats => handle_stats(repo).await?,
        Commands::Db { action } => handle_db_action(action, repo).await?,
    }

    Ok(())
}

async fn handle_links_action(action: LinksAction, repo: Arc<dyn UrlRepository>) -> Result<()> {
    match action {
        LinksAction::List { limit, offset } => list_links(repo, limit, offset).await,
        LinksAction::Delete { short_code, yes } => delete_link(repo, short_code, yes).await,
    }
}

/// Prints a table of links with their access counts.
async fn list_links(repo: Arc<dyn UrlRepository>, limit: i64, offset: i64) -> Result<()> {
    if limit <= 0 || offset < 0 {
        anyhow::bail!("--limit must be positive and --offset must not be negative");
    }

    let links = repo
        .list(limit, offset)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;
    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!("{}", "Short Links".bright_blue().bold());
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:<6} {:<22} {:>8} {:<17} {}",
        "ID".bright_white().bold(),
        "CODE".bright_white().bold(),
        "HITS".bright_white().bold(),
        "CREATED".bright_white().bold(),
        "URL".bright_white().bold()
    );

    for link in &links {
        println!(
            "  {:<6} {:<22} {:>8} {:<17} {}",
            link.id.to_string().bright_black(),
            link.short_code.cyan(),
            link.access_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        links.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Deletes a link after showing it and asking for confirmation.
async fn delete_link(
    repo: Arc<dyn UrlRepository>,
    short_code: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Delete Short Link".bright_blue().bold());
    println!();

    let link = repo
        .find_by_code(&short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short code not found")?;

    println!("  Code:     {}", link.short_code.cyan());
    println!("  URL:      {}", link.url);
    println!("  Accesses: {}", link.access_count.to_string().bright_green());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo
        .delete_by_code(&short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    if deleted == 0 {
        println!("{}", "Link was already gone".yellow());
    } else {
        println!("{}", "Link deleted".green().bold());
    }
    println!();

    Ok(())
}

/// Displays the number of stored links.
async fn handle_stats(repo: Arc<dyn UrlRepository>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repo: Arc<dyn UrlRepository>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "Database connection OK".green().bold());
        }
    }

    Ok(())
}
