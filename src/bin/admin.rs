//! CLI administration tool for Trimly.
//!
//! Manages links, shows statistics and performs database checks without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a link
//! cargo run --bin admin -- links create example.com --alias promo
//!
//! # List links
//! cargo run --bin admin -- links list --page 2
//!
//! # Delete a link
//! cargo run --bin admin -- links delete 42
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
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! The tool does not share the server's link cache. Server-side cached
//! entries for a deleted link expire after `CACHE_TTL_SECONDS`.

use trimly::application::services::LinkService;
use trimly::domain::entities::{Link, RegisterLink};
use trimly::infrastructure::cache::NullCache;
use trimly::infrastructure::persistence::PgLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

const PAGE_SIZE: i64 = 25;

/// CLI tool for managing Trimly.
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
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Register a new short link
    Create {
        /// Destination URL (https:// is added when no scheme is given)
        url: String,

        /// Custom alias (3-20 letters, digits, '-' or '_')
        #[arg(short, long)]
        alias: Option<String>,

        /// Display title (defaults to the URL)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List links, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,

        /// Only links owned by this user
        #[arg(short, long)]
        user: Option<Uuid>,
    },

    /// Delete a link and its click history
    Delete {
        id: i64,

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

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));
    let service = LinkService::new(repo, Arc::new(NullCache::new()));

    match action {
        LinkAction::Create { url, alias, title } => {
            create_link(&service, url, alias, title).await?;
        }
        LinkAction::List { page, user } => {
            list_links(&service, page, user).await?;
        }
        LinkAction::Delete { id, yes } => {
            delete_link(&service, id, yes).await?;
        }
    }

    Ok(())
}

async fn create_link(
    service: &LinkService,
    url: String,
    alias: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let request = RegisterLink {
        long_url: url,
        custom_alias: alias,
        title,
        ..Default::default()
    };

    let link = service
        .register(request)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to register link: {}", e))?;

    println!("{}", "✅ Link registered".green().bold());
    println!();
    print_link_details(&link);
    println!();

    Ok(())
}

/// Lists links as a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links (page 1 of 3)
///
///   ID     Code                  Clicks    Created           Destination
///   ─────────────────────────────────────────────────────────────────────
///   42     promo                 17        2025-03-01 10:30  https://example.com/spring
/// ```
async fn list_links(service: &LinkService, page: i64, user: Option<Uuid>) -> Result<()> {
    let page = page.max(1);
    let total = service
        .count_links(user)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;
    let links = service
        .list_links(user, page, PAGE_SIZE)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    let pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    println!(
        "{}",
        format!("📋 Links (page {} of {})", page, pages)
            .bright_blue()
            .bold()
    );
    println!();

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<6} {:<21} {:<9} {:<17} {}",
        "ID".bright_white().bold(),
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<6} {:<21} {:<9} {:<17} {}",
            link.id.to_string().bright_black(),
            link.public_code().cyan(),
            link.clicks.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.long_url
        );
    }

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, id: i64, skip_confirm: bool) -> Result<()> {
    let link = service
        .get_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();
    print_link_details(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link and its click history?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

fn print_link_details(link: &Link) {
    println!("  ID:          {}", link.id.to_string().bright_black());
    println!("  Code:        {}", link.public_code().cyan());
    println!("  Destination: {}", link.long_url);
    if let Some(title) = &link.title {
        println!("  Title:       {}", title);
    }
    println!("  Clicks:      {}", link.clicks.to_string().bright_green());
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Total number of recorded clicks
/// - Sum of link counters (matches the click total unless recordings failed midway)
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    let counter_sum: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:          {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:         {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Counter total:  {}",
        counter_sum.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
