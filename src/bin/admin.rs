//! CLI administration tool for leakmail.
//!
//! Runs pieces of the detection pipeline by hand and inspects the store.
//!
//! # Usage
//!
//! ```bash
//! # Print every encoding searched for an address
//! cargo run --bin admin -- encodings jane@mail.example.com
//!
//! # Follow the redirect chain of a URL
//! cargo run --bin admin -- probe http://tracker.example/p.gif
//!
//! # Show the links extracted from an HTML file
//! cargo run --bin admin -- extract message.html
//!
//! # Analyze a raw message for a registered recipient
//! cargo run --bin admin -- analyze --from news@shop.com --to jane@mail.example.com message.eml
//!
//! # Show store statistics / check the database
//! cargo run --bin admin -- stats
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! `analyze`, `stats` and `db` read the same variables as the service
//! (`MAIL_DOMAIN`, `DATABASE_URL`, ...).

use leakmail::config;
use leakmail::domain::detection::{EncodingCatalog, extract};
use leakmail::infrastructure::http::{PageFetcher, RedirectClient};
use leakmail::server::{connect_repositories, load_components, spawn_probe_worker};
use leakmail::state::AppState;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::path::PathBuf;

/// CLI tool for leakmail.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Print the encoding catalog of an address
    Encodings {
        /// Email address
        address: String,
    },

    /// Fetch a URL and print its redirect chain
    Probe {
        url: String,
    },

    /// Print the links extracted from an HTML file
    Extract {
        file: PathBuf,
    },

    /// Analyze a raw RFC 5322 message as if it had just been received
    Analyze {
        /// Sender address
        #[arg(short, long)]
        from: String,

        /// Recipient address, must be registered
        #[arg(short, long)]
        to: String,

        /// Path to the raw message
        file: PathBuf,
    },

    /// Show store statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
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

    match cli.command {
        Commands::Encodings { address } => print_encodings(&address),
        Commands::Probe { url } => probe(&url).await?,
        Commands::Extract { file } => print_links(&file)?,
        Commands::Analyze { from, to, file } => analyze(&from, &to, &file).await?,
        Commands::Stats => handle_stats(&connect_database().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect_database().await?).await?,
    }

    Ok(())
}

fn print_encodings(address: &str) {
    println!("{}", "Encodings".bright_blue().bold());
    println!("  Address: {}", address.cyan());
    println!();

    for entry in &EncodingCatalog::for_address(address) {
        println!("  {:<16} {}", entry.name.bright_white(), entry.value);
    }
    println!();
}

async fn probe(url: &str) -> Result<()> {
    println!("{} {}", "Probing".bright_blue().bold(), url.cyan());
    println!();

    let client = RedirectClient::new().context("Failed to build redirect client")?;
    let chain = client.fetch(url).await.context("Probe failed")?;

    for (i, hop) in chain.redirects.iter().enumerate() {
        println!("  {:>2}. {}", (i + 1).to_string().bright_black(), hop);
    }
    if chain.redirects.is_empty() {
        println!("  {}", "No redirects".yellow());
    }

    let status = chain
        .final_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "timed out".to_string());
    println!();
    println!("  Final status: {}", status.bright_white().bold());

    for cookie in &chain.cookies {
        println!(
            "  Cookie: {}={} {}",
            cookie.name.cyan(),
            cookie.value,
            format!("({})", cookie.url).bright_black()
        );
    }
    println!();

    Ok(())
}

fn print_links(file: &PathBuf) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let content = extract(&html);

    println!("{}", "Extracted links".bright_blue().bold());
    println!();

    for link in &content.links {
        let size = match (&link.width, &link.height) {
            (Some(w), Some(h)) => format!(" {w}x{h}"),
            _ => String::new(),
        };
        println!(
            "  {:<7} {}{}",
            format!("{:?}", link.kind).bright_white(),
            link.url,
            size.bright_black()
        );
    }

    println!();
    println!(
        "  Total: {} ({} images, {} anchors)",
        content.links.len().to_string().bright_white().bold(),
        content.images().count(),
        content.anchors.len()
    );
    println!();

    Ok(())
}

async fn analyze(from: &str, to: &str, file: &PathBuf) -> Result<()> {
    let config = config::load_from_env()?;
    let raw = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let repositories = connect_repositories(&config).await?;
    let components = load_components(&config, repositories)?;
    let (scheduler, worker) = spawn_probe_worker(&config, &components)?;
    let state = AppState::new(components, scheduler);

    let report = state
        .ingest_service
        .handle_message(from, to, &raw)
        .await
        .map_err(|e| anyhow::anyhow!("Analysis failed: {}", e))?;

    let Some(report) = report else {
        println!("{} {}", "No such recipient:".red(), to);
        return Ok(());
    };

    println!("{}", "Analysis".bright_blue().bold());
    println!("  Leaks recorded:      {}", report.leaks_recorded.to_string().bright_green().bold());
    println!("  Probes scheduled:    {}", report.probes_scheduled.to_string().bright_green().bold());
    println!("  Link groups created: {}", report.link_groups_created.to_string().bright_green().bold());

    if report.probes_scheduled > 0 {
        println!();
        println!("{}", "Waiting for probes...".bright_black());
    }
    drop(state);
    worker.await.context("Probe worker panicked")?;
    println!();

    Ok(())
}

async fn connect_database() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Displays store statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let rows: [(&str, &str); 5] = [
        ("Users", "SELECT COUNT(*) FROM users"),
        ("Leaks", "SELECT COUNT(*) FROM leaked_emails"),
        ("Third-party leaks", "SELECT COALESCE(SUM(third_party_leak_count), 0)::BIGINT FROM users"),
        ("Redirect hops", "SELECT COUNT(*) FROM redirects"),
        ("Pending link groups", "SELECT COUNT(*) FROM link_groups"),
    ];

    for (label, sql) in rows {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        println!("  {:<20} {}", format!("{label}:"), count.to_string().bright_green().bold());
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
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
