use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod db;
mod error;
mod insights;
mod models;
mod progress;
mod report;
mod severity;
mod trends;

use db::PgHistoryStore;

#[derive(Parser)]
#[command(name = "skin-progress")]
#[command(about = "Skin concern history tracker with progress reports", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import observations from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Append one observation to a user's history
    Record {
        #[arg(long)]
        email: String,
        /// Comma-separated concern labels
        #[arg(long, value_delimiter = ',')]
        concerns: Vec<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        skin_type: Option<String>,
        /// RFC 3339 timestamp, defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Print a user's full observation history as JSON
    History {
        #[arg(long)]
        email: String,
    },
    /// Generate a full progress report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = report::DEFAULT_DAYS_BACK,
              value_parser = clap::value_parser!(i64).range(7..=365))]
        days_back: i64,
        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the 30-day dashboard summary as JSON
    Summary {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} observations from {}.", csv.display());
        }
        Commands::Record {
            email,
            concerns,
            age,
            skin_type,
            at,
        } => {
            let concerns: Vec<String> = concerns
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            let id = db::record_observation(
                &pool,
                &email,
                &concerns,
                age,
                skin_type.as_deref(),
                at.unwrap_or_else(Utc::now),
            )
            .await?;
            println!("Recorded observation {id} for {email}.");
        }
        Commands::History { email } => {
            let history = db::list_history(&pool, &email).await?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        Commands::Report {
            email,
            days_back,
            format,
            out,
        } => {
            let store = PgHistoryStore::new(pool);
            let progress = report::full_report(&store, &email, days_back).await;
            let rendered = match format {
                ReportFormat::Json => serde_json::to_string_pretty(&progress)?,
                ReportFormat::Markdown => report::render_markdown(&email, days_back, &progress),
            };

            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Report written to {}.", path.display());
                }
                None => println!("{rendered}"),
            }
        }
        Commands::Summary { email } => {
            let store = PgHistoryStore::new(pool);
            let summary = report::quick_summary(&store, &email).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
