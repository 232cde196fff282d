mod calendar;
mod db;
mod images;
mod mappings;
mod parser;
mod record;
mod scraper;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::mappings::MappingKind;
use crate::store::RecordStore;

#[derive(Parser)]
#[command(name = "infengi_scraper", about = "infengi.ru lunar calendar scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape daily calendar pages into per-day JSON records
    Scrape {
        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day of the range, inclusive
        #[arg(long)]
        end: NaiveDate,
        /// Run the extended extraction profile (descriptions, lunar data, hour tables)
        #[arg(long)]
        extended: bool,
        /// Max simultaneously in-flight requests
        #[arg(short, long, default_value_t = 20)]
        concurrency: usize,
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },
    /// Load accumulated day records into the SQLite schema
    ToSql {
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Download the good/bad attribute icons referenced by stored records
    Images {
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
        #[arg(long, default_value = "images")]
        out_dir: PathBuf,
        /// Max simultaneously in-flight requests
        #[arg(short, long, default_value_t = 20)]
        concurrency: usize,
        /// Max record files to read attribute names from
        #[arg(long, default_value_t = images::DEFAULT_FILE_LIMIT)]
        limit: usize,
    },
    /// Harvest attribute/icon description mappings over a date range
    Mappings {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, value_enum, default_value = "attributes")]
        kind: MappingKind,
    },
    /// Show record store and database statistics
    Stats {
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
        #[arg(long, default_value = db::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape {
            start,
            end,
            extended,
            concurrency,
            results_dir,
        } => {
            if start > end {
                bail!("start date {start} is after end date {end}");
            }
            let store = RecordStore::new(results_dir);
            let profile = if extended {
                scraper::Profile::Extended
            } else {
                scraper::Profile::Basic
            };
            println!("Scraping {start} → {end} (streaming to {:?})...", store.root());
            let stats = scraper::harvest(&store, start, end, profile, concurrency).await?;
            println!(
                "Done: {} days ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::ToSql { results_dir, db } => {
            let store = RecordStore::new(results_dir);
            if store.list_day_files()?.is_empty() {
                println!("No record files. Run 'scrape' first.");
                return Ok(());
            }
            let conn = db::connect(&db)?;
            db::init_schema(&conn)?;
            let counts = db::load_records(&conn, &store)?;
            counts.print();
            Ok(())
        }
        Commands::Images {
            results_dir,
            out_dir,
            concurrency,
            limit,
        } => {
            let store = RecordStore::new(results_dir);
            let names = images::collect_attribute_names(&store, limit)?;
            if names.is_empty() {
                println!("No attribute names found. Run 'scrape' first.");
                return Ok(());
            }
            println!(
                "Fetching {} icons ({} good, {} bad)...",
                names.len(),
                names.good.len(),
                names.bad.len()
            );
            let stats = images::fetch_icons(&names, &out_dir, concurrency).await?;
            println!(
                "Done: {} icons ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Mappings { start, end, kind } => {
            if start > end {
                bail!("start date {start} is after end date {end}");
            }
            let mapping = mappings::scrape_mappings(start, end, kind).await?;
            println!("{}", serde_json::to_string_pretty(&mapping)?);
            Ok(())
        }
        Commands::Stats { results_dir, db } => {
            let store = RecordStore::new(results_dir);
            let basic = store.list_day_files().map(|f| f.len()).unwrap_or(0);
            let extended = store.list_extended_files().map(|f| f.len()).unwrap_or(0);
            println!("Basic records:    {basic}");
            println!("Extended records: {extended}");
            if db.exists() {
                let conn = db::connect(&db)?;
                let s = db::get_stats(&conn)?;
                println!("Days:             {}", s.days);
                println!("Day attributes:   {}", s.day_attributes);
                println!(
                    "Good/bad rows:    {} ({} good, {} bad)",
                    s.attributes, s.good, s.bad
                );
            } else {
                println!("Database {db:?} not created yet.");
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
