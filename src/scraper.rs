use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::calendar;
use crate::parser;
use crate::record::{DayRecord, ExtendedDayRecord};
use crate::store::RecordStore;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Harvest stats returned after completion.
pub struct HarvestStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Which extraction profile to run on each fetched page.
#[derive(Debug, Clone, Copy)]
pub enum Profile {
    Basic,
    Extended,
}

enum Payload {
    Basic(DayRecord),
    Extended(ExtendedDayRecord),
}

struct HarvestRow {
    date: NaiveDate,
    payload: Option<Payload>,
    error: Option<String>,
}

/// Fetch every day in `[start, end]` with at most `concurrency` requests in
/// flight, extract each page, and persist records as results arrive. A
/// failed day is recorded and skipped, never aborting the run.
pub async fn harvest(
    store: &RecordStore,
    start: NaiveDate,
    end: NaiveDate,
    profile: Profile,
    concurrency: usize,
) -> Result<HarvestStats> {
    let concurrency = concurrency.max(1);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    let semaphore = Arc::new(Semaphore::new(concurrency));

    let days: Vec<(String, NaiveDate)> = calendar::day_urls(start, end).collect();
    let total = days.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send extracted records, main loop writes the files
    let (tx, mut rx) = tokio::sync::mpsc::channel::<HarvestRow>(concurrency * 2);

    for (url, date) in days {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let row = match fetch_day(&client, &url, profile).await {
                Ok(payload) => HarvestRow {
                    date,
                    payload: Some(payload),
                    error: None,
                },
                Err(e) => HarvestRow {
                    date,
                    payload: None,
                    error: Some(format!("{e:#}")),
                },
            };
            let _ = tx.send(row).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;

    while let Some(row) = rx.recv().await {
        match row.payload {
            Some(payload) => match write_record(store, row.date, &payload) {
                Ok(()) => ok += 1,
                Err(e) => {
                    warn!("{}: {:#}", row.date, e);
                    errors += 1;
                }
            },
            None => {
                warn!("{}: {}", row.date, row.error.unwrap_or_default());
                errors += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Harvested {} days ({} ok, {} errors)", total, ok, errors);

    Ok(HarvestStats { total, ok, errors })
}

fn write_record(store: &RecordStore, date: NaiveDate, payload: &Payload) -> Result<()> {
    match payload {
        Payload::Basic(record) => store.write_day(date, record)?,
        Payload::Extended(record) => store.write_extended(date, record)?,
    };
    Ok(())
}

async fn fetch_day(client: &reqwest::Client, url: &str, profile: Profile) -> Result<Payload> {
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body of {url}"))?;

    match profile {
        Profile::Basic => {
            let record = parser::parse_day(&body).with_context(|| format!("extracting {url}"))?;
            Ok(Payload::Basic(record))
        }
        Profile::Extended => {
            let record =
                parser::parse_extended(&body).with_context(|| format!("extracting {url}"))?;
            Ok(Payload::Extended(record))
        }
    }
}
