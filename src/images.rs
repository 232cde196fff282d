use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::calendar;
use crate::store::RecordStore;

/// At most this many record files feed the attribute-name sets.
pub const DEFAULT_FILE_LIMIT: usize = 1000;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Deduplicated attribute names accumulated across record files.
#[derive(Debug, Default)]
pub struct AttributeNames {
    pub good: BTreeSet<String>,
    pub bad: BTreeSet<String>,
}

impl AttributeNames {
    pub fn len(&self) -> usize {
        self.good.len() + self.bad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.good.is_empty() && self.bad.is_empty()
    }
}

/// Fold the good/bad attribute names of the first `limit` record files
/// into two deduplicated sets.
pub fn collect_attribute_names(store: &RecordStore, limit: usize) -> Result<AttributeNames> {
    let files = store.list_day_files()?;
    files
        .iter()
        .take(limit)
        .try_fold(AttributeNames::default(), |mut acc, path| {
            let record = store.read_day(path)?;
            acc.good.extend(record.good_bad_attributes.good);
            acc.bad.extend(record.good_bad_attributes.bad);
            Ok(acc)
        })
}

pub struct FetchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Download one icon per attribute name into `{out_dir}/good/` and
/// `{out_dir}/bad/`, the good set first, bounded by `concurrency`. A
/// failed icon is logged and counted, not fatal.
pub async fn fetch_icons(
    names: &AttributeNames,
    out_dir: &Path,
    concurrency: usize,
) -> Result<FetchStats> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let total = names.len();
    let mut ok = 0usize;
    let mut errors = 0usize;

    for (kind, set) in [("good", &names.good), ("bad", &names.bad)] {
        let dir = out_dir.join(kind);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating image directory {dir:?}"))?;

        let mut handles = Vec::new();
        for name in set {
            let client = client.clone();
            let sem = Arc::clone(&semaphore);
            let url = calendar::icon_url(kind, name);
            let path = dir.join(format!("{name}.png"));

            handles.push((
                name.clone(),
                tokio::spawn(async move {
                    let _permit = sem.acquire().await.unwrap();
                    fetch_one(&client, &url, &path).await
                }),
            ));
        }

        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(())) => ok += 1,
                Ok(Err(e)) => {
                    warn!("{} {}: {:#}", kind, name, e);
                    errors += 1;
                }
                Err(e) => {
                    error!("Task panic for {} {}: {}", kind, name, e);
                    errors += 1;
                }
            }
        }
    }

    info!("Fetched {} icons ({} ok, {} errors)", total, ok, errors);
    Ok(FetchStats { total, ok, errors })
}

async fn fetch_one(client: &reqwest::Client, url: &str, path: &Path) -> Result<()> {
    let bytes = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    std::fs::write(path, &bytes).with_context(|| format!("writing icon {path:?}"))?;
    Ok(())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DayRecord, GoodBadAttributes, StyledText};
    use chrono::NaiveDate;

    fn record(good: &[&str], bad: &[&str]) -> DayRecord {
        DayRecord {
            day_attributes: vec![StyledText {
                class: "cal_bz_green".into(),
                text: "Стрижка".into(),
            }],
            lunar_day: "5 лунный день".into(),
            good_bad_attributes: GoodBadAttributes {
                good: good.iter().map(|s| s.to_string()).collect(),
                bad: bad.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn names_are_unioned_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.write_day(d(2024, 1, 1), &record(&["money", "trade"], &["haircut"])).unwrap();
        store.write_day(d(2024, 1, 2), &record(&["money"], &["travel", "haircut"])).unwrap();

        let names = collect_attribute_names(&store, DEFAULT_FILE_LIMIT).unwrap();
        assert_eq!(names.good.iter().collect::<Vec<_>>(), ["money", "trade"]);
        assert_eq!(names.bad.iter().collect::<Vec<_>>(), ["haircut", "travel"]);
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn file_limit_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        // Listing is sorted by file name: 1_1_2024 before 2_1_2024.
        store.write_day(d(2024, 1, 1), &record(&["money"], &[])).unwrap();
        store.write_day(d(2024, 1, 2), &record(&["trade"], &[])).unwrap();

        let names = collect_attribute_names(&store, 1).unwrap();
        assert_eq!(names.good.iter().collect::<Vec<_>>(), ["money"]);
        assert!(names.bad.is_empty());
    }
}
