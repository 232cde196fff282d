use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::record::{DayRecord, ExtendedDayRecord};

/// Sub-collection holding extended-profile records.
pub const EXTENDED_SUBDIR: &str = "extended";

static FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})_(\d{1,2})_(\d{4})$").unwrap());

/// File name of one day's record: `{day}_{month}_{year}.json`, unpadded.
pub fn record_filename(date: NaiveDate) -> String {
    format!("{}_{}_{}.json", date.day(), date.month(), date.year())
}

/// Parse a record file stem (`5_3_2024`) back into its date. Rejects stems
/// that do not match the naming scheme or do not name a real calendar day.
pub fn filename_to_date(stem: &str) -> Result<NaiveDate> {
    let caps = FILE_RE
        .captures(stem)
        .with_context(|| format!("record file name {stem:?} is not day_month_year"))?;
    let day: u32 = caps[1].parse()?;
    let month: u32 = caps[2].parse()?;
    let year: i32 = caps[3].parse()?;
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("record file name {stem:?} is not a valid date"))
}

/// Zero-padded ISO date string used for the `days.date` column.
pub fn sqlite_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One-file-per-day record store under a results directory. Basic records
/// live at the root, extended records under `extended/`. Writes overwrite;
/// callers must not write the same key concurrently.
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn extended_dir(&self) -> PathBuf {
        self.root.join(EXTENDED_SUBDIR)
    }

    pub fn write_day(&self, date: NaiveDate, record: &DayRecord) -> Result<PathBuf> {
        write_json(&self.root, date, record)
    }

    pub fn write_extended(&self, date: NaiveDate, record: &ExtendedDayRecord) -> Result<PathBuf> {
        write_json(&self.extended_dir(), date, record)
    }

    pub fn read_day(&self, path: &Path) -> Result<DayRecord> {
        read_json(path)
    }

    pub fn read_extended(&self, path: &Path) -> Result<ExtendedDayRecord> {
        read_json(path)
    }

    /// Basic record files, sorted by file name. Skips the `extended/`
    /// sub-collection and anything not named like a day record.
    pub fn list_day_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("reading results directory {:?}", self.root))?;
        for entry in entries {
            let path = entry?.path();
            let is_record = path.is_file()
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| FILE_RE.is_match(s));
            if is_record {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Extended record files, sorted by file name.
    pub fn list_extended_files(&self) -> Result<Vec<PathBuf>> {
        let dir = self.extended_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn write_json<T: serde::Serialize>(dir: &Path, date: NaiveDate, record: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating results directory {dir:?}"))?;
    let path = dir.join(record_filename(date));
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json).with_context(|| format!("writing record {path:?}"))?;
    Ok(path)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading record {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("decoding record {path:?}"))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_day() -> DayRecord {
        DayRecord {
            day_attributes: vec![
                StyledText {
                    class: "cal_bz_green".into(),
                    text: "Стрижка".into(),
                },
                StyledText {
                    class: "cal_bz_red".into(),
                    text: "Поездки".into(),
                },
            ],
            lunar_day: "14 лунный день".into(),
            good_bad_attributes: GoodBadAttributes {
                good: vec!["money".into()],
                bad: vec!["haircut".into()],
            },
        }
    }

    fn sample_extended() -> ExtendedDayRecord {
        ExtendedDayRecord {
            good_bad: vec!["Хороший день".into()],
            good_to_do: vec![ActivityPair {
                name: "Торговля".into(),
                description: "Удачный день для сделок".into(),
            }],
            bad_to_do: vec![],
            lunar_position: LunarPosition {
                position: "Луна в знаке".into(),
                name: "Весы".into(),
                desc: "Описание".into(),
            },
            lunar_day: LunarDay {
                lunar_day: "14 лунный день".into(),
                lunar_properties: Some(vec![
                    vec!["Символ".into(), "труба".into()],
                    vec!["Камни".into()],
                ]),
                lunar_description: Some("Общее описание".into()),
            },
            time_list: vec![Vec::new(); HOUR_SLOTS],
            time_good_bad: vec![HourActivities::default(); HOUR_SLOTS],
            time_table: vec![Vec::new(); HOUR_SLOTS],
        }
    }

    #[test]
    fn filename_is_unpadded() {
        assert_eq!(record_filename(d(2024, 3, 5)), "5_3_2024.json");
        assert_eq!(record_filename(d(2023, 11, 15)), "15_11_2023.json");
    }

    #[test]
    fn filename_date_mapping_is_bijective() {
        for date in [d(2024, 3, 5), d(2023, 11, 15), d(2024, 2, 29)] {
            let name = record_filename(date);
            let stem = name.strip_suffix(".json").unwrap();
            assert_eq!(filename_to_date(stem).unwrap(), date);
        }
        assert_eq!(sqlite_date(filename_to_date("5_3_2024").unwrap()), "2024-03-05");
    }

    #[test]
    fn bad_stems_are_rejected() {
        assert!(filename_to_date("notes").is_err());
        assert!(filename_to_date("5_3").is_err());
        assert!(filename_to_date("40_40_2024").is_err());
        assert!(filename_to_date("29_2_2023").is_err());
    }

    #[test]
    fn day_record_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let record = sample_day();
        let path = store.write_day(d(2024, 3, 5), &record).unwrap();
        assert_eq!(path.file_name().unwrap(), "5_3_2024.json");
        assert_eq!(store.read_day(&path).unwrap(), record);
    }

    #[test]
    fn extended_record_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let record = sample_extended();
        let path = store.write_extended(d(2024, 1, 1), &record).unwrap();
        assert!(path.starts_with(dir.path().join(EXTENDED_SUBDIR)));
        assert_eq!(store.read_extended(&path).unwrap(), record);
    }

    #[test]
    fn rewriting_a_key_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let mut record = sample_day();
        store.write_day(d(2024, 3, 5), &record).unwrap();
        record.lunar_day = "15 лунный день".into();
        let path = store.write_day(d(2024, 3, 5), &record).unwrap();
        assert_eq!(store.read_day(&path).unwrap().lunar_day, "15 лунный день");
        assert_eq!(store.list_day_files().unwrap().len(), 1);
    }

    #[test]
    fn listing_skips_foreign_files_and_extended() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.write_day(d(2024, 1, 2), &sample_day()).unwrap();
        store.write_day(d(2024, 1, 10), &sample_day()).unwrap();
        store.write_extended(d(2024, 1, 2), &sample_extended()).unwrap();
        std::fs::write(dir.path().join("README.txt"), "not a record").unwrap();

        let files = store.list_day_files().unwrap();
        assert_eq!(files.len(), 2);
        // Lexicographic order: 10_1_2024 before 2_1_2024.
        assert_eq!(files[0].file_name().unwrap(), "10_1_2024.json");
        assert_eq!(files[1].file_name().unwrap(), "2_1_2024.json");
        assert_eq!(store.list_extended_files().unwrap().len(), 1);
    }

    #[test]
    fn absent_lunar_block_serializes_as_null() {
        let mut record = sample_extended();
        record.lunar_day.lunar_properties = None;
        record.lunar_day.lunar_description = None;
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"lunar_properties\":null"));
        assert!(json.contains("\"lunar_description\":null"));
    }
}
