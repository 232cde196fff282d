use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;
use rusqlite::Connection;
use tracing::info;

use crate::record::DayRecord;
use crate::store::{self, RecordStore};

pub const DEFAULT_DB_PATH: &str = "data/calendar.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {parent:?}"))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS days (
            id   INTEGER PRIMARY KEY,
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS day_attributes (
            id     INTEGER PRIMARY KEY,
            day_id INTEGER NOT NULL REFERENCES days(id),
            class  TEXT NOT NULL,
            text   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_day_attributes_day ON day_attributes(day_id);

        -- type: 1 = good, 0 = bad
        CREATE TABLE IF NOT EXISTS attribute (
            id     INTEGER PRIMARY KEY,
            day_id INTEGER NOT NULL REFERENCES days(id),
            type   BOOLEAN NOT NULL,
            value  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_attribute_day ON attribute(day_id);
        ",
    )?;
    Ok(())
}

pub struct LoadCounts {
    pub days: usize,
    pub day_attributes: usize,
    pub attributes: usize,
}

impl LoadCounts {
    pub fn print(&self) {
        println!(
            "Loaded {} days, {} day attributes, {} good/bad attributes.",
            self.days, self.day_attributes, self.attributes,
        );
    }
}

/// Load every stored basic record into the schema. One `days` row per file
/// (date derived from the file name, zero-padded), then its child rows.
/// Runs inside a single transaction committed at the end, so a failure
/// leaves the database untouched. No deduplication: loading the same
/// records twice inserts them twice.
pub fn load_records(conn: &Connection, store: &RecordStore) -> Result<LoadCounts> {
    let files = store.list_day_files()?;
    info!("Loading {} record files from {:?}", files.len(), store.root());

    let mut counts = LoadCounts {
        days: 0,
        day_attributes: 0,
        attributes: 0,
    };

    let tx = conn.unchecked_transaction()?;
    {
        let mut day_stmt = tx.prepare("INSERT INTO days (date) VALUES (?1)")?;
        let mut attr_stmt =
            tx.prepare("INSERT INTO day_attributes (day_id, class, text) VALUES (?1, ?2, ?3)")?;
        let mut good_bad_stmt =
            tx.prepare("INSERT INTO attribute (day_id, type, value) VALUES (?1, ?2, ?3)")?;

        for chunk in files.chunks(500) {
            let parsed: Vec<Result<(String, DayRecord)>> = chunk
                .par_iter()
                .map(|path| {
                    let stem = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .with_context(|| format!("record path {path:?} has no stem"))?;
                    let date = store::filename_to_date(stem)?;
                    let record = store.read_day(path)?;
                    Ok((store::sqlite_date(date), record))
                })
                .collect();

            for item in parsed {
                let (date, record) = item?;
                day_stmt.execute(rusqlite::params![date])?;
                let day_id = tx.last_insert_rowid();

                for attr in &record.day_attributes {
                    attr_stmt.execute(rusqlite::params![day_id, attr.class, attr.text])?;
                    counts.day_attributes += 1;
                }
                for value in &record.good_bad_attributes.good {
                    good_bad_stmt.execute(rusqlite::params![day_id, true, value])?;
                    counts.attributes += 1;
                }
                for value in &record.good_bad_attributes.bad {
                    good_bad_stmt.execute(rusqlite::params![day_id, false, value])?;
                    counts.attributes += 1;
                }
                counts.days += 1;
            }
        }
    }
    tx.commit()?;
    Ok(counts)
}

// ── Stats ──

pub struct Stats {
    pub days: usize,
    pub day_attributes: usize,
    pub attributes: usize,
    pub good: usize,
    pub bad: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let days: usize = conn.query_row("SELECT COUNT(*) FROM days", [], |r| r.get(0))?;
    let day_attributes: usize =
        conn.query_row("SELECT COUNT(*) FROM day_attributes", [], |r| r.get(0))?;
    let attributes: usize = conn.query_row("SELECT COUNT(*) FROM attribute", [], |r| r.get(0))?;
    let good: usize = conn.query_row("SELECT COUNT(*) FROM attribute WHERE type = 1", [], |r| {
        r.get(0)
    })?;
    Ok(Stats {
        days,
        day_attributes,
        attributes,
        good,
        bad: attributes - good,
    })
}

// ── Tests ──
