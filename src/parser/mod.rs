pub mod extract;

use anyhow::Result;
use scraper::Html;

use crate::record::{DayRecord, ExtendedDayRecord};

/// Parse one fetched calendar page and run the basic extraction profile.
pub fn parse_day(html: &str) -> Result<DayRecord> {
    let doc = Html::parse_document(html);
    extract::day_record(&doc)
}

/// Parse one fetched calendar page and run the extended extraction profile.
pub fn parse_extended(html: &str) -> Result<ExtendedDayRecord> {
    let doc = Html::parse_document(html);
    extract::extended_record(&doc)
}
