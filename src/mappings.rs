use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::info;

use crate::calendar;
use crate::parser::extract::attributes;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which description dictionary to harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MappingKind {
    /// Day-attribute text → data-desc
    Attributes,
    /// Icon name → data-desc
    Icons,
}

/// Fetch every day in `[start, end]` sequentially and fold the pages into
/// one description mapping. Later pages win on key collision.
pub async fn scrape_mappings(
    start: NaiveDate,
    end: NaiveDate,
    kind: MappingKind,
) -> Result<BTreeMap<String, String>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;

    let days: Vec<(String, NaiveDate)> = calendar::day_urls(start, end).collect();
    let pb = ProgressBar::new(days.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut mapping = BTreeMap::new();
    for (url, _date) in days {
        let body = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        mapping = fold_page(mapping, &body, kind).with_context(|| format!("extracting {url}"))?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!("Collected {} mapping entries", mapping.len());
    Ok(mapping)
}

/// Fold one page into the accumulated mapping, passed and returned by
/// value.
pub fn fold_page(
    mut mapping: BTreeMap<String, String>,
    html: &str,
    kind: MappingKind,
) -> Result<BTreeMap<String, String>> {
    let doc = Html::parse_document(html);
    let pairs = match kind {
        MappingKind::Icons => attributes::icon_descriptions(&doc)?,
        MappingKind::Attributes => attributes::attribute_descriptions(&doc)?,
    };
    mapping.extend(pairs);
    Ok(mapping)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_fold_into_one_mapping() {
        let first = r#"
            <table class="cal_table_bz">
              <tr><td><span class="cal_bz_green" data-desc="первое">Стрижка</span></td></tr>
            </table>"#;
        let second = r#"
            <table class="cal_table_bz">
              <tr>
                <td><span class="cal_bz_red" data-desc="второе">Стрижка</span></td>
                <td><span class="cal_bz_green" data-desc="новое">Поездки</span></td>
              </tr>
            </table>"#;

        let mapping = BTreeMap::new();
        let mapping = fold_page(mapping, first, MappingKind::Attributes).unwrap();
        assert_eq!(mapping["Стрижка"], "первое");

        let mapping = fold_page(mapping, second, MappingKind::Attributes).unwrap();
        assert_eq!(mapping.len(), 2);
        // Later pages win on collision.
        assert_eq!(mapping["Стрижка"], "второе");
        assert_eq!(mapping["Поездки"], "новое");
    }

    #[test]
    fn icon_mapping_uses_file_stems() {
        let html = r#"
            <img class="cal_param_icon" src="/images/calendar/icon/good/money.png" data-desc="Деньги">
            <img class="cal_param_icon" src="/images/calendar/icon/bad/haircut.png" data-desc="Стрижка">"#;
        let mapping = fold_page(BTreeMap::new(), html, MappingKind::Icons).unwrap();
        assert_eq!(mapping["money"], "Деньги");
        assert_eq!(mapping["haircut"], "Стрижка");
    }
}
