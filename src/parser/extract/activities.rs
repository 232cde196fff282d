use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::record::ActivityPair;

use super::{text_of, PARAM_DESC, PARAM_GOOD, PARAM_BAD};

static SUMMARY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#descBlok_d1").unwrap());
static GOOD_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#descBlok_d2").unwrap());
static BAD_BLOCK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("#descBlok_d3").unwrap());
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Free-text day summary paragraphs. Required on extended pages.
pub fn good_bad_summary(doc: &Html) -> Result<Vec<String>> {
    let block = doc
        .select(&SUMMARY)
        .next()
        .context("day summary block (descBlok_d1) missing")?;
    Ok(block.select(&P).map(text_of).collect())
}

/// Good-activity pairs from the optional good block; empty when absent.
pub fn good_to_do(doc: &Html) -> Vec<ActivityPair> {
    to_do_pairs(doc, &GOOD_BLOCK, &PARAM_GOOD)
}

/// Bad-activity pairs from the optional bad block; empty when absent.
pub fn bad_to_do(doc: &Html) -> Vec<ActivityPair> {
    to_do_pairs(doc, &BAD_BLOCK, &PARAM_BAD)
}

/// Names and descriptions are paired positionally, in document order.
fn to_do_pairs(doc: &Html, block: &Selector, name_sel: &Selector) -> Vec<ActivityPair> {
    let Some(block) = doc.select(block).next() else {
        return Vec::new();
    };
    let names = block.select(name_sel).map(text_of);
    let descriptions = block.select(&PARAM_DESC).map(text_of);
    names
        .zip(descriptions)
        .map(|(name, description)| ActivityPair { name, description })
        .collect()
}
