use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use scraper::{Html, Selector};

use crate::record::{GoodBadAttributes, StyledText};

use super::{first_class, text_of, SPAN};

static DAY_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.cal_table_bz").unwrap());
static PARAM_ICONS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img.cal_param_icon").unwrap());

/// Day-attribute spans from the summary table: first class + text, in
/// document order.
pub fn day_attributes(doc: &Html) -> Result<Vec<StyledText>> {
    let table = doc
        .select(&DAY_TABLE)
        .next()
        .context("day attribute table (cal_table_bz) missing")?;
    table
        .select(&SPAN)
        .map(|span| {
            Ok(StyledText {
                class: first_class(span).context("day attribute span has no class")?,
                text: text_of(span),
            })
        })
        .collect()
}

/// Good/bad attribute names from the parameter icons, grouped by the
/// good/bad segment of each icon's path, document order preserved.
pub fn good_bad_attributes(doc: &Html) -> Result<GoodBadAttributes> {
    let mut out = GoodBadAttributes::default();
    for img in doc.select(&PARAM_ICONS) {
        let src = img
            .value()
            .attr("src")
            .context("cal_param_icon missing src attribute")?;
        let (kind, name) = icon_src_parts(src)?;
        match kind {
            "good" => out.good.push(name),
            "bad" => out.bad.push(name),
            other => bail!("icon {src:?} is in unrecognized group {other:?}"),
        }
    }
    Ok(out)
}

/// Icon name → data-desc pairs, for the mappings harvest.
pub fn icon_descriptions(doc: &Html) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for img in doc.select(&PARAM_ICONS) {
        let src = img
            .value()
            .attr("src")
            .context("cal_param_icon missing src attribute")?;
        let (_, name) = icon_src_parts(src)?;
        let desc = img
            .value()
            .attr("data-desc")
            .with_context(|| format!("icon {src:?} missing data-desc"))?;
        out.push((name, desc.to_string()));
    }
    Ok(out)
}

/// Day-attribute text → data-desc pairs, for the mappings harvest.
pub fn attribute_descriptions(doc: &Html) -> Result<Vec<(String, String)>> {
    let table = doc
        .select(&DAY_TABLE)
        .next()
        .context("day attribute table (cal_table_bz) missing")?;
    table
        .select(&SPAN)
        .map(|span| {
            let desc = span
                .value()
                .attr("data-desc")
                .context("day attribute span missing data-desc")?;
            Ok((text_of(span), desc.to_string()))
        })
        .collect()
}

/// Icon src is `/images/calendar/icon/{good|bad}/{name}.png`: segment 4 is
/// the group, segment 5's stem is the attribute name.
fn icon_src_parts(src: &str) -> Result<(&str, String)> {
    let parts: Vec<&str> = src.split('/').collect();
    let kind = *parts
        .get(4)
        .with_context(|| format!("icon src {src:?} has no group segment"))?;
    let name = parts
        .get(5)
        .and_then(|file| file.split('.').next())
        .filter(|stem| !stem.is_empty())
        .with_context(|| format!("icon src {src:?} has no file segment"))?;
    Ok((kind, name.to_string()))
}
