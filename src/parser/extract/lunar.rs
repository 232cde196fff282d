use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

use crate::record::{LunarDay, LunarPosition};

use super::{text_of, SPAN};

static LUNA_WRAP: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cal_luna_wrap").unwrap());
static SOZV_ID: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.cal_luna_sozvId").unwrap());
static SOZV_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.cal_luna_sozvName").unwrap());
static POSITION_DESC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#descBlok_d5").unwrap());
static LUNAR_DATA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#descBlok_d6").unwrap());
static UL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul").unwrap());
static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static P: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

/// Lunar-day label of the basic profile: the first span inside the lunar
/// wrap.
pub fn lunar_day_label(doc: &Html) -> Result<String> {
    let wrap = doc
        .select(&LUNA_WRAP)
        .next()
        .context("lunar wrap (cal_luna_wrap) missing")?;
    let span = wrap
        .select(&SPAN)
        .next()
        .context("lunar wrap has no span")?;
    Ok(text_of(span))
}

pub fn lunar_position(doc: &Html) -> Result<LunarPosition> {
    let position = doc
        .select(&SOZV_ID)
        .next()
        .context("lunar position (cal_luna_sozvId) missing")?;
    let name = doc
        .select(&SOZV_NAME)
        .next()
        .context("lunar position name (cal_luna_sozvName) missing")?;
    let desc = doc
        .select(&POSITION_DESC)
        .next()
        .context("lunar position description (descBlok_d5) missing")?;
    Ok(LunarPosition {
        position: text_of(position),
        name: text_of(name),
        desc: text_of(desc),
    })
}

/// Extended lunar-day block: the full lunar-wrap text, plus properties and
/// description from the optional lunar-data block. Both stay `None` when
/// that block (or its list) is absent.
pub fn lunar_day(doc: &Html) -> Result<LunarDay> {
    let wrap = doc
        .select(&LUNA_WRAP)
        .next()
        .context("lunar wrap (cal_luna_wrap) missing")?;

    let mut lunar_properties = None;
    let mut lunar_description = None;

    if let Some(data) = doc.select(&LUNAR_DATA).next() {
        if let Some(list) = data.select(&UL).next() {
            lunar_properties = Some(
                list.select(&LI)
                    .map(|item| split_property(&text_of(item)))
                    .collect(),
            );
        }
        lunar_description = Some(
            data.select(&P)
                .map(|p| text_of(p).trim().to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    Ok(LunarDay {
        lunar_day: text_of(wrap),
        lunar_properties,
        lunar_description,
    })
}

/// A property item is `name - value`; exactly one `-` yields a 2-element
/// pair, anything else keeps only the leading part.
fn split_property(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.trim().split('-').collect();
    if parts.len() == 2 {
        vec![parts[0].trim().to_string(), parts[1].trim().to_string()]
    } else {
        vec![parts[0].trim().to_string()]
    }
}
