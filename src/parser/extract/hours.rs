use std::sync::LazyLock;

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};

use crate::record::{ActivityPair, HourActivities, StyledText, HOUR_SLOTS};

use super::{first_class, text_of, PARAM_DESC, PARAM_GOOD, PARAM_BAD, SPAN};

static HOUR_LIST: LazyLock<Selector> = LazyLock::new(|| Selector::parse("ul#cal_day_chas").unwrap());
static LI: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());
static DAY_RIGHT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.cal_day_right").unwrap());
static DAY_LEFT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.cal_day_left").unwrap());
static FULL_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.cal_table_bz_full").unwrap());
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// Up to 2 labeled spans per hour slot from the hour list. The list itself
/// is required; absent slots degrade to empty entries.
pub fn time_list(doc: &Html) -> Result<Vec<Vec<StyledText>>> {
    let list = doc
        .select(&HOUR_LIST)
        .next()
        .context("hour list (cal_day_chas) missing")?;
    let items: Vec<ElementRef> = list.select(&LI).collect();

    let mut slots = Vec::with_capacity(HOUR_SLOTS);
    for i in 1..=HOUR_SLOTS {
        let id = format!("cal_day_chas_{i}");
        let Some(item) = items.iter().find(|li| li.value().id() == Some(id.as_str())) else {
            slots.push(Vec::new());
            continue;
        };
        let spans = item
            .select(&SPAN)
            .take(2)
            .map(|span| {
                Ok(StyledText {
                    class: first_class(span)
                        .with_context(|| format!("hour slot {i} span has no class"))?,
                    text: text_of(span),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        slots.push(spans);
    }
    Ok(slots)
}

/// Good/bad activity pairs per hour slot. Good names consume the shared
/// description list from the front; bad names take the remainder. The
/// markup lists all good entries before the bad ones, so this positional
/// pairing must not be reordered.
pub fn time_good_bad(doc: &Html) -> Result<Vec<HourActivities>> {
    let mut slots = Vec::with_capacity(HOUR_SLOTS);
    for i in 1..=HOUR_SLOTS {
        let Some(div) = slot_div(doc, i) else {
            slots.push(HourActivities::default());
            continue;
        };
        let right = div
            .select(&DAY_RIGHT)
            .next()
            .with_context(|| format!("hour slot {i} has no cal_day_right"))?;

        let good_names: Vec<String> = right.select(&PARAM_GOOD).map(text_of).collect();
        let bad_names: Vec<String> = right.select(&PARAM_BAD).map(text_of).collect();
        let descriptions: Vec<String> = right.select(&PARAM_DESC).map(text_of).collect();

        let good: Vec<ActivityPair> = good_names
            .into_iter()
            .zip(descriptions.iter())
            .map(|(name, description)| ActivityPair {
                name,
                description: description.clone(),
            })
            .collect();
        let bad: Vec<ActivityPair> = bad_names
            .into_iter()
            .zip(descriptions.iter().skip(good.len()))
            .map(|(name, description)| ActivityPair {
                name,
                description: description.clone(),
            })
            .collect();

        slots.push(HourActivities { good, bad });
    }
    Ok(slots)
}

/// Flattened hour-detail table per slot: every cell's span as class + text,
/// row-major. A cell without a span is malformed markup.
pub fn time_table(doc: &Html) -> Result<Vec<Vec<StyledText>>> {
    let mut slots = Vec::with_capacity(HOUR_SLOTS);
    for i in 1..=HOUR_SLOTS {
        let Some(div) = slot_div(doc, i) else {
            slots.push(Vec::new());
            continue;
        };
        let left = div
            .select(&DAY_LEFT)
            .next()
            .with_context(|| format!("hour slot {i} has no cal_day_left"))?;
        let table = left
            .select(&FULL_TABLE)
            .next()
            .with_context(|| format!("hour slot {i} has no cal_table_bz_full"))?;

        let mut cells = Vec::new();
        for row in table.select(&TR) {
            for col in row.select(&TD) {
                let span = col
                    .select(&SPAN)
                    .next()
                    .with_context(|| format!("hour slot {i} table cell has no span"))?;
                cells.push(StyledText {
                    class: first_class(span)
                        .with_context(|| format!("hour slot {i} table span has no class"))?,
                    text: text_of(span),
                });
            }
        }
        slots.push(cells);
    }
    Ok(slots)
}

fn slot_div(doc: &Html, slot: usize) -> Option<ElementRef<'_>> {
    let id = format!("cal_chas_tbl{slot}");
    doc.select(&DIV).find(|div| div.value().id() == Some(id.as_str()))
}
