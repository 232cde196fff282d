pub mod activities;
pub mod attributes;
pub mod hours;
pub mod lunar;

use std::sync::LazyLock;

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use crate::record::{DayRecord, ExtendedDayRecord};

pub(crate) static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
pub(crate) static PARAM_DESC: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cal_param_desc").unwrap());
pub(crate) static PARAM_GOOD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cal_param_name.param_good").unwrap());
pub(crate) static PARAM_BAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cal_param_name.param_bad").unwrap());

/// Concatenated text of an element, in document order.
pub(crate) fn text_of(el: ElementRef) -> String {
    el.text().collect()
}

/// First class token of an element.
pub(crate) fn first_class(el: ElementRef) -> Option<String> {
    el.value().classes().next().map(str::to_string)
}

/// Basic extraction profile.
pub fn day_record(doc: &Html) -> Result<DayRecord> {
    Ok(DayRecord {
        day_attributes: attributes::day_attributes(doc)?,
        lunar_day: lunar::lunar_day_label(doc)?,
        good_bad_attributes: attributes::good_bad_attributes(doc)?,
    })
}

/// Extended extraction profile: everything the page carries, with absent
/// optional sections degraded to empty placeholders.
pub fn extended_record(doc: &Html) -> Result<ExtendedDayRecord> {
    Ok(ExtendedDayRecord {
        good_bad: activities::good_bad_summary(doc)?,
        good_to_do: activities::good_to_do(doc),
        bad_to_do: activities::bad_to_do(doc),
        lunar_position: lunar::lunar_position(doc)?,
        lunar_day: lunar::lunar_day(doc)?,
        time_list: hours::time_list(doc)?,
        time_good_bad: hours::time_good_bad(doc)?,
        time_table: hours::time_table(doc)?,
    })
}

// ── Tests ──
