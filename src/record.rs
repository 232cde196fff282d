use serde::{Deserialize, Serialize};

/// A classed text node pulled out of the page markup: the element's first
/// class plus its collected text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledText {
    pub class: String,
    pub text: String,
}

/// Attribute names grouped by the good/bad segment of their icon path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodBadAttributes {
    pub good: Vec<String>,
    pub bad: Vec<String>,
}

/// Basic per-day record (the `scrape` command without `--extended`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day_attributes: Vec<StyledText>,
    pub lunar_day: String,
    pub good_bad_attributes: GoodBadAttributes,
}

/// An activity name paired with its free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPair {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarPosition {
    pub position: String,
    pub name: String,
    pub desc: String,
}

/// Lunar-day block of the extended profile.
///
/// `lunar_properties` and `lunar_description` are `None` when the lunar-data
/// block (or its list) is absent from the page, as opposed to present but
/// empty. Each property is the 1- or 2-element result of splitting a list
/// item on `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunarDay {
    pub lunar_day: String,
    pub lunar_properties: Option<Vec<Vec<String>>>,
    pub lunar_description: Option<String>,
}

/// Good/bad activity pairs for one hour slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourActivities {
    pub good: Vec<ActivityPair>,
    pub bad: Vec<ActivityPair>,
}

/// Extended per-day record (the `scrape --extended` command).
///
/// The three `time_*` vectors always hold exactly [`HOUR_SLOTS`] entries,
/// with empty placeholders for hour slots missing from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedDayRecord {
    pub good_bad: Vec<String>,
    pub good_to_do: Vec<ActivityPair>,
    pub bad_to_do: Vec<ActivityPair>,
    pub lunar_position: LunarPosition,
    pub lunar_day: LunarDay,
    pub time_list: Vec<Vec<StyledText>>,
    pub time_good_bad: Vec<HourActivities>,
    pub time_table: Vec<Vec<StyledText>>,
}

/// Number of per-hour slots on a day page.
pub const HOUR_SLOTS: usize = 13;
