use chrono::{Datelike, NaiveDate};

pub const BASE_URL: &str = "https://www.infengi.ru";

/// URL of the calendar page for one day. Query parameters are not
/// zero-padded; the site expects `day=5`, not `day=05`.
pub fn day_url(date: NaiveDate) -> String {
    format!(
        "{BASE_URL}/calendar?day={}&month={}&year={}",
        date.day(),
        date.month(),
        date.year()
    )
}

/// URL of a good/bad attribute icon. `kind` is `good` or `bad`.
pub fn icon_url(kind: &str, name: &str) -> String {
    format!("{BASE_URL}/images/calendar/icon/{kind}/{name}.png")
}

/// Lazy iterator over `(url, date)` pairs, one per calendar day in
/// `[start, end]` inclusive, in chronological order. Empty when
/// `start > end`.
pub fn day_urls(start: NaiveDate, end: NaiveDate) -> DayUrls {
    DayUrls {
        next: Some(start),
        end,
    }
}

pub struct DayUrls {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayUrls {
    type Item = (String, NaiveDate);

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next?;
        if date > self.end {
            self.next = None;
            return None;
        }
        self.next = date.succ_opt();
        Some((day_url(date), date))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn url_has_unpadded_query_params() {
        assert_eq!(
            day_url(d(2024, 3, 5)),
            "https://www.infengi.ru/calendar?day=5&month=3&year=2024"
        );
    }

    #[test]
    fn icon_url_splits_good_and_bad() {
        assert_eq!(
            icon_url("good", "money"),
            "https://www.infengi.ru/images/calendar/icon/good/money.png"
        );
        assert_eq!(
            icon_url("bad", "haircut"),
            "https://www.infengi.ru/images/calendar/icon/bad/haircut.png"
        );
    }

    #[test]
    fn inclusive_range_across_leap_boundary() {
        let days: Vec<_> = day_urls(d(2024, 2, 27), d(2024, 3, 2)).collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].1, d(2024, 2, 27));
        assert_eq!(days[2].1, d(2024, 2, 29));
        assert_eq!(days[4].1, d(2024, 3, 2));
        for pair in days.windows(2) {
            assert_eq!(pair[1].1, pair[0].1.succ_opt().unwrap());
        }
    }

    #[test]
    fn single_day_range() {
        let days: Vec<_> = day_urls(d(2021, 9, 1), d(2021, 9, 1)).collect();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].0, day_url(d(2021, 9, 1)));
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(day_urls(d(2024, 1, 2), d(2024, 1, 1)).count(), 0);
    }

    #[test]
    fn range_is_restartable() {
        let make = || day_urls(d(2024, 1, 1), d(2024, 1, 10));
        assert_eq!(make().count(), 10);
        assert_eq!(make().count(), 10);
    }
}
