//! Calendar navigation helpers.
//!
//! Everything here takes "today" as an argument so that callers decide the
//! clock and tests stay deterministic.

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Calendar display granularity.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CalMode {
    Day,
    Week,
    Month,
}

impl CalMode {
    pub fn parse(value: &str) -> Option<CalMode> {
        match value {
            "day" => Some(CalMode::Day),
            "week" => Some(CalMode::Week),
            "month" => Some(CalMode::Month),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalMode::Day => "day",
            CalMode::Week => "week",
            CalMode::Month => "month",
        }
    }
}

/// `YYYY-MM-DD` key used for `Task::date`.
///
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// The date a calendar view is centred on, `offset` periods away from today.
/// Month steps clamp the day to the target month's length.
///
pub fn focus_date(mode: CalMode, offset: i32, today: NaiveDate) -> NaiveDate {
    match mode {
        CalMode::Day => today + Duration::days(offset as i64),
        CalMode::Week => today + Duration::days(offset as i64 * 7),
        CalMode::Month => {
            let months = Months::new(offset.unsigned_abs());
            let shifted = if offset >= 0 {
                today.checked_add_months(months)
            } else {
                today.checked_sub_months(months)
            };
            shifted.unwrap_or(today)
        }
    }
}

/// The Sunday-starting week containing `date`.
///
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    let start = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// Whole Sunday-starting weeks covering the month of `date`, padded with
/// days from the neighbouring months.
///
pub fn month_grid(date: NaiveDate) -> Vec<NaiveDate> {
    let first = date.with_day(1).unwrap_or(date);
    let lead = first.weekday().num_days_from_sunday() as i64;
    let days_in_month = days_in_month(first);
    let cells = ((lead + days_in_month) as f64 / 7.0).ceil() as i64 * 7;
    let start = first - Duration::days(lead);
    (0..cells).map(|i| start + Duration::days(i)).collect()
}

fn days_in_month(first: NaiveDate) -> i64 {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => (next - first).num_days(),
        None => 31,
    }
}

/// Heading for the period shown by a calendar view, e.g. "Tue, Jan 2 · today",
/// "Dec 31 – Jan 6" or "January 2024".
///
pub fn period_label(mode: CalMode, focus: NaiveDate, today: NaiveDate) -> String {
    match mode {
        CalMode::Day => {
            let mut label = focus.format("%a, %b %-d").to_string();
            if focus == today {
                label.push_str(" · today");
            }
            label
        }
        CalMode::Week => {
            let days = week_days(focus);
            let (start, end) = (days[0], days[6]);
            if start.month() == end.month() {
                format!("{} – {}", start.format("%b %-d"), end.day())
            } else {
                format!("{} – {}", start.format("%b %-d"), end.format("%b %-d"))
            }
        }
        CalMode::Month => focus.format("%B %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn keys_round_trip_through_parse() {
        assert_eq!(date_key(ymd(2024, 3, 7)), "2024-03-07");
        assert_eq!(parse_date("2024-03-07"), Some(ymd(2024, 3, 7)));
        assert_eq!(parse_date("07/03/2024"), None);
    }

    #[test]
    fn focus_moves_by_period() {
        let today = ymd(2024, 1, 31);
        assert_eq!(focus_date(CalMode::Day, 0, today), today);
        assert_eq!(focus_date(CalMode::Day, -1, today), ymd(2024, 1, 30));
        assert_eq!(focus_date(CalMode::Week, 2, today), ymd(2024, 2, 14));
        assert_eq!(focus_date(CalMode::Month, 1, today), ymd(2024, 2, 29));
        assert_eq!(focus_date(CalMode::Month, -2, today), ymd(2023, 11, 30));
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-03 is a Wednesday.
        let days = week_days(ymd(2024, 1, 3));
        assert_eq!(days.first(), Some(&ymd(2023, 12, 31)));
        assert_eq!(days.last(), Some(&ymd(2024, 1, 6)));
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn month_grid_covers_whole_weeks() {
        // February 2024 starts on a Thursday and has 29 days.
        let grid = month_grid(ymd(2024, 2, 14));
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0], ymd(2024, 1, 28));
        assert_eq!(grid[4], ymd(2024, 2, 1));
        assert_eq!(grid[34], ymd(2024, 3, 2));
    }

    #[test]
    fn labels() {
        let today = ymd(2024, 1, 2);
        assert_eq!(period_label(CalMode::Day, today, today), "Tue, Jan 2 · today");
        assert_eq!(period_label(CalMode::Day, ymd(2024, 1, 3), today), "Wed, Jan 3");
        assert_eq!(period_label(CalMode::Week, ymd(2024, 1, 10), today), "Jan 7 – 13");
        assert_eq!(period_label(CalMode::Week, today, today), "Dec 31 – Jan 6");
        assert_eq!(period_label(CalMode::Month, today, today), "January 2024");
    }

    #[test]
    fn modes_parse_from_names() {
        assert_eq!(CalMode::parse("week"), Some(CalMode::Week));
        assert_eq!(CalMode::parse("year"), None);
        assert_eq!(CalMode::Month.as_str(), "month");
    }
}
