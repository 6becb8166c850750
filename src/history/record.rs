//! The aggregated buckets plotted by the history chart and their axis labels.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// How much time the history chart spans.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// One bucket per month of a year.
    Year,
    /// One bucket per day of a month.
    #[default]
    Month,
}

impl Timeframe {
    /// The name used in query strings, e.g. "year".
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Year => "year",
            Timeframe::Month => "month",
        }
    }
}

/// The income and expense totals of one bucket of the history chart.
///
/// `month` is zero-based (0 is January). When `day` is absent the bucket
/// covers a whole month and dates are built with the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// The calendar year, e.g. 2025.
    pub year: i32,
    /// Zero-based month of the year.
    pub month: i32,
    /// Day of the month for daily buckets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
    /// Total income of the bucket.
    pub income: f64,
    /// Total expenses of the bucket.
    pub expense: f64,
}

impl HistoryRecord {
    /// Income minus expense, negative when more went out than came in.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Build the calendar date for a zero-based `month` and a one-based `day`.
///
/// Values outside their usual range roll over into the neighbouring months
/// and years, e.g. month 12 is January of the next year and day 0 is the last
/// day of the previous month. Returns `None` if the result does not fit in the
/// supported calendar range.
pub fn calendar_date(year: i32, month: i32, day: i32) -> Option<Date> {
    let total_months = i64::from(year) * 12 + i64::from(month);
    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(total_months.rem_euclid(12) + 1).ok()?).ok()?;

    let first_of_month = Date::from_calendar_date(year, month, 1).ok()?;

    first_of_month.checked_add(Duration::days(i64::from(day) - 1))
}

/// The x-axis label for `record`.
///
/// A year timeframe shows the full month name, e.g. "January", and ignores
/// the day. A month timeframe shows the two-digit day of the month, e.g. "07".
pub fn axis_label(record: &HistoryRecord, timeframe: Timeframe) -> String {
    let date = match timeframe {
        Timeframe::Year => calendar_date(record.year, record.month, 1),
        Timeframe::Month => calendar_date(record.year, record.month, record.day.unwrap_or(1)),
    };

    match (date, timeframe) {
        (Some(date), Timeframe::Year) => date.month().to_string(),
        (Some(date), Timeframe::Month) => format!("{:02}", date.day()),
        (None, _) => "Invalid Date".to_owned(),
    }
}

/// The x-axis labels for `records`, in the same order.
pub fn axis_labels(records: &[HistoryRecord], timeframe: Timeframe) -> Vec<String> {
    records
        .iter()
        .map(|record| axis_label(record, timeframe))
        .collect()
}

#[cfg(test)]
mod calendar_date_tests {
    use time::macros::date;

    use super::calendar_date;

    #[test]
    fn month_is_zero_based() {
        assert_eq!(calendar_date(2024, 0, 1), Some(date!(2024 - 01 - 01)));
        assert_eq!(calendar_date(2024, 11, 31), Some(date!(2024 - 12 - 31)));
    }

    #[test]
    fn month_overflow_rolls_into_next_year() {
        assert_eq!(calendar_date(2024, 12, 1), Some(date!(2025 - 01 - 01)));
        assert_eq!(calendar_date(2024, 25, 1), Some(date!(2026 - 02 - 01)));
    }

    #[test]
    fn negative_month_rolls_into_previous_year() {
        assert_eq!(calendar_date(2024, -1, 1), Some(date!(2023 - 12 - 01)));
    }

    #[test]
    fn day_zero_is_last_day_of_previous_month() {
        assert_eq!(calendar_date(2024, 2, 0), Some(date!(2024 - 02 - 29)));
        assert_eq!(calendar_date(2023, 2, 0), Some(date!(2023 - 02 - 28)));
    }

    #[test]
    fn day_overflow_rolls_into_next_month() {
        assert_eq!(calendar_date(2025, 1, 30), Some(date!(2025 - 03 - 02)));
    }

    #[test]
    fn out_of_range_year_is_none() {
        assert_eq!(calendar_date(i32::MAX, 0, 1), None);
        assert_eq!(calendar_date(100_000, 0, 1), None);
    }
}
