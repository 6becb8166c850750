//! Aggregates transactions into the buckets of the history chart.

use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error,
    history::{HistoryRecord, Timeframe},
    transaction::TransactionKind,
};

/// The raw `timeframe`, `year` and `month` query parameters.
///
/// Missing values default to the current period.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HistoryQuery {
    pub timeframe: Option<Timeframe>,
    pub year: Option<i32>,
    /// Zero-based, 0 is January.
    pub month: Option<i32>,
}

/// A validated period to show in the history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPeriod {
    pub timeframe: Timeframe,
    pub year: i32,
    /// Zero-based, always in the range 0 to 11.
    pub month: i32,
}

impl HistoryPeriod {
    /// Fill in the blanks of `query` with the period containing `today`.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidHistoryPeriod] if the month is not between 0 and
    /// 11 or the year is outside the supported calendar range.
    pub fn resolve(query: HistoryQuery, today: Date) -> Result<Self, Error> {
        let period = Self {
            timeframe: query.timeframe.unwrap_or_default(),
            year: query.year.unwrap_or(today.year()),
            month: query
                .month
                .unwrap_or(i32::from(u8::from(today.month())) - 1),
        };

        first_of_month(period.year, period.month)?;

        Ok(period)
    }

    /// A human readable name for the period, e.g. "March 2025" or "2025".
    pub fn title(&self) -> String {
        match self.timeframe {
            Timeframe::Year => self.year.to_string(),
            Timeframe::Month => match first_of_month(self.year, self.month) {
                Ok(date) => format!("{} {}", date.month(), self.year),
                Err(_) => self.year.to_string(),
            },
        }
    }
}

fn first_of_month(year: i32, month: i32) -> Result<Date, Error> {
    let calendar_month = u8::try_from(month)
        .ok()
        .and_then(|month| month.checked_add(1))
        .and_then(|month| Month::try_from(month).ok())
        .ok_or_else(|| {
            Error::InvalidHistoryPeriod(format!("month must be between 0 and 11, got {month}"))
        })?;

    Date::from_calendar_date(year, calendar_month, 1)
        .map_err(|_| Error::InvalidHistoryPeriod(format!("year {year} is out of range")))
}

fn days_of_month(first: Date) -> impl Iterator<Item = Date> {
    std::iter::successors(Some(first), |date| date.next_day())
        .take_while(move |date| date.month() == first.month())
}

/// The income and expense totals of each bucket of the period.
///
/// A year timeframe gives one record per month (0 to 11) without a day. A
/// month timeframe gives one record per calendar day of `month`. Buckets
/// without transactions are zero.
///
/// # Errors
///
/// Returns [Error::InvalidHistoryPeriod] for an invalid month or year, or
/// [Error::SqlError] if the transactions could not be read.
pub fn get_history_data(
    timeframe: Timeframe,
    year: i32,
    month: i32,
    connection: &Connection,
) -> Result<Vec<HistoryRecord>, Error> {
    let empty_record = |month: i32, day: Option<i32>| HistoryRecord {
        year,
        month,
        day,
        income: 0.0,
        expense: 0.0,
    };

    let (mut records, start, end): (Vec<HistoryRecord>, Date, Date) = match timeframe {
        Timeframe::Year => {
            let start = first_of_month(year, 0)?;
            let end = days_of_month(first_of_month(year, 11)?)
                .last()
                .unwrap_or(start);

            ((0..12).map(|month| empty_record(month, None)).collect(), start, end)
        }
        Timeframe::Month => {
            let start = first_of_month(year, month)?;
            let days: Vec<Date> = days_of_month(start).collect();
            let end = days.last().copied().unwrap_or(start);

            (
                days.iter()
                    .map(|date| empty_record(month, Some(i32::from(date.day()))))
                    .collect(),
                start,
                end,
            )
        }
    };

    let mut statement = connection.prepare(
        "SELECT date, kind, SUM(amount) FROM \"transaction\"
         WHERE date BETWEEN ?1 AND ?2
         GROUP BY date, kind",
    )?;
    let totals = statement.query_map((start, end), |row| {
        Ok((
            row.get::<_, Date>(0)?,
            row.get::<_, TransactionKind>(1)?,
            row.get::<_, f64>(2)?,
        ))
    })?;

    for total in totals {
        let (date, kind, amount) = total?;
        let index = match timeframe {
            Timeframe::Year => usize::from(u8::from(date.month())) - 1,
            Timeframe::Month => usize::from(date.day()) - 1,
        };

        let Some(record) = records.get_mut(index) else {
            tracing::warn!("Transaction total for {date} falls outside of the history period");
            continue;
        };

        match kind {
            TransactionKind::Income => record.income += amount,
            TransactionKind::Expense => record.expense += amount,
        }
    }

    Ok(records)
}

/// The years that have transactions, in ascending order.
///
/// Falls back to `current_year` when there are no transactions, so there is
/// always at least one period to pick.
///
/// # Errors
///
/// Returns [Error::SqlError] if the transactions could not be read.
pub fn get_history_periods(connection: &Connection, current_year: i32) -> Result<Vec<i32>, Error> {
    let years = connection
        .prepare(
            "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS year
             FROM \"transaction\"
             ORDER BY year ASC",
        )?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, rusqlite::Error>>()?;

    if years.is_empty() {
        Ok(vec![current_year])
    } else {
        Ok(years)
    }
}

#[cfg(test)]
mod period_tests {
    use time::macros::date;

    use crate::{Error, history::Timeframe};

    use super::{HistoryPeriod, HistoryQuery};

    #[test]
    fn defaults_to_current_month() {
        let period = HistoryPeriod::resolve(HistoryQuery::default(), date!(2025 - 03 - 14));

        assert_eq!(
            period,
            Ok(HistoryPeriod {
                timeframe: Timeframe::Month,
                year: 2025,
                month: 2
            })
        );
    }

    #[test]
    fn uses_query_values() {
        let query = HistoryQuery {
            timeframe: Some(Timeframe::Year),
            year: Some(2023),
            month: Some(11),
        };

        let period = HistoryPeriod::resolve(query, date!(2025 - 03 - 14));

        assert_eq!(
            period,
            Ok(HistoryPeriod {
                timeframe: Timeframe::Year,
                year: 2023,
                month: 11
            })
        );
    }

    #[test]
    fn rejects_month_out_of_range() {
        for month in [-1, 12] {
            let query = HistoryQuery {
                month: Some(month),
                ..Default::default()
            };

            let result = HistoryPeriod::resolve(query, date!(2025 - 03 - 14));

            assert!(
                matches!(result, Err(Error::InvalidHistoryPeriod(_))),
                "month {month} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn rejects_year_out_of_range() {
        let query = HistoryQuery {
            year: Some(123_456),
            ..Default::default()
        };

        let result = HistoryPeriod::resolve(query, date!(2025 - 03 - 14));

        assert!(matches!(result, Err(Error::InvalidHistoryPeriod(_))));
    }

    #[test]
    fn title_names_the_period() {
        let month = HistoryPeriod {
            timeframe: Timeframe::Month,
            year: 2025,
            month: 2,
        };
        let year = HistoryPeriod {
            timeframe: Timeframe::Year,
            ..month
        };

        assert_eq!(month.title(), "March 2025");
        assert_eq!(year.title(), "2025");
    }

    #[test]
    fn query_deserialises() {
        let query: HistoryQuery =
            serde_urlencoded::from_str("timeframe=year&year=2024&month=0").unwrap();

        assert_eq!(
            query,
            HistoryQuery {
                timeframe: Some(Timeframe::Year),
                year: Some(2024),
                month: Some(0)
            }
        );
    }
}
