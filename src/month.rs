//! The calendar month used to scope expense queries.

use std::fmt::Display;

use time::{Date, Month};

use crate::Error;

/// A calendar month of a specific year, e.g. March 2024.
///
/// Dates are stored as `YYYY-MM-DD` text, so the year is limited to values
/// that fit in four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a year-month from a year and a month number from 1 to 12.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidYear] if `year` is not between 0 and 9999,
    /// - or [Error::InvalidMonth] if `month` is not between 1 and 12.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !(0..=9999).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

        Ok(Self { year, month })
    }

    /// The year-month that `date` falls in.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if the year of `date` is not between 0 and 9999.
    pub fn from_date(date: Date) -> Result<Self, Error> {
        Self::new(date.year(), date.month() as u8)
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month.
    pub fn month(&self) -> Month {
        self.month
    }

    /// The year as it appears in a stored date, zero-padded to four digits.
    pub(crate) fn year_text(&self) -> String {
        format!("{:04}", self.year)
    }

    /// The month as it appears in a stored date, zero-padded to two digits.
    pub(crate) fn month_text(&self) -> String {
        format!("{:02}", self.month as u8)
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}
