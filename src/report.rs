//! Month-scoped aggregations of expenses, the data behind the category and
//! daily spending charts.

use std::collections::BTreeMap;

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{Error, category::CategoryName, month::YearMonth};

/// The total amount spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: CategoryName,
    /// The sum of the amounts of the category's expenses.
    pub total: f64,
}

/// Sum the expenses in `year_month` per category, largest total first.
///
/// Categories with no expenses in the month are left out. Equal totals are
/// ordered by category name.
pub fn get_monthly_totals_by_category(
    year_month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT c.name, SUM(e.amount) AS total
             FROM expenses e
             INNER JOIN categories c ON e.category_id = c.id
             WHERE strftime('%Y', e.date) = ?1
               AND strftime('%m', e.date) = ?2
             GROUP BY c.id, c.name
             ORDER BY total DESC, c.name ASC",
        )?
        .query_map(
            (year_month.year_text(), year_month.month_text()),
            |row| {
                Ok(CategoryTotal {
                    category: CategoryName::from_stored(row.get(0)?),
                    total: row.get(1)?,
                })
            },
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Sum the expenses in `year_month` per day.
///
/// Only days with at least one expense are included.
pub fn get_daily_totals(
    year_month: YearMonth,
    connection: &Connection,
) -> Result<BTreeMap<Date, f64>, Error> {
    connection
        .prepare(
            "SELECT date, SUM(amount) AS total
             FROM expenses
             WHERE strftime('%Y', date) = ?1
               AND strftime('%m', date) = ?2
             GROUP BY date
             ORDER BY date ASC",
        )?
        .query_map(
            (year_month.year_text(), year_month.month_text()),
            |row| Ok((row.get::<_, Date>(0)?, row.get::<_, f64>(1)?)),
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}
