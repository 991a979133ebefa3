//! Core expense domain types.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    category::{CategoryId, CategoryName},
};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The format dates are stored and entered in.
const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date in that format.
pub fn parse_iso_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// An expense that has not been saved yet.
///
/// To create a new `NewExpense`, use [NewExpense::new] so that the amount is
/// checked before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// An optional free-text note, e.g. "lunch with Sam".
    pub note: Option<String>,
}

impl NewExpense {
    /// Create a new expense.
    ///
    /// A note that is empty or only whitespace is stored as no note.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `amount` is not a finite number greater than zero.
    pub fn new(
        amount: f64,
        date: Date,
        category_id: CategoryId,
        note: Option<&str>,
    ) -> Result<Self, Error> {
        Ok(Self {
            amount: validate_amount(amount)?,
            date,
            category_id,
            note: normalize_note(note),
        })
    }
}

/// A saved expense, as read back from the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID assigned by the database.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: f64,
    /// The day the money was spent.
    pub date: Date,
    /// The category the expense belongs to.
    pub category_id: CategoryId,
    /// The name of the category, joined in at query time.
    ///
    /// This is for display only. Changing it has no effect on the database;
    /// change `category_id` instead.
    pub category_name: CategoryName,
    /// An optional free-text note.
    pub note: Option<String>,
}

/// Changes to apply to a saved expense. A field left as `None` keeps its
/// current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// The name of the new category, created if it does not exist yet.
    pub category: Option<String>,
    /// The new note. `Some(None)` removes the note.
    pub note: Option<Option<String>>,
}

/// Check that `amount` is a finite number greater than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

pub(crate) fn normalize_note(note: Option<&str>) -> Option<String> {
    note.filter(|note| !note.trim().is_empty())
        .map(|note| note.to_owned())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, NewExpense, parse_iso_date};

    #[test]
    fn new_expense_rejects_zero() {
        let expense = NewExpense::new(0.0, date!(2024 - 03 - 15), 1, None);

        assert_eq!(expense, Err(Error::InvalidAmount(0.0)));
    }

    #[test]
    fn new_expense_rejects_negative_amount() {
        let expense = NewExpense::new(-12.5, date!(2024 - 03 - 15), 1, None);

        assert_eq!(expense, Err(Error::InvalidAmount(-12.5)));
    }

    #[test]
    fn new_expense_rejects_non_finite_amount() {
        assert!(NewExpense::new(f64::INFINITY, date!(2024 - 03 - 15), 1, None).is_err());
        assert!(NewExpense::new(f64::NAN, date!(2024 - 03 - 15), 1, None).is_err());
    }

    #[test]
    fn new_expense_drops_blank_note() {
        let expense = NewExpense::new(1.0, date!(2024 - 03 - 15), 1, Some("   ")).unwrap();

        assert_eq!(expense.note, None);
    }

    #[test]
    fn new_expense_keeps_note_as_written() {
        let expense = NewExpense::new(1.0, date!(2024 - 03 - 15), 1, Some(" lunch ")).unwrap();

        assert_eq!(expense.note.as_deref(), Some(" lunch "));
    }

    #[test]
    fn parse_iso_date_succeeds() {
        assert_eq!(parse_iso_date("2024-03-15"), Ok(date!(2024 - 03 - 15)));
    }

    #[test]
    fn parse_iso_date_rejects_other_formats() {
        for text in ["15/03/2024", "2024-3-15", "2024-02-30", ""] {
            assert_eq!(
                parse_iso_date(text),
                Err(Error::InvalidDate(text.to_owned())),
                "{text:?}"
            );
        }
    }
}
