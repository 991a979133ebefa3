//! Expense Tracker is a single-user personal finance tracker.
//!
//! Expenses (amount, date, category and an optional note) are recorded in a
//! local SQLite file. This library owns the schema, the typed queries and
//! mutations over it, and the month-scoped aggregations used for reports.
//!
//! The entry point is [ExpenseService], constructed from a [Store] that
//! points at the database file:
//!
//! ```no_run
//! use expense_tracker::{ExpenseService, Store, YearMonth};
//!
//! # fn main() -> Result<(), expense_tracker::Error> {
//! let store = Store::new("expenses.db");
//! store.initialize()?;
//!
//! let service = ExpenseService::new(store);
//! let expenses = service.list_expenses(YearMonth::new(2024, 3)?)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

use std::{fmt::Display, path::PathBuf};

mod category;
mod currency;
mod db;
mod expense;
mod export;
mod filter;
mod logging;
mod month;
mod report;
mod service;

pub use category::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES};
pub use currency::{CURRENCY_SYMBOL, format_currency};
pub use db::Store;
pub use expense::{
    Expense, ExpenseChanges, ExpenseId, NewExpense, parse_iso_date, validate_amount,
};
pub use export::{default_export_file_name, write_csv};
pub use filter::{filter_expenses, matches_search, total_amount};
pub use logging::init_logging;
pub use month::YearMonth;
pub use report::CategoryTotal;
pub use service::ExpenseService;

/// The broad class of an [Error].
///
/// The presentation layer can use this to decide how to present a failure
/// without matching on every error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a value that failed validation. Nothing was written.
    InvalidArgument,
    /// The requested row does not exist.
    NotFound,
    /// The database rejected the statement because of a UNIQUE or FOREIGN KEY
    /// constraint.
    ConstraintViolation,
    /// The database could not be opened, read or written.
    StorageFailure,
    /// Writing exported data failed.
    ExportFailure,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::NotFound => "not found",
            ErrorKind::ConstraintViolation => "constraint violation",
            ErrorKind::StorageFailure => "storage failure",
            ErrorKind::ExportFailure => "export failure",
        };

        write!(f, "{label}")
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A category name was missing, empty or only whitespace.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// An expense amount was zero, negative or not a finite number.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A string could not be parsed as a `YYYY-MM-DD` date.
    ///
    /// Callers should pass in the offending string.
    #[error("could not parse \"{0}\" as a date, expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A month number outside of 1 to 12.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A year that cannot be written as four digits.
    #[error("{0} is not a valid year, expected a number from 0 to 9999")]
    InvalidYear(i32),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// A UNIQUE or FOREIGN KEY constraint failed.
    ///
    /// Holds the description from SQLite, e.g. "FOREIGN KEY constraint failed".
    #[error("the change was rejected by the database: {0}")]
    ConstraintViolation(String),

    /// The database file does not exist.
    #[error("the database file {0:?} does not exist, run the init command first")]
    DatabaseMissing(PathBuf),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The expenses could not be written as CSV.
    #[error("could not export expenses: {0}")]
    ExportError(String),
}

impl Error {
    /// The broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCategoryName
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_) => ErrorKind::InvalidArgument,
            Error::NotFound | Error::UpdateMissingExpense => ErrorKind::NotFound,
            Error::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            Error::DatabaseMissing(_) | Error::SqlError(_) => ErrorKind::StorageFailure,
            Error::ExportError(_) => ErrorKind::ExportFailure,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                description,
            ) => Error::ConstraintViolation(
                description.unwrap_or_else(|| "constraint failed".to_owned()),
            ),
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use crate::{Error, ErrorKind};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn validation_errors_are_invalid_arguments() {
        let errors = [
            Error::EmptyCategoryName,
            Error::InvalidAmount(0.0),
            Error::InvalidDate("yesterday".to_owned()),
            Error::InvalidMonth(13),
            Error::InvalidYear(10_000),
        ];

        for error in errors {
            assert_eq!(error.kind(), ErrorKind::InvalidArgument, "{error}");
        }
    }

    #[test]
    fn other_sql_errors_are_storage_failures() {
        let error = Error::from(rusqlite::Error::InvalidQuery);

        assert_eq!(error, Error::SqlError(rusqlite::Error::InvalidQuery));
        assert_eq!(error.kind(), ErrorKind::StorageFailure);
    }

    #[test]
    fn missing_update_is_not_found() {
        assert_eq!(Error::UpdateMissingExpense.kind(), ErrorKind::NotFound);
    }
}
