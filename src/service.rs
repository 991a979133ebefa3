//! The operations the presentation layer may call.
//!
//! Each operation opens its own connection through the [Store], runs its
//! statements and drops the connection before returning, whether it
//! succeeded or not. Nothing is cached between calls.

use std::collections::BTreeMap;

use rusqlite::Connection;
use time::Date;

use crate::{
    Error, ErrorKind,
    category::{self, Category, CategoryId, CategoryName},
    db::Store,
    expense::{self, Expense, ExpenseChanges, ExpenseId, NewExpense, validate_amount},
    month::YearMonth,
    report::{self, CategoryTotal},
};

/// Typed queries and mutations over categories and expenses.
///
/// The service is meant for a single user issuing one operation at a time.
/// It does not guard against two writers creating the same category at once.
#[derive(Debug, Clone)]
pub struct ExpenseService {
    store: Store,
}

impl ExpenseService {
    /// Create a service backed by `store`.
    ///
    /// The store should already be initialized with [Store::initialize].
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The store this service reads from and writes to.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// All categories, sorted by name.
    pub fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.with_connection("list categories", category::get_all_categories)
    }

    /// Get the ID of the category called `name`, creating it if needed.
    ///
    /// Leading and trailing whitespace is ignored, so `" Food "` and `"Food"`
    /// refer to the same category. Names are otherwise case-sensitive.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] without touching the database if
    /// `name` is `None`, empty or only whitespace.
    pub fn get_or_create_category_id(&self, name: Option<&str>) -> Result<CategoryId, Error> {
        let name = CategoryName::from_option(name)?;

        self.with_connection("get or create category", |connection| {
            category::get_or_create_category_id(name, connection)
        })
    }

    /// The expenses dated within `year_month`, oldest first.
    pub fn list_expenses(&self, year_month: YearMonth) -> Result<Vec<Expense>, Error> {
        self.with_connection("list expenses", |connection| {
            expense::get_expenses_in_month(year_month, connection)
        })
    }

    /// A single expense by ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no expense with `id`.
    pub fn get_expense(&self, id: ExpenseId) -> Result<Expense, Error> {
        self.with_connection("get expense", |connection| {
            expense::get_expense(id, connection)
        })
    }

    /// Save a new expense, returning its assigned ID.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<ExpenseId, Error> {
        self.with_connection("insert expense", |connection| {
            expense::create_expense(expense, connection)
        })
    }

    /// Replace the amount, date, category and note of an existing expense.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingExpense] if there is no expense with `expense.id`.
    pub fn update_expense(&self, expense: &Expense) -> Result<(), Error> {
        self.with_connection("update expense", |connection| {
            expense::update_expense(expense, connection)
        })
    }

    /// Apply `changes` to the expense with `id` and return the saved expense.
    ///
    /// The new amount and category name are validated before anything is
    /// written, so a rejected edit never creates a category.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] or [Error::EmptyCategoryName] for invalid changes,
    /// - [Error::NotFound] if there is no expense with `id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn edit_expense(&self, id: ExpenseId, changes: ExpenseChanges) -> Result<Expense, Error> {
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }
        let category = changes
            .category
            .as_deref()
            .map(CategoryName::new)
            .transpose()?;

        self.with_connection("edit expense", |connection| {
            let mut expense = expense::get_expense(id, connection)?;

            if let Some(amount) = changes.amount {
                expense.amount = amount;
            }
            if let Some(date) = changes.date {
                expense.date = date;
            }
            if let Some(note) = changes.note {
                expense.note = note;
            }
            if let Some(name) = category {
                expense.category_id = category::get_or_create_category_id(name, connection)?;
            }

            expense::update_expense(&expense, connection)?;
            expense::get_expense(id, connection)
        })
    }

    /// Delete the expense with `id`. Deleting a missing expense does nothing.
    pub fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        self.with_connection("delete expense", |connection| {
            expense::delete_expense(id, connection)
        })
    }

    /// The total spent per category in `year_month`, largest first.
    pub fn monthly_totals_by_category(
        &self,
        year_month: YearMonth,
    ) -> Result<Vec<CategoryTotal>, Error> {
        self.with_connection("get totals by category", |connection| {
            report::get_monthly_totals_by_category(year_month, connection)
        })
    }

    /// The total spent per day in `year_month`, in date order.
    pub fn daily_totals(&self, year_month: YearMonth) -> Result<BTreeMap<Date, f64>, Error> {
        self.with_connection("get daily totals", |connection| {
            report::get_daily_totals(year_month, connection)
        })
    }

    /// Run `query` on a fresh connection and log any failure.
    ///
    /// This is the only place where failed operations are logged.
    ///
    /// The connection is closed when this function returns.
    fn with_connection<T>(
        &self,
        operation: &str,
        query: impl FnOnce(&Connection) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let result = self
            .store
            .connection()
            .and_then(|connection| query(&connection));

        if let Err(error) = &result {
            match error.kind() {
                ErrorKind::StorageFailure | ErrorKind::ConstraintViolation => {
                    tracing::error!("Could not {operation}: {error}")
                }
                _ => tracing::warn!("Could not {operation}: {error}"),
            }
        }

        result
    }
}
