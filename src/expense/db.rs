//! Database operations for expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::CategoryName,
    expense::{
        Expense, ExpenseId, NewExpense,
        domain::{normalize_note, validate_amount},
    },
    month::YearMonth,
};

/// Save a new expense and return the ID the database assigned to it.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - [Error::ConstraintViolation] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_expense(expense: &NewExpense, connection: &Connection) -> Result<ExpenseId, Error> {
    let amount = validate_amount(expense.amount)?;

    let id: ExpenseId = connection
        .prepare(
            "INSERT INTO expenses (amount, date, category_id, note)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id",
        )?
        .query_row(
            (
                amount,
                expense.date,
                expense.category_id,
                normalize_note(expense.note.as_deref()),
            ),
            |row| row.get(0),
        )?;

    tracing::info!(
        "Created expense {id} of {amount:.2} on {} in category {}",
        expense.date,
        expense.category_id
    );

    Ok(id)
}

/// Retrieve a single expense by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to an expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT e.id, e.amount, e.date, e.category_id, c.name, e.note
             FROM expenses e
             INNER JOIN categories c ON e.category_id = c.id
             WHERE e.id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)
        .map_err(|error| error.into())
}

/// Retrieve the expenses dated within `year_month`, oldest first.
///
/// Expenses on the same day are returned in the order they were created.
pub fn get_expenses_in_month(
    year_month: YearMonth,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT e.id, e.amount, e.date, e.category_id, c.name, e.note
             FROM expenses e
             INNER JOIN categories c ON e.category_id = c.id
             WHERE strftime('%Y', e.date) = ?1
               AND strftime('%m', e.date) = ?2
             ORDER BY e.date ASC, e.id ASC",
        )?
        .query_map(
            (year_month.year_text(), year_month.month_text()),
            map_expense_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the amount, date, category and note of the expense with `expense.id`.
///
/// The `category_name` of `expense` is ignored.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not greater than zero,
/// - [Error::UpdateMissingExpense] if no expense has the ID `expense.id`,
/// - [Error::ConstraintViolation] if the category ID does not refer to a category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let amount = validate_amount(expense.amount)?;

    let rows_affected = connection.execute(
        "UPDATE expenses
         SET amount = ?1, date = ?2, category_id = ?3, note = ?4
         WHERE id = ?5",
        (
            amount,
            expense.date,
            expense.category_id,
            normalize_note(expense.note.as_deref()),
            expense.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    tracing::info!("Updated expense {}", expense.id);

    Ok(())
}

/// Delete an expense by ID.
///
/// Deleting an ID that does not exist does nothing.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expenses WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("Expense {id} was already absent, nothing to delete");
    } else {
        tracing::info!("Deleted expense {id}");
    }

    Ok(())
}

/// Get the total number of expenses in the database.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expenses;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// Categories that are still referenced by an expense cannot be deleted.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            note TEXT,
            FOREIGN KEY(category_id) REFERENCES categories(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
    )?;

    Ok(())
}

/// Map a row of `id, amount, date, category_id, category name, note` to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let category_id = row.get(3)?;
    let category_name = CategoryName::from_stored(row.get(4)?);
    let note = row.get(5)?;

    Ok(Expense {
        id,
        amount,
        date,
        category_id,
        category_name,
        note,
    })
}
