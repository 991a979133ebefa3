//! Expense management: the `Expense` model and its database queries.

mod db;
mod domain;

pub use db::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses_in_month,
    update_expense,
};
pub use domain::{
    Expense, ExpenseChanges, ExpenseId, NewExpense, parse_iso_date, validate_amount,
};

#[cfg(test)]
pub use db::count_expenses;
