//! CSV export of expenses.

use std::io::Write;

use crate::{Error, expense::Expense, month::YearMonth};

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Note"];

/// Write `expenses` as CSV with the header `Date,Category,Amount,Note`.
///
/// Amounts have exactly two decimal places. Commas in notes are replaced
/// with spaces and a missing note is written as an empty field.
///
/// # Errors
/// Returns [Error::ExportError] if writing to `writer` fails.
pub fn write_csv<'a, W: Write>(
    writer: W,
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Result<(), Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(HEADER).map_err(export_error)?;

    let mut count = 0;

    for expense in expenses {
        let note = expense
            .note
            .as_deref()
            .map(|note| note.replace(',', " "))
            .unwrap_or_default();

        csv_writer
            .write_record([
                expense.date.to_string(),
                expense.category_name.to_string(),
                format!("{:.2}", expense.amount),
                note,
            ])
            .map_err(export_error)?;

        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    tracing::debug!("Exported {count} expenses as CSV");

    Ok(())
}

/// The suggested file name for exporting `year_month`, e.g. `expenses_MARCH_2024.csv`.
pub fn default_export_file_name(year_month: YearMonth) -> String {
    format!(
        "expenses_{}_{}.csv",
        year_month.month().to_string().to_uppercase(),
        year_month.year()
    )
}

fn export_error(error: csv::Error) -> Error {
    Error::ExportError(error.to_string())
}
