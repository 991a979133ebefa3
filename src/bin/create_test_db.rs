use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use time::{Duration, OffsetDateTime};

use expense_tracker::{ExpenseService, NewExpense, Store, init_logging};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Amount, days before today, category and note for each sample expense.
const SAMPLE_EXPENSES: [(f64, i64, &str, Option<&str>); 12] = [
    (1450.00, 0, "Rent", Some("monthly rent")),
    (23.80, 0, "Food", Some("lunch")),
    (64.15, 1, "Food", Some("groceries")),
    (3.90, 1, "Transport", Some("bus fare")),
    (120.00, 3, "Bills", Some("power")),
    (49.99, 5, "Shopping", Some("running shoes, on sale")),
    (18.50, 8, "Entertainment", Some("cinema")),
    (7.25, 12, "Food", None),
    (55.00, 20, "Bills", Some("internet")),
    (12.00, 33, "Other", Some("gift wrap")),
    (81.40, 35, "Food", Some("groceries")),
    (15.00, 40, "Coffee", Some("beans")),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(None)?;

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension, e.g. 'sample.db'.");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let store = Store::new(output_path);
    store.initialize()?;

    let service = ExpenseService::new(store);
    let today = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date();

    println!("Creating sample expenses...");

    for (amount, days_ago, category, note) in SAMPLE_EXPENSES {
        let category_id = service.get_or_create_category_id(Some(category))?;
        let date = today - Duration::days(days_ago);
        service.insert_expense(&NewExpense::new(amount, date, category_id, note)?)?;
    }

    println!("Success!");

    Ok(())
}
