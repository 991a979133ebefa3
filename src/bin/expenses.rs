use std::{fs::File, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use expense_tracker::{
    CategoryTotal, Error, Expense, ExpenseChanges, ExpenseId, ExpenseService, NewExpense, Store,
    YearMonth, default_export_file_name, filter_expenses, format_currency, init_logging,
    parse_iso_date, total_amount, validate_amount, write_csv,
};

/// The widest bar drawn by the report command.
const BAR_WIDTH: f64 = 40.0;

/// Record, search, summarise and export personal expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "EXPENSES_DB", default_value = "expenses.db", global = true)]
    db_path: PathBuf,

    /// Also append debug logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database with the default categories.
    Init,

    /// List the categories, sorted by name.
    Categories,

    /// Record a new expense.
    Add {
        /// How much was spent, e.g. 12.50.
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,

        /// The day of the expense as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// The category name. A new category is created if needed.
        #[arg(long)]
        category: String,

        /// A short note about the expense.
        #[arg(long)]
        note: Option<String>,
    },

    /// Change an existing expense.
    Edit {
        /// The ID of the expense.
        id: ExpenseId,

        /// The new amount.
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// The new date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,

        /// The new category name. A new category is created if needed.
        #[arg(long)]
        category: Option<String>,

        /// The new note.
        #[arg(long)]
        note: Option<String>,

        /// Remove the note.
        #[arg(long, conflicts_with = "note")]
        clear_note: bool,
    },

    /// Delete an expense.
    Delete {
        /// The ID of the expense.
        id: ExpenseId,
    },

    /// Show the expenses for a month.
    List {
        #[command(flatten)]
        period: Period,

        /// Only show expenses whose category or note contains this text.
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Show the totals by category and by day for a month.
    Report {
        #[command(flatten)]
        period: Period,
    },

    /// Write the expenses for a month to a CSV file.
    Export {
        #[command(flatten)]
        period: Period,

        /// Only export expenses whose category or note contains this text.
        #[arg(long, short)]
        search: Option<String>,

        /// Where to write the CSV file. Defaults to expenses_<MONTH>_<year>.csv.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// The month to show. Defaults to the current month.
#[derive(clap::Args, Debug)]
struct Period {
    /// The year, e.g. 2024.
    #[arg(long)]
    year: Option<i32>,

    /// The month number, 1 to 12.
    #[arg(long)]
    month: Option<u8>,
}

impl Period {
    fn resolve(&self, today: Date) -> Result<YearMonth, Error> {
        YearMonth::new(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month() as u8),
        )
    }
}

#[derive(Serialize)]
struct ExpenseListing<'a> {
    month: String,
    expenses: Vec<&'a Expense>,
    total: f64,
}

#[derive(Serialize)]
struct DailyTotal {
    date: Date,
    total: f64,
}

#[derive(Serialize)]
struct MonthReport {
    month: String,
    by_category: Vec<CategoryTotal>,
    daily: Vec<DailyTotal>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = init_logging(args.log_file.as_deref()) {
        eprintln!("Could not open the log file: {error}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error ({}): {error}", error.kind());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let store = if matches!(args.command, Command::Init) {
        Store::new(&args.db_path)
    } else {
        Store::open_existing(&args.db_path)?
    };
    store.initialize()?;

    let service = ExpenseService::new(store);
    let today = today();

    match args.command {
        Command::Init => {
            println!("Database ready at {}", args.db_path.display());
        }
        Command::Categories => {
            let categories = service.list_categories()?;

            if args.json {
                print_json(&categories)?;
            } else {
                for category in categories {
                    println!("{:>4}  {}", category.id, category.name);
                }
            }
        }
        Command::Add {
            amount,
            date,
            category,
            note,
        } => {
            let date = match date {
                Some(text) => parse_iso_date(&text)?,
                None => today,
            };
            // Check the amount first so a rejected expense does not leave a new category behind.
            validate_amount(amount)?;
            let category_id = service.get_or_create_category_id(Some(&category))?;
            let expense = NewExpense::new(amount, date, category_id, note.as_deref())?;
            let id = service.insert_expense(&expense)?;

            println!("Added expense {id}");
        }
        Command::Edit {
            id,
            amount,
            date,
            category,
            note,
            clear_note,
        } => {
            let changes = ExpenseChanges {
                amount,
                date: date.as_deref().map(parse_iso_date).transpose()?,
                category,
                note: if clear_note { Some(None) } else { note.map(Some) },
            };
            service.edit_expense(id, changes)?;

            println!("Updated expense {id}");
        }
        Command::Delete { id } => {
            service.delete_expense(id)?;

            println!("Deleted expense {id}");
        }
        Command::List { period, search } => {
            let year_month = period.resolve(today)?;
            let expenses = service.list_expenses(year_month)?;
            let visible = filter_expenses(&expenses, search.as_deref().unwrap_or_default());
            let total = total_amount(visible.iter().copied());

            if args.json {
                print_json(&ExpenseListing {
                    month: year_month.to_string(),
                    expenses: visible,
                    total,
                })?;
            } else {
                print_expense_table(year_month, &visible, total);
            }
        }
        Command::Report { period } => {
            let year_month = period.resolve(today)?;
            let report = MonthReport {
                month: year_month.to_string(),
                by_category: service.monthly_totals_by_category(year_month)?,
                daily: service
                    .daily_totals(year_month)?
                    .into_iter()
                    .map(|(date, total)| DailyTotal { date, total })
                    .collect(),
            };

            if args.json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
        Command::Export {
            period,
            search,
            output,
        } => {
            let year_month = period.resolve(today)?;
            let expenses = service.list_expenses(year_month)?;
            let visible = filter_expenses(&expenses, search.as_deref().unwrap_or_default());
            let path =
                output.unwrap_or_else(|| PathBuf::from(default_export_file_name(year_month)));

            let file = File::create(&path).map_err(|error| {
                Error::ExportError(format!("could not create {}: {error}", path.display()))
            })?;
            write_csv(file, visible.iter().copied())?;

            println!("Exported {} expenses to {}", visible.len(), path.display());
        }
    }

    Ok(())
}

fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| Error::ExportError(format!("could not serialize as JSON: {error}")))?;

    println!("{json}");

    Ok(())
}

fn print_expense_table(year_month: YearMonth, expenses: &[&Expense], total: f64) {
    println!("Expenses for {year_month}");

    if expenses.is_empty() {
        println!("No expenses.");
    } else {
        println!(
            "{:>5}  {:<10}  {:<16}  {:>12}  Note",
            "ID", "Date", "Category", "Amount"
        );

        for expense in expenses {
            println!(
                "{:>5}  {:<10}  {:<16}  {:>12}  {}",
                expense.id,
                expense.date,
                expense.category_name.as_ref(),
                format_currency(expense.amount),
                expense.note.as_deref().unwrap_or_default()
            );
        }
    }

    println!("Total: {}", format_currency(total));
}

fn print_report(report: &MonthReport) {
    println!("Expenses by category - {}", report.month);

    let max_category = report
        .by_category
        .iter()
        .map(|category| category.total)
        .fold(0.0, f64::max);

    for category in &report.by_category {
        println!(
            "{:<16}  {:>12}  {}",
            category.category.as_ref(),
            format_currency(category.total),
            bar(category.total, max_category)
        );
    }

    println!();
    println!("Daily expenses - {}", report.month);

    let max_day = report
        .daily
        .iter()
        .map(|day| day.total)
        .fold(0.0, f64::max);

    for day in &report.daily {
        println!(
            "{:<10}  {:>12}  {}",
            day.date,
            format_currency(day.total),
            bar(day.total, max_day)
        );
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }

    let width = (value / max * BAR_WIDTH).round().max(1.0) as usize;

    "#".repeat(width)
}
