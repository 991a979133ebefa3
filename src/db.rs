/*! The handle to the application's SQLite database and its schema. */

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error,
    category::{create_category_table, seed_default_categories},
    expense::create_expense_table,
};

/// A handle to the database file.
///
/// The store does not keep a connection open. Each call to
/// [Store::connection] opens a new one which is closed when it is dropped, so
/// a connection never outlives the operation that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store for the database file at `path`.
    ///
    /// The file is created on the first call to [Store::connection] if it does not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for a database file that must already exist.
    ///
    /// # Errors
    /// Returns [Error::DatabaseMissing] if there is no file at `path`.
    pub fn open_existing(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        if !path.is_file() {
            tracing::error!("Database file {path:?} does not exist");
            return Err(Error::DatabaseMissing(path));
        }

        Ok(Self { path })
    }

    /// The path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection to the database with foreign key checks enabled.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the file cannot be opened.
    pub fn connection(&self) -> Result<Connection, Error> {
        let connection = Connection::open(&self.path)?;
        enable_foreign_keys(&connection)?;

        Ok(connection)
    }

    /// Create the tables if they do not exist and add the default categories
    /// to an empty database.
    ///
    /// This is safe to call every time the application starts.
    ///
    /// # Errors
    /// Returns an error if the file is not a valid database or the schema cannot be created.
    pub fn initialize(&self) -> Result<(), Error> {
        let connection = self.connection()?;
        initialize(&connection).inspect_err(|error| {
            tracing::error!("Could not initialize database {:?}: {error}", self.path)
        })
    }
}

/// Turn on enforcement of `FOREIGN KEY` clauses, which SQLite leaves off by default.
pub fn enable_foreign_keys(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    Ok(())
}

/// Create all tables and seed the default categories in a single exclusive transaction.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_expense_table(&transaction)?;
    seed_default_categories(&transaction)?;

    transaction.commit()?;

    tracing::debug!("Database schema is ready");

    Ok(())
}

/// An initialized in-memory database for tests of the SQL functions.
#[cfg(test)]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    enable_foreign_keys(&connection).unwrap();
    initialize(&connection).unwrap();
    connection
}

#[cfg(test)]
mod store_tests {
    use tempfile::tempdir;

    use crate::{
        DEFAULT_CATEGORIES, Error, ErrorKind, Store,
        category::{count_categories, get_all_categories},
    };

    #[test]
    fn initialize_seeds_default_categories() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("expenses.db"));

        store.initialize().expect("Could not initialize database");

        let connection = store.connection().unwrap();
        assert_eq!(
            count_categories(&connection),
            Ok(DEFAULT_CATEGORIES.len() as u32)
        );
    }

    #[test]
    fn initialize_twice_does_not_reseed() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("expenses.db"));

        store.initialize().expect("Could not initialize database");
        store.initialize().expect("Could not initialize database again");

        let connection = store.connection().unwrap();
        assert_eq!(
            count_categories(&connection),
            Ok(DEFAULT_CATEGORIES.len() as u32)
        );
    }

    #[test]
    fn initialize_does_not_reseed_after_categories_change() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("expenses.db"));
        store.initialize().unwrap();
        store
            .connection()
            .unwrap()
            .execute("DELETE FROM categories WHERE name <> 'Food'", [])
            .unwrap();

        store.initialize().unwrap();

        let categories = get_all_categories(&store.connection().unwrap()).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Food");
    }

    #[test]
    fn connection_enables_foreign_keys() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("expenses.db"));

        let enabled: bool = store
            .connection()
            .unwrap()
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }

    #[test]
    fn open_existing_fails_on_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");

        let result = Store::open_existing(&path);

        assert_eq!(result, Err(Error::DatabaseMissing(path)));
    }

    #[test]
    fn open_existing_succeeds_after_initialize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("expenses.db");
        Store::new(&path).initialize().unwrap();

        let store = Store::open_existing(&path);

        assert_eq!(store.map(|store| store.path().to_owned()), Ok(path));
    }

    #[test]
    fn initialize_fails_on_file_that_is_not_a_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "this is definitely not an SQLite database file").unwrap();

        let result = Store::open_existing(&path).and_then(|store| store.initialize());

        let error = result.expect_err("A text file should not initialize");
        assert_eq!(error.kind(), ErrorKind::StorageFailure);
    }
}
