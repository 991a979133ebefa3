//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES},
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::ConstraintViolation] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO categories (name) VALUES (?1);",
        (name.as_ref(),),
    )?;

    let id = connection.last_insert_rowid();
    tracing::info!("Created category \"{name}\" with ID {id}");

    Ok(Category { id, name })
}

/// Find the ID of the category with exactly `name`.
///
/// Returns `None` if there is no such category.
pub fn get_category_id_by_name(
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<CategoryId>, Error> {
    connection
        .prepare("SELECT id FROM categories WHERE name = ?1;")?
        .query_row((name.as_ref(),), |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Get the ID of the category called `name`, creating the category if it does
/// not exist yet.
///
/// The lookup and the insert are separate statements. This assumes a single
/// writer; two callers racing to create the same new name will see one of
/// them fail with [Error::ConstraintViolation].
pub fn get_or_create_category_id(
    name: CategoryName,
    connection: &Connection,
) -> Result<CategoryId, Error> {
    if let Some(id) = get_category_id_by_name(&name, connection)? {
        tracing::debug!("Found existing category \"{name}\" with ID {id}");
        return Ok(id);
    }

    create_category(name, connection).map(|category| category.id)
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM categories ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of categories in the database.
pub fn count_categories(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM categories;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Insert [DEFAULT_CATEGORIES] if the category table is empty.
///
/// Returns `true` if the defaults were inserted, `false` if any category
/// already existed.
pub fn seed_default_categories(connection: &Connection) -> Result<bool, Error> {
    if count_categories(connection)? > 0 {
        tracing::debug!("Categories already exist, skipping default categories");
        return Ok(false);
    }

    let mut statement = connection.prepare("INSERT INTO categories (name) VALUES (?1);")?;

    for name in DEFAULT_CATEGORIES {
        statement.execute((name,))?;
    }

    tracing::info!("Inserted {} default categories", DEFAULT_CATEGORIES.len());

    Ok(true)
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let name = CategoryName::from_stored(row.get(1)?);

    Ok(Category { id, name })
}

#[cfg(test)]
mod category_query_tests {
    use rusqlite::Connection;

    use crate::{
        CategoryName, DEFAULT_CATEGORIES, Error, ErrorKind,
        category::{
            count_categories, create_category, get_all_categories, get_category_id_by_name,
            get_or_create_category_id, seed_default_categories,
        },
    };

    use super::create_category_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_category_table(&connection).expect("Could not create category table");
        connection
    }

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Groceries").unwrap();

        let category = create_category(name.clone(), &connection);

        let got_category = category.expect("Could not create category");
        assert!(got_category.id > 0);
        assert_eq!(got_category.name, name);
    }

    #[test]
    fn create_category_fails_on_duplicate_name() {
        let connection = get_test_db_connection();
        let name = CategoryName::new("Groceries").unwrap();
        create_category(name.clone(), &connection).expect("Could not create category");

        let duplicate = create_category(name, &connection);

        let error = duplicate.expect_err("Duplicate category name should be rejected");
        assert_eq!(error.kind(), ErrorKind::ConstraintViolation);
    }

    #[test]
    fn names_are_case_sensitive() {
        let connection = get_test_db_connection();

        let lower = get_or_create_category_id(CategoryName::new("food").unwrap(), &connection)
            .expect("Could not create category");
        let upper = get_or_create_category_id(CategoryName::new("Food").unwrap(), &connection)
            .expect("Could not create category");

        assert_ne!(lower, upper);
        assert_eq!(count_categories(&connection), Ok(2));
    }

    #[test]
    fn get_category_id_by_name_returns_none_for_unknown_name() {
        let connection = get_test_db_connection();

        let id = get_category_id_by_name(&CategoryName::new("Nope").unwrap(), &connection);

        assert_eq!(id, Ok(None));
    }

    #[test]
    fn get_or_create_returns_existing_id() {
        let connection = get_test_db_connection();
        let category = create_category(CategoryName::new("Rent").unwrap(), &connection)
            .expect("Could not create category");

        let id = get_or_create_category_id(CategoryName::new(" Rent ").unwrap(), &connection);

        assert_eq!(id, Ok(category.id));
        assert_eq!(count_categories(&connection), Ok(1));
    }

    #[test]
    fn get_or_create_inserts_new_category() {
        let connection = get_test_db_connection();

        let id = get_or_create_category_id(CategoryName::new("Pets").unwrap(), &connection)
            .expect("Could not create category");

        assert_eq!(
            get_category_id_by_name(&CategoryName::new("Pets").unwrap(), &connection),
            Ok(Some(id))
        );
    }

    #[test]
    fn get_all_categories_sorts_by_name() {
        let connection = get_test_db_connection();
        for name in ["Zoo", "Apples", "Moped"] {
            create_category(CategoryName::new(name).unwrap(), &connection)
                .expect("Could not create category");
        }

        let names: Vec<String> = get_all_categories(&connection)
            .expect("Could not get categories")
            .into_iter()
            .map(|category| category.name.to_string())
            .collect();

        assert_eq!(names, ["Apples", "Moped", "Zoo"]);
    }

    #[test]
    fn seed_inserts_defaults_into_empty_table() {
        let connection = get_test_db_connection();

        let seeded = seed_default_categories(&connection);

        assert_eq!(seeded, Ok(true));
        assert_eq!(
            count_categories(&connection),
            Ok(DEFAULT_CATEGORIES.len() as u32)
        );
    }

    #[test]
    fn seed_keeps_insertion_order_for_ids() {
        let connection = get_test_db_connection();
        seed_default_categories(&connection).expect("Could not seed categories");

        for (index, name) in DEFAULT_CATEGORIES.iter().enumerate() {
            let id = get_category_id_by_name(&CategoryName::new(name).unwrap(), &connection);
            assert_eq!(id, Ok(Some(index as i64 + 1)), "{name}");
        }
    }

    #[test]
    fn seed_skips_table_with_any_category() {
        let connection = get_test_db_connection();
        create_category(CategoryName::new("Custom").unwrap(), &connection)
            .expect("Could not create category");

        let seeded = seed_default_categories(&connection);

        assert_eq!(seeded, Ok(false));
        assert_eq!(count_categories(&connection), Ok(1));
    }

    #[test]
    fn duplicate_error_carries_sqlite_description() {
        let connection = get_test_db_connection();
        create_category(CategoryName::new("Bills").unwrap(), &connection)
            .expect("Could not create category");

        let error = create_category(CategoryName::new("Bills").unwrap(), &connection);

        match error {
            Err(Error::ConstraintViolation(description)) => {
                assert!(description.contains("categories.name"), "{description}")
            }
            other => panic!("Expected a constraint violation, got {other:?}"),
        }
    }
}
