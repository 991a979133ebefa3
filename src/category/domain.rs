//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// The categories a new database starts with, in insertion order.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Rent",
    "Shopping",
    "Bills",
    "Entertainment",
    "Other",
];

/// The name of a category as stored in the database.
///
/// Names are trimmed and never empty. Comparison is case-sensitive, so
/// "food" and "Food" are different categories.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Trim `name` and wrap it.
    ///
    /// # Errors
    /// Returns [Error::EmptyCategoryName] if nothing is left after trimming.
    pub fn new(name: &str) -> Result<Self, Error> {
        match name.trim() {
            "" => Err(Error::EmptyCategoryName),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    /// Like [CategoryName::new], but a missing name is also rejected with
    /// [Error::EmptyCategoryName].
    pub fn from_option(name: Option<&str>) -> Result<Self, Error> {
        name.map_or(Err(Error::EmptyCategoryName), Self::new)
    }

    /// Wrap a name read back from the `categories` table, which only ever
    /// holds validated names.
    pub(crate) fn from_stored(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A category for expenses, e.g. 'Food', 'Transport', 'Rent'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,

    /// The name of the category.
    pub name: CategoryName,
}

#[cfg(test)]
mod category_name_tests {
    use crate::{CategoryName, Error};

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category_name = CategoryName::new("\n\t \r");

        assert_eq!(category_name, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let category_name = CategoryName::new("  Coffee \t").unwrap();

        assert_eq!(category_name.as_ref(), "Coffee");
    }

    #[test]
    fn new_keeps_inner_whitespace_and_case() {
        let category_name = CategoryName::new(" Eating  Out ").unwrap();

        assert_eq!(category_name.as_ref(), "Eating  Out");
    }

    #[test]
    fn from_option_trims_present_name() {
        let category_name = CategoryName::from_option(Some(" Pets ")).unwrap();

        assert_eq!(category_name.as_ref(), "Pets");
    }

    #[test]
    fn from_option_fails_on_none() {
        assert_eq!(
            CategoryName::from_option(None),
            Err(Error::EmptyCategoryName)
        );
    }
}
