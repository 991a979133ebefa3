//! Categories group expenses, e.g. 'Food' or 'Rent'.

mod db;
mod domain;

pub use db::{
    create_category_table, get_all_categories, get_or_create_category_id, seed_default_categories,
};
pub use domain::{Category, CategoryId, CategoryName, DEFAULT_CATEGORIES};

#[cfg(test)]
pub use db::{count_categories, create_category, get_category_id_by_name};
