//! Narrowing a month's expenses down with free-text search.

use crate::expense::Expense;

/// Whether `expense` matches the search `text`.
///
/// Matches when the category name or the note contains `text`, ignoring case.
/// Blank search text matches every expense.
pub fn matches_search(expense: &Expense, text: &str) -> bool {
    let needle = text.trim().to_lowercase();

    if needle.is_empty() {
        return true;
    }

    expense
        .category_name
        .as_ref()
        .to_lowercase()
        .contains(&needle)
        || expense
            .note
            .as_ref()
            .is_some_and(|note| note.to_lowercase().contains(&needle))
}

/// The expenses that match the search `text`, in their original order.
pub fn filter_expenses<'a>(expenses: &'a [Expense], text: &str) -> Vec<&'a Expense> {
    expenses
        .iter()
        .filter(|expense| matches_search(expense, text))
        .collect()
}

/// The sum of the amounts of `expenses`.
pub fn total_amount<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
    expenses.into_iter().map(|expense| expense.amount).sum()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{CategoryName, Expense};

    use super::{filter_expenses, matches_search, total_amount};

    fn expense(id: i64, amount: f64, category: &str, note: Option<&str>) -> Expense {
        Expense {
            id,
            amount,
            date: date!(2024 - 03 - 15),
            category_id: 1,
            category_name: CategoryName::new(category).unwrap(),
            note: note.map(str::to_owned),
        }
    }

    #[test]
    fn blank_text_matches_everything() {
        let expense = expense(1, 10.0, "Food", None);

        assert!(matches_search(&expense, ""));
        assert!(matches_search(&expense, "  "));
    }

    #[test]
    fn matches_category_ignoring_case() {
        let expense = expense(1, 10.0, "Transport", None);

        assert!(matches_search(&expense, "TRANS"));
        assert!(!matches_search(&expense, "food"));
    }

    #[test]
    fn matches_note_ignoring_case() {
        let expense = expense(1, 10.0, "Food", Some("Lunch with Sam"));

        assert!(matches_search(&expense, "sam"));
        assert!(!matches_search(&expense, "dinner"));
    }

    #[test]
    fn filter_keeps_order_and_total_counts_only_matches() {
        let expenses = [
            expense(1, 10.0, "Food", Some("lunch")),
            expense(2, 99.0, "Rent", None),
            expense(3, 5.5, "Other", Some("lunch snacks")),
        ];

        let visible = filter_expenses(&expenses, "lunch");

        let ids: Vec<_> = visible.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(total_amount(visible), 15.5);
        assert_eq!(total_amount(&expenses), 114.5);
    }
}
