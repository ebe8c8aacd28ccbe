//! Ranks per-category expense totals for the dashboard's breakdown chart.

use serde::Serialize;

use crate::{models::Amount, stores::CategorySum};

/// The display name used for expenses without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// One slice of the category breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// The category name.
    pub name: String,
    /// Total expenses in the category.
    pub value: Amount,
}

/// Order per-category expense totals by descending value, breaking ties by
/// name. Transactions without a category appear under
/// [UNCATEGORIZED_LABEL].
pub fn rank_breakdown(sums: Vec<CategorySum>) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = sums
        .into_iter()
        .map(|sum| BreakdownEntry {
            name: sum
                .category_name
                .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_owned()),
            value: sum.total,
        })
        .collect();

    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));

    entries
}

#[cfg(test)]
mod breakdown_tests {
    use crate::{models::Amount, stores::CategorySum};

    use super::{BreakdownEntry, UNCATEGORIZED_LABEL, rank_breakdown};

    fn sum(name: Option<&str>, cents: i64) -> CategorySum {
        CategorySum {
            category_name: name.map(str::to_owned),
            total: Amount::from_cents(cents),
        }
    }

    #[test]
    fn orders_by_descending_value() {
        let entries = rank_breakdown(vec![
            sum(Some("Rent"), 500_00),
            sum(Some("Food & Beverage"), 750_00),
            sum(Some("Transportation"), 20_00),
        ]);

        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();

        assert_eq!(names, vec!["Food & Beverage", "Rent", "Transportation"]);
    }

    #[test]
    fn breaks_ties_by_name() {
        let entries = rank_breakdown(vec![
            sum(Some("Utilities"), 100_00),
            sum(Some("Entertainment"), 100_00),
        ]);

        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();

        assert_eq!(names, vec!["Entertainment", "Utilities"]);
    }

    #[test]
    fn labels_missing_category() {
        let entries = rank_breakdown(vec![sum(None, 10_00)]);

        assert_eq!(
            entries,
            vec![BreakdownEntry {
                name: UNCATEGORIZED_LABEL.to_owned(),
                value: Amount::from_cents(10_00),
            }]
        );
    }

    #[test]
    fn empty_input_yields_empty_breakdown() {
        assert!(rank_breakdown(vec![]).is_empty());
    }
}
