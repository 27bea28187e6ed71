//! Expense aggregation
//!
//! Groups the per-category expense list for display: `Income` is dropped,
//! categories outside the main list are folded into a single `Other` entry,
//! and percentages are recomputed against the expense-only total.

use crate::error::{Error, Result};
use crate::models::{ExpenseBreakdown, ExpenseCategory, ExpenseResponse, RawCategory, Trend};

/// Revenue, not an expense
pub const INCOME_CATEGORY: &str = "Income";

/// Name of the synthesized bucket for everything outside the main list
pub const OTHER_CATEGORY: &str = "Other";

/// Categories displayed individually
pub const MAIN_CATEGORIES: [&str; 7] = [
    "Mortgage",
    "Auto Loan",
    "Groceries",
    "Utilities",
    "Dining",
    "Shopping",
    "Transport",
];

const OTHER_COLOR: &str = "#6b7280";

/// Display color for a category name; unknown names get the `Other` color
pub fn category_color(name: &str) -> &'static str {
    match name {
        "Shopping" => "#3b82f6",
        "Transport" => "#10b981",
        "Housing" => "#f59e0b",
        "Mortgage" => "#f59e0b",
        "Dining" => "#ef4444",
        "Entertainment" => "#8b5cf6",
        "Groceries" => "#a855f7",
        "Travel" => "#0ea5e9",
        "Utilities" => "#f97316",
        "Auto Loan" => "#10b981",
        "Investment" => "#84cc16",
        "Income" => "#22c55e",
        _ => OTHER_COLOR,
    }
}

pub fn is_main_category(name: &str) -> bool {
    MAIN_CATEGORIES.contains(&name)
}

/// Aggregate an expenses response into display categories
pub fn aggregate(response: &ExpenseResponse) -> Result<ExpenseBreakdown> {
    let categories = response.categories.as_ref().ok_or_else(|| {
        Error::MalformedResponse("expenses response has no categories".to_string())
    })?;

    let (categories, total_expenses) = group_categories(categories);

    Ok(ExpenseBreakdown {
        categories,
        monthly: response.monthly.clone(),
        total_expenses,
    })
}

/// Group raw categories, returning the display list and the expense total
pub fn group_categories(raw: &[RawCategory]) -> (Vec<ExpenseCategory>, f64) {
    let expenses: Vec<&RawCategory> = raw.iter().filter(|c| c.name != INCOME_CATEGORY).collect();
    let total: f64 = expenses.iter().map(|c| c.amount).sum();

    let (main, other): (Vec<&RawCategory>, Vec<&RawCategory>) =
        expenses.into_iter().partition(|c| is_main_category(&c.name));

    let mut grouped: Vec<RawCategory> = main.into_iter().cloned().collect();
    if !other.is_empty() {
        grouped.push(RawCategory {
            name: OTHER_CATEGORY.to_string(),
            amount: other.iter().map(|c| c.amount).sum(),
            trend: Trend::Stable,
            trend_value: 0.0,
        });
    }

    let mut categories: Vec<ExpenseCategory> = grouped
        .into_iter()
        .map(|c| ExpenseCategory {
            percentage: if total > 0.0 {
                c.amount / total * 100.0
            } else {
                0.0
            },
            color: category_color(&c.name).to_string(),
            name: c.name,
            amount: c.amount,
            trend: c.trend,
            trend_value: c.trend_value,
        })
        .collect();

    categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    (categories, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyPoint;

    fn response(categories: Vec<RawCategory>) -> ExpenseResponse {
        ExpenseResponse {
            categories: Some(categories),
            monthly: vec![
                MonthlyPoint {
                    month: "Jul".to_string(),
                    amount: 3100.0,
                },
                MonthlyPoint {
                    month: "Aug".to_string(),
                    amount: 2950.5,
                },
            ],
        }
    }

    fn sample() -> Vec<RawCategory> {
        vec![
            RawCategory::new("Income", 6500.0),
            RawCategory::new("Mortgage", 1800.0),
            RawCategory::new("Groceries", 450.0),
            RawCategory::new("Dining", 220.0),
            RawCategory::new("Entertainment", 80.0),
            RawCategory::new("Travel", 150.0),
            RawCategory {
                name: "Utilities".to_string(),
                amount: 300.0,
                trend: Trend::Up,
                trend_value: 4.0,
            },
        ]
    }

    #[test]
    fn test_income_is_excluded() {
        let breakdown = aggregate(&response(sample())).unwrap();
        assert!(breakdown.categories.iter().all(|c| c.name != "Income"));
        assert_eq!(breakdown.total_expenses, 3000.0);
    }

    #[test]
    fn test_non_main_categories_fold_into_other() {
        let breakdown = aggregate(&response(sample())).unwrap();
        let other = breakdown
            .categories
            .iter()
            .find(|c| c.name == OTHER_CATEGORY)
            .unwrap();
        assert_eq!(other.amount, 230.0);
        assert_eq!(other.trend, Trend::Stable);
        assert_eq!(other.trend_value, 0.0);
        assert_eq!(other.color, OTHER_COLOR);

        let names: Vec<&str> = breakdown.categories.iter().map(|c| c.name.as_str()).collect();
        assert!(!names.contains(&"Entertainment"));
        assert!(!names.contains(&"Travel"));
    }

    #[test]
    fn test_amounts_add_up_to_total() {
        let breakdown = aggregate(&response(sample())).unwrap();
        let main: f64 = breakdown
            .categories
            .iter()
            .filter(|c| c.name != OTHER_CATEGORY)
            .map(|c| c.amount)
            .sum();
        let other: f64 = breakdown
            .categories
            .iter()
            .filter(|c| c.name == OTHER_CATEGORY)
            .map(|c| c.amount)
            .sum();
        assert!((main + other - breakdown.total_expenses).abs() < 1e-9);

        let percentages: f64 = breakdown.categories.iter().map(|c| c.percentage).sum();
        assert!((percentages - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_and_sorting() {
        let breakdown = aggregate(&response(sample())).unwrap();
        let names: Vec<&str> = breakdown.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Mortgage", "Groceries", "Utilities", "Other", "Dining"]);

        assert!((breakdown.categories[0].percentage - 60.0).abs() < 1e-9);
        assert!((breakdown.categories[1].percentage - 15.0).abs() < 1e-9);

        let utilities = &breakdown.categories[2];
        assert_eq!(utilities.trend, Trend::Up);
        assert_eq!(utilities.trend_value, 4.0);
        assert_eq!(utilities.color, "#f97316");
    }

    #[test]
    fn test_no_other_bucket_when_all_main() {
        let breakdown = aggregate(&response(vec![
            RawCategory::new("Shopping", 100.0),
            RawCategory::new("Transport", 50.0),
        ]))
        .unwrap();
        assert_eq!(breakdown.categories.len(), 2);
        assert!(breakdown.categories.iter().all(|c| c.name != OTHER_CATEGORY));
    }

    #[test]
    fn test_zero_total_has_zero_percentages() {
        let breakdown = aggregate(&response(vec![
            RawCategory::new("Income", 5000.0),
            RawCategory::new("Dining", 0.0),
            RawCategory::new("Pets", 0.0),
        ]))
        .unwrap();
        assert_eq!(breakdown.total_expenses, 0.0);
        assert_eq!(breakdown.categories.len(), 2);
        assert!(breakdown.categories.iter().all(|c| c.percentage == 0.0));
    }

    #[test]
    fn test_empty_categories() {
        let breakdown = aggregate(&response(vec![])).unwrap();
        assert!(breakdown.categories.is_empty());
        assert_eq!(breakdown.total_expenses, 0.0);
    }

    #[test]
    fn test_monthly_passes_through() {
        let input = response(sample());
        let breakdown = aggregate(&input).unwrap();
        assert_eq!(breakdown.monthly, input.monthly);
    }

    #[test]
    fn test_missing_categories_is_malformed() {
        let input = ExpenseResponse {
            categories: None,
            monthly: vec![],
        };
        assert!(matches!(aggregate(&input), Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn test_category_color_fallback() {
        assert_eq!(category_color("Mortgage"), "#f59e0b");
        assert_eq!(category_color("Pets"), OTHER_COLOR);
        assert_eq!(category_color(OTHER_CATEGORY), OTHER_COLOR);
    }
}
