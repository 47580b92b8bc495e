//! Read-only aggregates over project expenses.

use serde::{Deserialize, Serialize};

/// Comparison between a project's declared budget and what it has spent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub budget: f64,
    pub total_expenses: f64,
    pub remaining: f64,
    /// `0` when the budget is `0`.
    pub percentage_used: f64,
}

/// Sum of expense amounts; `0.0` (never `-0.0`) when there are none.
pub(crate) fn total_amount(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts.into_iter().fold(0.0, |total, amount| total + amount)
}

impl BudgetSummary {
    pub fn new(budget: f64, amounts: impl IntoIterator<Item = f64>) -> Self {
        let total_expenses = total_amount(amounts);
        let percentage_used = if budget > 0.0 {
            total_expenses / budget * 100.0
        } else {
            0.0
        };
        Self {
            budget,
            total_expenses,
            remaining: budget - total_expenses,
            percentage_used,
        }
    }
}

/// Portfolio-wide counters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_projects: u64,
    /// Projects not yet in `closing` or `closed`.
    pub active_projects: u64,
    pub total_expenses: f64,
    pub overdue_milestones: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_against_budget() {
        let summary = BudgetSummary::new(100_000.0, [6000.0, 500.0]);

        assert_eq!(summary.total_expenses, 6500.0);
        assert_eq!(summary.remaining, 93_500.0);
        assert!((summary.percentage_used - 6.5).abs() < 1e-9);
    }

    #[test]
    fn zero_budget_reports_zero_percent() {
        let summary = BudgetSummary::new(0.0, [120.0]);

        assert_eq!(summary.percentage_used, 0.0);
        assert_eq!(summary.remaining, -120.0);
    }

    #[test]
    fn empty_project_spent_nothing() {
        let summary = BudgetSummary::new(500.0, Vec::new());
        assert_eq!(summary.total_expenses, 0.0);
        assert!(summary.total_expenses.is_sign_positive());
        assert_eq!(summary.remaining, 500.0);
        assert!(summary.percentage_used.is_sign_positive());
    }
}
