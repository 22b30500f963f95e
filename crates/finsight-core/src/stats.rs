//! Transaction aggregation
//!
//! All arithmetic stays in `Decimal`; floats only appear when serde
//! serializes the response. Percentages are rounded to two decimal places.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Transaction, TransactionType};

/// Per-label expense total, in first-seen order
#[derive(Debug, Clone, Serialize)]
pub struct LabelTotal {
    pub label: String,
    pub total: Decimal,
}

/// Aggregated view of a user's transactions
#[derive(Debug, Clone, Serialize)]
pub struct TransactionStats {
    /// Declared monthly income from the profile
    pub monthly_income: Decimal,
    pub total_expenses: Decimal,
    /// Income recorded as transactions, distinct from declared income
    pub transaction_income: Decimal,
    pub savings: Decimal,
    /// Percentage of declared income left after expenses; 0 when income is 0
    pub savings_rate: Decimal,
    /// Percentage of declared income spent; 0 when income is 0
    pub expense_ratio: Decimal,
    pub transaction_count: usize,
    pub category_breakdown: Vec<LabelTotal>,
    pub mood_breakdown: Vec<LabelTotal>,
}

/// Condensed summary for the dashboard endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub monthly_income: Decimal,
    pub total_expenses: Decimal,
    pub current_savings: Decimal,
    pub savings_rate: Decimal,
}

/// Transactions sharing a mood, with their combined amount
#[derive(Debug, Clone, Serialize)]
pub struct MoodGroup {
    pub mood: String,
    pub transactions: Vec<Transaction>,
    pub total: Decimal,
}

/// Compute aggregate statistics for a user's transactions
///
/// Zero declared income is a defined boundary, not an error: both rates
/// come out as 0.
pub fn compute_stats(monthly_income: Decimal, transactions: &[Transaction]) -> TransactionStats {
    let mut total_expenses = Decimal::ZERO;
    let mut transaction_income = Decimal::ZERO;
    let mut categories: Vec<LabelTotal> = Vec::new();
    let mut moods: Vec<LabelTotal> = Vec::new();

    for tx in transactions {
        match tx.transaction_type {
            TransactionType::Income => transaction_income += tx.amount,
            TransactionType::Expense => {
                total_expenses += tx.amount;
                accumulate(&mut categories, &tx.category, tx.amount);
                accumulate(&mut moods, &tx.mood, tx.amount);
            }
        }
    }

    let savings = monthly_income - total_expenses;
    let (savings_rate, expense_ratio) = if monthly_income > Decimal::ZERO {
        (
            (savings / monthly_income * Decimal::ONE_HUNDRED).round_dp(2),
            (total_expenses / monthly_income * Decimal::ONE_HUNDRED).round_dp(2),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    TransactionStats {
        monthly_income,
        total_expenses,
        transaction_income,
        savings,
        savings_rate,
        expense_ratio,
        transaction_count: transactions.len(),
        category_breakdown: categories,
        mood_breakdown: moods,
    }
}

/// Dashboard summary derived from the full stats
pub fn financial_summary(stats: &TransactionStats) -> FinancialSummary {
    FinancialSummary {
        monthly_income: stats.monthly_income,
        total_expenses: stats.total_expenses,
        current_savings: stats.savings,
        savings_rate: stats.savings_rate,
    }
}

/// Group transactions by mood, preserving first-seen order
pub fn group_by_mood(transactions: &[Transaction]) -> Vec<MoodGroup> {
    let mut groups: Vec<MoodGroup> = Vec::new();
    for tx in transactions {
        match groups.iter_mut().find(|g| g.mood == tx.mood) {
            Some(group) => {
                group.transactions.push(tx.clone());
                group.total += tx.amount;
            }
            None => groups.push(MoodGroup {
                mood: tx.mood.clone(),
                transactions: vec![tx.clone()],
                total: tx.amount,
            }),
        }
    }
    groups
}

fn accumulate(totals: &mut Vec<LabelTotal>, label: &str, amount: Decimal) {
    match totals.iter_mut().find(|t| t.label == label) {
        Some(entry) => entry.total += amount,
        None => totals.push(LabelTotal {
            label: label.to_string(),
            total: amount,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tx(amount: i64, category: &str, mood: &str, tx_type: TransactionType) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            user_email: "stats@example.com".to_string(),
            amount: Decimal::from(amount),
            description: format!("{} spend", category),
            category: category.to_string(),
            mood: mood.to_string(),
            location: "Chennai".to_string(),
            transaction_date: Utc::now(),
            transaction_type: tx_type,
        }
    }

    #[test]
    fn test_stats_scenario() {
        // 50000 declared income, 11500 in expenses
        let transactions = vec![
            tx(5000, "Rent", "Neutral", TransactionType::Expense),
            tx(3500, "Food", "Happy", TransactionType::Expense),
            tx(3000, "Shopping", "Stressed", TransactionType::Expense),
            tx(2000, "Freelance", "Happy", TransactionType::Income),
        ];

        let stats = compute_stats(Decimal::from(50000), &transactions);
        assert_eq!(stats.total_expenses, Decimal::from(11500));
        assert_eq!(stats.transaction_income, Decimal::from(2000));
        assert_eq!(stats.savings, Decimal::from(38500));
        assert_eq!(stats.savings_rate, Decimal::new(7700, 2)); // 77.00
        assert_eq!(stats.expense_ratio, Decimal::new(2300, 2)); // 23.00
        assert_eq!(stats.transaction_count, 4);
    }

    #[test]
    fn test_zero_income_rates() {
        let transactions = vec![tx(500, "Food", "Happy", TransactionType::Expense)];
        let stats = compute_stats(Decimal::ZERO, &transactions);
        assert_eq!(stats.savings_rate, Decimal::ZERO);
        assert_eq!(stats.expense_ratio, Decimal::ZERO);
        assert_eq!(stats.savings, Decimal::from(-500));
    }

    #[test]
    fn test_breakdowns_preserve_first_seen_order() {
        let transactions = vec![
            tx(100, "Food", "Happy", TransactionType::Expense),
            tx(200, "Travel", "Sad", TransactionType::Expense),
            tx(50, "Food", "Happy", TransactionType::Expense),
        ];
        let stats = compute_stats(Decimal::from(1000), &transactions);

        assert_eq!(stats.category_breakdown.len(), 2);
        assert_eq!(stats.category_breakdown[0].label, "Food");
        assert_eq!(stats.category_breakdown[0].total, Decimal::from(150));
        assert_eq!(stats.category_breakdown[1].label, "Travel");

        // Breakdown totals equal the expense total
        let sum: Decimal = stats.category_breakdown.iter().map(|c| c.total).sum();
        assert_eq!(sum, stats.total_expenses);
    }

    #[test]
    fn test_income_rows_excluded_from_breakdowns() {
        let transactions = vec![
            tx(100, "Food", "Happy", TransactionType::Expense),
            tx(9000, "Salary", "Happy", TransactionType::Income),
        ];
        let stats = compute_stats(Decimal::from(1000), &transactions);
        assert_eq!(stats.category_breakdown.len(), 1);
        assert_eq!(stats.mood_breakdown[0].total, Decimal::from(100));
    }

    #[test]
    fn test_group_by_mood() {
        let transactions = vec![
            tx(100, "Food", "Happy", TransactionType::Expense),
            tx(200, "Travel", "Sad", TransactionType::Expense),
            tx(50, "Food", "Happy", TransactionType::Expense),
        ];
        let groups = group_by_mood(&transactions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].mood, "Happy");
        assert_eq!(groups[0].transactions.len(), 2);
        assert_eq!(groups[0].total, Decimal::from(150));
        assert_eq!(groups[1].total, Decimal::from(200));
    }
}
