//! Rule-based financial suggestions
//!
//! Each rule is a pure function over a user's aggregated stats. The engine
//! evaluates registered rules in order; registration order is output order.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::stats::TransactionStats;

/// How urgent a suggestion is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A single actionable suggestion for the user
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    /// Stable rule identifier, e.g. "savings_rate"
    pub id: String,
    pub title: String,
    pub description: String,
    /// Category of advice, e.g. "savings-improvement"
    pub kind: String,
    /// Expected effect if followed
    pub impact: String,
    pub priority: Priority,
    /// Which engine produced this ("rules")
    pub source: String,
    pub icon: String,
    pub color: String,
    pub actionable: bool,
}

/// A single analysis rule
pub trait SuggestionRule: Send + Sync {
    /// Stable identifier for this rule
    fn id(&self) -> &'static str;

    /// Evaluate the rule, returning a suggestion when it fires
    fn evaluate(&self, stats: &TransactionStats) -> Option<Suggestion>;
}

/// Engine holding registered rules
pub struct SuggestionEngine {
    rules: Vec<Box<dyn SuggestionRule>>,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl SuggestionEngine {
    /// Create an empty engine with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine with the built-in rule set
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(SavingsRateRule));
        engine.register(Box::new(ExpenseRatioRule));
        engine.register(Box::new(CategoryConcentrationRule));
        engine.register(Box::new(MoodSpendingRule));
        engine
    }

    /// Register a rule; evaluation order follows registration order
    pub fn register(&mut self, rule: Box<dyn SuggestionRule>) {
        self.rules.push(rule);
    }

    /// Evaluate all rules against the stats
    pub fn evaluate(&self, stats: &TransactionStats) -> Vec<Suggestion> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(stats))
            .collect()
    }
}

fn pct(value: Decimal) -> String {
    format!("{}%", value.round_dp(1))
}

/// Fires when the savings rate drops below 20% of declared income
pub struct SavingsRateRule;

impl SuggestionRule for SavingsRateRule {
    fn id(&self) -> &'static str {
        "savings_rate"
    }

    fn evaluate(&self, stats: &TransactionStats) -> Option<Suggestion> {
        if stats.monthly_income <= Decimal::ZERO || stats.savings_rate >= Decimal::from(20) {
            return None;
        }
        Some(Suggestion {
            id: self.id().to_string(),
            title: "Boost your savings rate".to_string(),
            description: format!(
                "You are saving {} of your income. Aim for at least 20% by trimming discretionary spending.",
                pct(stats.savings_rate)
            ),
            kind: "savings-improvement".to_string(),
            impact: format!(
                "Reaching 20% would set aside {} each month",
                (stats.monthly_income * Decimal::new(20, 2)).round_dp(2)
            ),
            priority: Priority::High,
            source: "rules".to_string(),
            icon: "piggy-bank".to_string(),
            color: "#10B981".to_string(),
            actionable: true,
        })
    }
}

/// Fires when expenses exceed 80% of declared income
pub struct ExpenseRatioRule;

impl SuggestionRule for ExpenseRatioRule {
    fn id(&self) -> &'static str {
        "expense_ratio"
    }

    fn evaluate(&self, stats: &TransactionStats) -> Option<Suggestion> {
        if stats.monthly_income <= Decimal::ZERO || stats.expense_ratio <= Decimal::from(80) {
            return None;
        }
        Some(Suggestion {
            id: self.id().to_string(),
            title: "Spending close to your income".to_string(),
            description: format!(
                "Your expenses are {} of your income, leaving little buffer for surprises.",
                pct(stats.expense_ratio)
            ),
            impact: "A monthly budget cap would rebuild your safety margin".to_string(),
            kind: "budget-warning".to_string(),
            priority: Priority::High,
            source: "rules".to_string(),
            icon: "alert-triangle".to_string(),
            color: "#EF4444".to_string(),
            actionable: true,
        })
    }
}

/// Fires when one category carries more than 40% of all expenses
pub struct CategoryConcentrationRule;

impl SuggestionRule for CategoryConcentrationRule {
    fn id(&self) -> &'static str {
        "category_concentration"
    }

    fn evaluate(&self, stats: &TransactionStats) -> Option<Suggestion> {
        if stats.total_expenses <= Decimal::ZERO {
            return None;
        }
        let top = stats
            .category_breakdown
            .iter()
            .max_by_key(|c| c.total)?;
        let share = top.total / stats.total_expenses * Decimal::ONE_HUNDRED;
        if share <= Decimal::from(40) {
            return None;
        }
        Some(Suggestion {
            id: self.id().to_string(),
            title: format!("{} dominates your spending", top.label),
            description: format!(
                "{} of your expenses went to {}. Check whether that matches your priorities.",
                pct(share.round_dp(2)),
                top.label
            ),
            impact: format!("Cutting {} by 10% frees up real savings", top.label),
            kind: "spending-pattern".to_string(),
            priority: Priority::Medium,
            source: "rules".to_string(),
            icon: "pie-chart".to_string(),
            color: "#F59E0B".to_string(),
            actionable: true,
        })
    }
}

/// Fires when Sad/Stressed spending exceeds 15% of all expenses
pub struct MoodSpendingRule;

impl SuggestionRule for MoodSpendingRule {
    fn id(&self) -> &'static str {
        "mood_spending"
    }

    fn evaluate(&self, stats: &TransactionStats) -> Option<Suggestion> {
        if stats.total_expenses <= Decimal::ZERO {
            return None;
        }
        let emotional: Decimal = stats
            .mood_breakdown
            .iter()
            .filter(|m| m.label.eq_ignore_ascii_case("sad") || m.label.eq_ignore_ascii_case("stressed"))
            .map(|m| m.total)
            .sum();
        let share = emotional / stats.total_expenses * Decimal::ONE_HUNDRED;
        if share <= Decimal::from(15) {
            return None;
        }
        Some(Suggestion {
            id: self.id().to_string(),
            title: "Watch emotional spending".to_string(),
            description: format!(
                "{} of your spending happened while sad or stressed. A short pause before buying can help.",
                pct(share.round_dp(2))
            ),
            impact: "Reducing mood-driven purchases protects your savings goals".to_string(),
            kind: "mood-spending".to_string(),
            priority: Priority::Low,
            source: "rules".to_string(),
            icon: "heart".to_string(),
            color: "#8B5CF6".to_string(),
            actionable: true,
        })
    }
}
