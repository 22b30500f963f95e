//! Domain models for FinSight

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A user profile, created at signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    /// Natural key used by the rest of the API surface
    pub email: String,
    pub occupation: String,
    /// Declared monthly income, distinct from recorded income transactions
    pub income: Decimal,
    pub financial_goal: String,
    /// Risk tolerance (free text, e.g. "low", "medium", "high")
    pub risk: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Profile fields accepted at signup (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserProfile {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub occupation: String,
    pub income: Decimal,
    pub financial_goal: String,
    pub risk: String,
    pub location: String,
}

/// Partial profile update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub occupation: Option<String>,
    pub income: Option<Decimal>,
    pub financial_goal: Option<String>,
    pub risk: Option<String>,
    pub location: Option<String>,
}

impl UserProfileUpdate {
    /// True when the update carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone_number.is_none()
            && self.occupation.is_none()
            && self.income.is_none()
            && self.financial_goal.is_none()
            && self.risk.is_none()
            && self.location.is_none()
    }
}

/// Append-only activity marker; most recent activity = highest id
#[derive(Debug, Clone, Serialize)]
pub struct ActiveMarker {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A logged mood, scoped to a user
#[derive(Debug, Clone, Serialize)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: i64,
    pub mood: String,
    pub created_at: DateTime<Utc>,
}

/// Whether a transaction is money out or money in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Owner email, joined from the users table for the API contract
    pub user_email: String,
    /// Always non-negative in intended use; direction comes from the type
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub mood: String,
    pub location: String,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: TransactionType,
}

/// A new transaction to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub mood: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub transaction_type: TransactionType,
}

fn default_location() -> String {
    "Current Location".to_string()
}

/// Partial transaction update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionUpdate {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub mood: Option<String>,
    pub location: Option<String>,
    pub transaction_type: Option<TransactionType>,
}

/// A calendar savings event with a funding target
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Funding progress as a percentage, capped at 100. Computed on read,
    /// never persisted.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pct = self.saved_amount / self.target_amount * Decimal::from(100);
        pct.min(Decimal::from(100)).round_dp(2)
    }
}

/// Calendar event fields accepted on create/update
#[derive(Debug, Clone, Deserialize)]
pub struct NewCalendarEvent {
    /// When present, updates the existing event instead of inserting
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_amount: Decimal,
    #[serde(default)]
    pub saved_amount: Decimal,
    pub location: Option<String>,
}

/// A savings goal with display metadata
#[derive(Debug, Clone, Serialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub target: Decimal,
    pub current: Decimal,
    pub category: String,
    pub deadline: NaiveDate,
    /// Hex display color, e.g. "#6366F1"
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
    pub monthly_contribution: Option<Decimal>,
}

/// Goal fields accepted on create
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub target: Decimal,
    #[serde(default)]
    pub current: Decimal,
    pub category: String,
    pub deadline: NaiveDate,
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
    pub monthly_contribution: Option<Decimal>,
}

/// A dated accomplishment with display metadata
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub icon: String,
    pub color: String,
}

/// Achievement fields accepted on create
#[derive(Debug, Clone, Deserialize)]
pub struct NewAchievement {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub icon: String,
    pub color: String,
}
