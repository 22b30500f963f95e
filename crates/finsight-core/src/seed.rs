//! Sample transaction seeding
//!
//! Populates a realistic month of spending for demos and fresh accounts.
//! Amounts are proportional to the user's declared income so the dashboard
//! looks sensible for any salary.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionType};

/// Blueprint for one sample transaction
struct SampleLine {
    /// Share of monthly income, in basis points (70 = 0.7%)
    share_bp: i64,
    description: &'static str,
    category: &'static str,
    mood: &'static str,
    /// None means "use the user's own location"
    location: Option<&'static str>,
}

const SAMPLE_LINES: &[SampleLine] = &[
    SampleLine { share_bp: 70, description: "Lunch at Cafe Coffee Day", category: "Food & Dining", mood: "Happy", location: None },
    SampleLine { share_bp: 180, description: "Uber ride to office", category: "Transportation", mood: "Neutral", location: None },
    SampleLine { share_bp: 380, description: "Shopping at Reliance Trends", category: "Shopping", mood: "Happy", location: None },
    SampleLine { share_bp: 540, description: "Electricity Bill", category: "Bills & Utilities", mood: "Neutral", location: Some("Online Payment") },
    SampleLine { share_bp: 2300, description: "House Rent", category: "Bills & Utilities", mood: "Sad", location: None },
    SampleLine { share_bp: 120, description: "Movie tickets", category: "Entertainment", mood: "Joyful", location: Some("PVR Cinemas") },
    SampleLine { share_bp: 770, description: "Groceries for month", category: "Food & Dining", mood: "Neutral", location: Some("BigBasket") },
    SampleLine { share_bp: 310, description: "Petrol", category: "Transportation", mood: "Sad", location: Some("HP Petrol Pump") },
    SampleLine { share_bp: 230, description: "Doctor consultation", category: "Healthcare", mood: "Neutral", location: Some("Apollo Hospital") },
    SampleLine { share_bp: 1540, description: "SIP Investment", category: "Investment", mood: "Happy", location: Some("Zerodha") },
    SampleLine { share_bp: 460, description: "Weekend trip", category: "Travel", mood: "Joyful", location: None },
];

/// One inserted sample line, echoed back to the caller
#[derive(Debug, Clone, Serialize)]
pub struct SeededTransaction {
    pub description: String,
    pub amount: Decimal,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub user_income: Decimal,
    pub total_sample_expenses: Decimal,
    pub savings: Decimal,
    pub savings_rate: Decimal,
    pub transactions: Vec<SeededTransaction>,
}

/// Insert the income-proportional sample set for a user
///
/// Fails with `NotFound` for an unknown email and `InvalidInput` when the
/// profile has no income to scale against.
pub fn seed_sample_transactions(db: &Database, email: &str) -> Result<SeedReport> {
    let user = db
        .get_user_by_email(email)?
        .ok_or_else(|| Error::NotFound(format!("User not found: {}", email)))?;

    if user.income <= Decimal::ZERO {
        return Err(Error::InvalidInput("User income not set".to_string()));
    }

    let fallback_location = if user.location.is_empty() {
        "Current City".to_string()
    } else {
        user.location.clone()
    };

    let mut seeded = Vec::with_capacity(SAMPLE_LINES.len());
    let mut total = Decimal::ZERO;

    for line in SAMPLE_LINES {
        let amount = (user.income * Decimal::new(line.share_bp, 4)).round_dp(2);
        let tx = NewTransaction {
            amount,
            description: line.description.to_string(),
            category: line.category.to_string(),
            mood: line.mood.to_string(),
            location: line
                .location
                .map(str::to_string)
                .unwrap_or_else(|| fallback_location.clone()),
            transaction_type: TransactionType::Expense,
        };
        db.insert_transaction(email, &tx)?;
        total += amount;
        seeded.push(SeededTransaction {
            description: line.description.to_string(),
            amount,
        });
    }

    let savings = user.income - total;
    let savings_rate = (savings / user.income * Decimal::ONE_HUNDRED).round_dp(2);

    Ok(SeedReport {
        user_income: user.income,
        total_sample_expenses: total,
        savings,
        savings_rate,
        transactions: seeded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUserProfile;

    fn user(email: &str, income: i64) -> NewUserProfile {
        NewUserProfile {
            name: "Seed".to_string(),
            phone_number: "9000000000".to_string(),
            email: email.to_string(),
            occupation: "Tester".to_string(),
            income: Decimal::from(income),
            financial_goal: "Save".to_string(),
            risk: "low".to_string(),
            location: "Chennai".to_string(),
        }
    }

    #[test]
    fn test_seed_scales_with_income() {
        let db = Database::in_memory().unwrap();
        db.create_user(&user("seed@example.com", 50000)).unwrap();

        let report = seed_sample_transactions(&db, "seed@example.com").unwrap();
        assert_eq!(report.transactions.len(), 11);
        // 0.7% of 50000
        assert_eq!(report.transactions[0].amount, Decimal::from(350));
        // 69% of income in total across the sample set
        assert_eq!(report.total_sample_expenses, Decimal::from(34500));
        assert_eq!(report.savings, Decimal::from(15500));
        assert_eq!(report.savings_rate, Decimal::new(3100, 2));

        let listed = db.list_user_transactions("seed@example.com").unwrap();
        assert_eq!(listed.len(), 11);
    }

    #[test]
    fn test_seed_requires_income() {
        let db = Database::in_memory().unwrap();
        db.create_user(&user("zero@example.com", 0)).unwrap();
        let err = seed_sample_transactions(&db, "zero@example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_seed_unknown_user() {
        let db = Database::in_memory().unwrap();
        let err = seed_sample_transactions(&db, "ghost@example.com").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
