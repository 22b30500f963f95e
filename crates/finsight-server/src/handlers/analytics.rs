//! Aggregation, suggestion, mood, and spending-map handlers
//!
//! These endpoints feed dashboard widgets, so most of them degrade to an
//! empty 200 payload instead of failing: a chart with no data beats a
//! broken screen. Unknown users still get a 404 where the original
//! contract had one.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::{AppError, AppState};
use finsight_core::geo;
use finsight_core::stats::{self, TransactionStats};

fn stats_for(state: &AppState, email: &str) -> Result<TransactionStats, finsight_core::Error> {
    let user = state
        .db
        .get_user_by_email(email)?
        .ok_or_else(|| finsight_core::Error::NotFound(format!("User not found: {}", email)))?;
    let transactions = state.db.list_user_transactions(email)?;
    Ok(stats::compute_stats(user.income, &transactions))
}

fn empty_stats_payload(message: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "error",
        "message": message,
        "profile_income": 0,
        "total_expenses": 0,
        "savings": 0,
        "savings_rate": 0,
        "category_breakdown": [],
        "mood_breakdown": [],
    })
}

/// GET /transaction_stats/:email - Aggregated spending statistics
pub async fn transaction_stats(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stats = match stats_for(&state, &email) {
        Ok(stats) => stats,
        Err(finsight_core::Error::NotFound(_)) => {
            return Err(AppError::not_found("User not found"));
        }
        Err(e) => {
            warn!(email = %email, error = %e, "Stats computation failed");
            return Ok(Json(empty_stats_payload("Could not compute statistics")));
        }
    };

    let categories: Vec<_> = stats
        .category_breakdown
        .iter()
        .map(|c| serde_json::json!({ "category": c.label, "amount": c.total }))
        .collect();
    let moods: Vec<_> = stats
        .mood_breakdown
        .iter()
        .map(|m| serde_json::json!({ "mood": m.label, "amount": m.total }))
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "profile_income": stats.monthly_income,
        "total_expenses": stats.total_expenses,
        "transaction_income": stats.transaction_income,
        "savings": stats.savings,
        "savings_rate": stats.savings_rate,
        "expense_ratio": stats.expense_ratio,
        "category_breakdown": categories,
        "mood_breakdown": moods,
    })))
}

/// GET /user_dashboard/:email - Profile, summary, and recent activity
pub async fn user_dashboard(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let (summary, recent) = match state.db.list_user_transactions(&email) {
        Ok(transactions) => {
            let stats = stats::compute_stats(user.income, &transactions);
            let recent = state.db.recent_transactions(&email, 5).unwrap_or_default();
            (stats::financial_summary(&stats), recent)
        }
        Err(e) => {
            warn!(email = %email, error = %e, "Dashboard aggregation failed");
            let stats = stats::compute_stats(user.income, &[]);
            (stats::financial_summary(&stats), Vec::new())
        }
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "user_profile": user,
        "financial_summary": summary,
        "recent_transactions": recent,
    })))
}

/// GET /ai_suggestions/:email - Rule-based financial suggestions
pub async fn ai_suggestions(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let stats = match stats_for(&state, &email) {
        Ok(stats) => stats,
        Err(finsight_core::Error::NotFound(_)) => {
            return Err(AppError::not_found("User not found"));
        }
        Err(e) => {
            warn!(email = %email, error = %e, "Suggestion evaluation failed");
            return Ok(Json(serde_json::json!({
                "status": "error",
                "message": "Could not generate suggestions",
                "suggestions": [],
                "count": 0,
            })));
        }
    };

    let suggestions = state.suggestions.evaluate(&stats);
    let count = suggestions.len();

    Ok(Json(serde_json::json!({
        "status": "success",
        "suggestions": suggestions,
        "count": count,
        "user_stats": stats::financial_summary(&stats),
    })))
}

/// GET /top_spending_locations/:email - Top-3 expenses placed on the map
pub async fn top_spending_locations(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Json<serde_json::Value> {
    let locations = match state.db.list_user_transactions(&email) {
        Ok(transactions) => geo::top_spending_locations(&transactions, 3),
        Err(e) => {
            warn!(email = %email, error = %e, "Spending map lookup failed");
            Vec::new()
        }
    };
    let count = locations.len();

    Json(serde_json::json!({
        "status": "success",
        "top_locations": locations,
        "count": count,
    }))
}

#[derive(Deserialize)]
pub struct MoodPeriodQuery {
    /// Lookback window in days (7, 30, 90)
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

/// GET /moods_transactions/:email?days=N - Recent transactions grouped by mood
pub async fn moods_transactions(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Query(params): Query<MoodPeriodQuery>,
) -> Json<serde_json::Value> {
    let days = params.days.max(1);

    let groups = match state
        .db
        .get_user_by_email(&email)
        .and_then(|user| match user {
            Some(u) => state.db.transactions_since(u.id, days),
            None => Ok(Vec::new()),
        }) {
        Ok(transactions) => stats::group_by_mood(&transactions),
        Err(e) => {
            warn!(email = %email, error = %e, "Mood grouping failed");
            Vec::new()
        }
    };

    // The client indexes this payload by mood, so it goes out as an
    // object keyed by mood rather than a list.
    let mut data = serde_json::Map::new();
    for group in groups {
        data.insert(
            group.mood.clone(),
            serde_json::json!({
                "transactions": group.transactions,
                "total": group.total,
            }),
        );
    }

    Json(serde_json::json!({
        "status": "success",
        "data": data,
    }))
}
