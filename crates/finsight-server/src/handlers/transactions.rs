//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::{AppError, AppState};
use finsight_core::models::{NewTransaction, TransactionUpdate};
use finsight_core::seed::seed_sample_transactions;
use finsight_core::Error;

#[derive(Deserialize)]
pub struct AddTransactionRequest {
    pub user_email: String,
    #[serde(flatten)]
    pub transaction: NewTransaction,
}

/// POST /add_transaction - Record a transaction
pub async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddTransactionRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.insert_transaction(&body.user_email, &body.transaction)?;
    let transaction = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::internal("Transaction vanished after insert"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Transaction added successfully",
            "transaction": transaction,
        })),
    ))
}

/// GET /user_transactions/:email - All of a user's transactions
///
/// Degrades to an empty 200 payload on failure so list views keep
/// rendering.
pub async fn user_transactions(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Json<serde_json::Value> {
    match state.db.list_user_transactions(&email) {
        Ok(transactions) => {
            let count = transactions.len();
            Json(serde_json::json!({
                "status": "success",
                "transactions": transactions,
                "count": count,
                "message": format!("Found {} transactions for {}", count, email),
            }))
        }
        Err(e) => {
            warn!(email = %email, error = %e, "Listing user transactions failed");
            Json(serde_json::json!({
                "status": "error",
                "message": "Could not load transactions",
                "transactions": [],
                "count": 0,
            }))
        }
    }
}

/// GET /transactions - All transactions across users
pub async fn list_all_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let transactions = state.db.list_all_transactions()?;
    let count = transactions.len();

    Ok(Json(serde_json::json!({
        "status": "success",
        "transactions": transactions,
        "count": count,
    })))
}

/// PUT /update_transaction/:id - Partial transaction update
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<TransactionUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let changed = state.db.update_transaction(id, &body)?;
    if changed == 0 {
        return Err(AppError::not_found("Transaction not found"));
    }
    let transaction = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Transaction updated successfully",
        "transaction": transaction,
    })))
}

/// DELETE /delete_transaction/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.db.delete_transaction(id)?;
    if deleted == 0 {
        return Err(AppError::not_found("Transaction not found"));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Transaction deleted successfully",
    })))
}

/// GET /recent_transactions/:email/:limit
pub async fn recent_transactions(
    State(state): State<Arc<AppState>>,
    Path((email, limit)): Path<(String, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let limit = limit.max(1);
    let transactions = state.db.recent_transactions(&email, limit)?;
    let count = transactions.len();

    Ok(Json(serde_json::json!({
        "status": "success",
        "transactions": transactions,
        "count": count,
    })))
}

/// GET /transactions_by_category/:email/:category
pub async fn transactions_by_category(
    State(state): State<Arc<AppState>>,
    Path((email, category)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let transactions = state.db.transactions_by_category(&email, &category)?;
    let total_amount: Decimal = transactions.iter().map(|t| t.amount).sum();
    let count = transactions.len();

    Ok(Json(serde_json::json!({
        "status": "success",
        "category": category,
        "transactions": transactions,
        "count": count,
        "total_amount": total_amount,
    })))
}

/// POST /init_sample_transactions/:email - Seed the demo spending set
pub async fn init_sample_transactions(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let report = match seed_sample_transactions(&state.db, &email) {
        Ok(report) => report,
        Err(Error::NotFound(_)) => return Err(AppError::not_found("User not found")),
        Err(Error::InvalidInput(msg)) => return Err(AppError::bad_request(&msg)),
        Err(e) => return Err(e.into()),
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": format!("Added {} sample transactions", report.transactions.len()),
            "user_income": report.user_income,
            "total_sample_expenses": report.total_sample_expenses,
            "savings": report.savings,
            "savings_rate": report.savings_rate,
            "transactions": report.transactions,
        })),
    ))
}
