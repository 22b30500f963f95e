//! Profile, activity, and mood handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState};
use finsight_core::models::{NewUserProfile, UserProfileUpdate};

/// POST /signup - Create a user profile
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewUserProfile>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.create_user(&body)?;
    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::internal("User vanished after insert"))?;

    info!(email = %user.email, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "User created successfully",
            "user": user,
        })),
    ))
}

/// PUT /update_user/:id - Partial profile update by ID
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UserProfileUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    let changed = state.db.update_user(id, &body)?;
    if changed == 0 {
        return Err(AppError::not_found("User not found"));
    }
    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "User profile updated successfully",
        "user": user,
    })))
}

#[derive(Deserialize)]
pub struct UpdateByEmailRequest {
    pub email: String,
    #[serde(flatten)]
    pub update: UserProfileUpdate,
}

/// PUT /update_user_by_email - Partial profile update addressed by email
pub async fn update_user_by_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateByEmailRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.update_user_by_email(&body.email, &body.update)?;
    let user = state
        .db
        .get_user_by_email(&body.email)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "User profile updated successfully",
        "user": user,
    })))
}

#[derive(Deserialize)]
pub struct AddActiveRequest {
    /// Historical field name from the mobile client; "email" also accepted
    #[serde(alias = "email")]
    pub mail: String,
}

/// POST /add_active - Append an activity marker (duplicates allowed)
pub async fn add_active(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddActiveRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.mark_active(&body.mail)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "User added to active list successfully",
            "user": { "id": id, "mail": body.mail },
        })),
    ))
}

/// GET /last_active_user - Most recent activity marker plus its profile
pub async fn last_active_user(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let marker = state
        .db
        .last_active_user()?
        .ok_or_else(|| AppError::not_found("No active users found"))?;

    let user = state
        .db
        .get_user_by_email(&marker.email)?
        .ok_or_else(|| AppError::not_found("User details not found for this email"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Last active user retrieved successfully",
        "active_entry": marker,
        "user_details": user,
    })))
}

#[derive(Deserialize)]
pub struct AddMoodRequest {
    pub email: String,
    pub mood: String,
}

/// POST /add_mood - Log a mood for a user
pub async fn add_mood(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddMoodRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.add_mood(&body.email, &body.mood)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Mood added successfully",
            "mood": { "id": id, "mood": body.mood },
        })),
    ))
}
