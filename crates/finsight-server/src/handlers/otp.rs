//! OTP login handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{AppError, AppState};
use finsight_core::mail::Mailer;

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: Option<String>,
}

/// POST /send_otp - Issue a code and mail it to a registered user
///
/// The code is stored before delivery is attempted: a delivery failure
/// returns 500 but leaves the code valid, and a retry simply overwrites it.
pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = match body.email {
        Some(email) if !email.is_empty() => email,
        _ => return Err(AppError::bad_request("Email is required")),
    };

    if state.db.get_user_by_email(&email)?.is_none() {
        return Err(AppError::not_found("Email not found. Please sign up first."));
    }

    let code = state.otp.issue(&email);

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::internal("OTP delivery is not configured"))?;

    if let Err(e) = mailer.send_otp(&email, &code).await {
        warn!(email = %email, error = %e, "OTP delivery failed");
        return Err(AppError::internal("Failed to send OTP"));
    }

    info!(email = %email, "OTP issued and sent");

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "OTP sent successfully",
    })))
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    pub otp: Option<String>,
}

/// POST /verify_otp - Verify a submitted code, completing login
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (email, otp) = match (body.email, body.otp) {
        (Some(email), Some(otp)) if !email.is_empty() && !otp.is_empty() => (email, otp),
        _ => return Err(AppError::bad_request("Email and OTP are required")),
    };

    if !state.otp.verify(&email, &otp) {
        return Err(AppError::unauthorized("Invalid OTP"));
    }

    let user = state
        .db
        .get_user_by_email(&email)?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!(email = %email, "OTP verified, login successful");

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Login successful",
        "user": user,
    })))
}
