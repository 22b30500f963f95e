//! FinSight Web Server
//!
//! Axum-based REST API for the FinSight personal finance application.
//!
//! Design notes:
//! - Routes live at the root (no /api prefix), matching the mobile client.
//! - Every JSON body carries `status` ("success"/"error") and `message`
//!   alongside the domain payload.
//! - Analytics endpoints (stats, dashboard, suggestions, locations, moods)
//!   degrade to an empty 200 payload on internal failure so the client UI
//!   keeps rendering.
//! - Sanitized error responses; full errors go to the log only.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use finsight_core::db::Database;
use finsight_core::mail::MailClient;
use finsight_core::otp::OtpStore;
use finsight_core::suggestions::SuggestionEngine;

mod handlers;

#[cfg(test)]
mod tests;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    /// Outstanding OTP codes, in memory only
    pub otp: OtpStore,
    /// Mail delivery; None means OTP email is unconfigured
    pub mailer: Option<MailClient>,
    pub suggestions: SuggestionEngine,
}

/// Build the application router with the default mail client
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let mailer = MailClient::from_env();
    if mailer.is_none() {
        info!(
            "Mail relay not configured (set {} to enable OTP email)",
            finsight_core::mail::MAIL_HOST_ENV
        );
    }
    create_router_with_options(db, config, mailer, OtpStore::new())
}

/// Build the router with explicit mail and OTP components (for tests)
pub fn create_router_with_options(
    db: Database,
    config: ServerConfig,
    mailer: Option<MailClient>,
    otp: OtpStore,
) -> Router {
    let state = Arc::new(AppState {
        db,
        otp,
        mailer,
        suggestions: SuggestionEngine::with_default_rules(),
    });

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        // Profiles
        .route("/signup", post(handlers::signup))
        .route("/update_user/:id", put(handlers::update_user))
        .route("/update_user_by_email", put(handlers::update_user_by_email))
        // OTP login
        .route("/send_otp", post(handlers::send_otp))
        .route("/verify_otp", post(handlers::verify_otp))
        // Activity + mood
        .route("/add_active", post(handlers::add_active))
        .route("/last_active_user", get(handlers::last_active_user))
        .route("/add_mood", post(handlers::add_mood))
        .route("/moods_transactions/:email", get(handlers::moods_transactions))
        // Transactions
        .route("/add_transaction", post(handlers::add_transaction))
        .route("/transactions", get(handlers::list_all_transactions))
        .route("/user_transactions/:email", get(handlers::user_transactions))
        .route("/update_transaction/:id", put(handlers::update_transaction))
        .route("/delete_transaction/:id", delete(handlers::delete_transaction))
        .route(
            "/recent_transactions/:email/:limit",
            get(handlers::recent_transactions),
        )
        .route(
            "/transactions_by_category/:email/:category",
            get(handlers::transactions_by_category),
        )
        .route(
            "/init_sample_transactions/:email",
            post(handlers::init_sample_transactions),
        )
        // Analytics
        .route("/transaction_stats/:email", get(handlers::transaction_stats))
        .route("/user_dashboard/:email", get(handlers::user_dashboard))
        .route("/ai_suggestions/:email", get(handlers::ai_suggestions))
        .route(
            "/top_spending_locations/:email",
            get(handlers::top_spending_locations),
        )
        // Calendar, goals, achievements
        .route("/calendar_event", post(handlers::upsert_calendar_event))
        .route("/calendar_events/:email", get(handlers::calendar_events))
        .route(
            "/goals/:email",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/achievements/:email",
            get(handlers::list_achievements).post(handlers::create_achievement),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(db, config);

    let addr = format!("{}:{}", host, port);
    info!("Starting FinSight server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// API error that renders as the standard error envelope
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }
        if self.status.is_server_error() {
            warn!(status = %self.status, message = %self.message, "Request failed");
        }

        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<finsight_core::Error> for AppError {
    fn from(err: finsight_core::Error) -> Self {
        use finsight_core::Error;
        match err {
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::InvalidInput(msg) => Self::bad_request(&msg),
            Error::InvalidOtp => Self::unauthorized("Invalid or expired OTP"),
            Error::Delivery(msg) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to send OTP".to_string(),
                internal: Some(anyhow::anyhow!(msg)),
            },
            // Sanitize everything else
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
