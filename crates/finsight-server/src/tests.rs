//! Server API tests

use std::sync::Arc;

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finsight_core::db::Database;
use finsight_core::mail::{MailClient, MockMailer};
use finsight_core::otp::OtpStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> (Router, Arc<MockMailer>) {
    let db = Database::in_memory().unwrap();
    let mailer = Arc::new(MockMailer::new());
    let app = create_router_with_options(
        db,
        ServerConfig::default(),
        Some(MailClient::Mock(mailer.clone())),
        OtpStore::new(),
    );
    (app, mailer)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn signup_body(email: &str, income: i64) -> serde_json::Value {
    serde_json::json!({
        "name": "Priya",
        "phone_number": "9876543210",
        "email": email,
        "occupation": "Engineer",
        "income": income,
        "financial_goal": "Save for a house",
        "risk": "medium",
        "location": "Chennai",
    })
}

async fn signup(app: &Router, email: &str, income: i64) {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/signup", signup_body(email, income)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn add_transaction(app: &Router, email: &str, body: serde_json::Value) {
    let mut body = body;
    body["user_email"] = serde_json::json!(email);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/add_transaction", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

// ========== Signup & Profile ==========

#[tokio::test]
async fn test_signup_creates_user() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            signup_body("new@example.com", 50000),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["user"]["email"], "new@example.com");
    assert!(json["user"]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_signup_duplicate_email_is_rejected() {
    let (app, _) = setup_test_app();
    signup(&app, "dup@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/signup",
            signup_body("dup@example.com", 60000),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_update_user_by_id_and_email() {
    let (app, _) = setup_test_app();
    signup(&app, "edit@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/update_user/1",
            serde_json::json!({ "occupation": "Architect" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"]["occupation"], "Architect");
    // Untouched field survives the partial update
    assert_eq!(json["user"]["name"], "Priya");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/update_user_by_email",
            serde_json::json!({ "email": "edit@example.com", "income": 70000 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["user"]["income"], 70000.0);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/update_user/999",
            serde_json::json!({ "occupation": "Ghost" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== OTP Flow ==========

#[tokio::test]
async fn test_send_otp_unknown_email() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/send_otp",
            serde_json::json!({ "email": "ghost@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_send_otp_requires_email() {
    let (app, _) = setup_test_app();

    // Absent and empty emails both get the standard 400 envelope
    for body in [serde_json::json!({}), serde_json::json!({ "email": "" })] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/send_otp", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Email is required");
    }
}

#[tokio::test]
async fn test_otp_full_login_flow() {
    let (app, mailer) = setup_test_app();
    signup(&app, "login@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/send_otp",
            serde_json::json!({ "email": "login@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let code = mailer.last_code_for("login@example.com").unwrap();
    assert_eq!(code.len(), 6);

    // Wrong code first
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/verify_otp",
            serde_json::json!({ "email": "login@example.com", "otp": "000000" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct code succeeds and returns the profile
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/verify_otp",
            serde_json::json!({ "email": "login@example.com", "otp": code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["user"]["email"], "login@example.com");

    // Code is single use
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/verify_otp",
            serde_json::json!({ "email": "login@example.com", "otp": code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_otp_delivery_failure_is_500() {
    let (app, mailer) = setup_test_app();
    signup(&app, "fail@example.com", 50000).await;
    mailer.set_failing(true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/send_otp",
            serde_json::json!({ "email": "fail@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_verify_otp_missing_fields() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/verify_otp",
            serde_json::json!({ "email": "x@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Activity & Mood ==========

#[tokio::test]
async fn test_active_marker_round_trip() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/last_active_user"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    signup(&app, "a@example.com", 50000).await;
    signup(&app, "b@example.com", 50000).await;

    for email in ["a@example.com", "b@example.com"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/add_active",
                serde_json::json!({ "mail": email }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_request("/last_active_user"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["active_entry"]["email"], "b@example.com");
    assert_eq!(json["user_details"]["email"], "b@example.com");
}

#[tokio::test]
async fn test_add_mood_requires_known_user() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add_mood",
            serde_json::json!({ "email": "ghost@example.com", "mood": "Happy" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    signup(&app, "mood@example.com", 50000).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add_mood",
            serde_json::json!({ "email": "mood@example.com", "mood": "Happy" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["mood"]["mood"], "Happy");
}

// ========== Transactions ==========

#[tokio::test]
async fn test_transaction_crud_over_http() {
    let (app, _) = setup_test_app();
    signup(&app, "tx@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/add_transaction",
            serde_json::json!({
                "user_email": "tx@example.com",
                "amount": 500,
                "description": "Groceries",
                "category": "Food & Dining",
                "mood": "Neutral",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    let id = json["transaction"]["id"].as_i64().unwrap();
    // Omitted fields take their defaults
    assert_eq!(json["transaction"]["location"], "Current Location");
    assert_eq!(json["transaction"]["transaction_type"], "expense");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/update_transaction/{}", id),
            serde_json::json!({ "amount": 650, "mood": "Happy" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["transaction"]["amount"], 650.0);
    assert_eq!(json["transaction"]["description"], "Groceries");

    let response = app
        .clone()
        .oneshot(get_request("/user_transactions/tx@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["count"], 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/delete_transaction/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/delete_transaction/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_user_transactions_degrade_to_empty_200() {
    let (app, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/user_transactions/ghost@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["count"], 0);
    assert!(json["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_recent_and_category_endpoints() {
    let (app, _) = setup_test_app();
    signup(&app, "q@example.com", 50000).await;

    for i in 0..4 {
        add_transaction(
            &app,
            "q@example.com",
            serde_json::json!({
                "amount": 100 + i,
                "description": format!("Spend {}", i),
                "category": "Food & Dining",
                "mood": "Neutral",
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(get_request("/recent_transactions/q@example.com/2"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["count"], 2);

    let response = app
        .clone()
        .oneshot(get_request(
            "/transactions_by_category/q@example.com/Food%20%26%20Dining",
        ))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["count"], 4);
    assert_eq!(json["total_amount"], 406.0);
}

// ========== Analytics ==========

#[tokio::test]
async fn test_transaction_stats_scenario() {
    let (app, _) = setup_test_app();
    signup(&app, "stats@example.com", 50000).await;

    add_transaction(
        &app,
        "stats@example.com",
        serde_json::json!({
            "amount": 8000,
            "description": "Rent",
            "category": "Bills & Utilities",
            "mood": "Sad",
        }),
    )
    .await;
    add_transaction(
        &app,
        "stats@example.com",
        serde_json::json!({
            "amount": 3500,
            "description": "Food",
            "category": "Food & Dining",
            "mood": "Happy",
        }),
    )
    .await;
    add_transaction(
        &app,
        "stats@example.com",
        serde_json::json!({
            "amount": 2000,
            "description": "Freelance",
            "category": "Income",
            "mood": "Happy",
            "transaction_type": "income",
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get_request("/transaction_stats/stats@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    assert_eq!(json["total_expenses"], 11500.0);
    assert_eq!(json["transaction_income"], 2000.0);
    assert_eq!(json["savings"], 38500.0);
    assert_eq!(json["savings_rate"], 77.0);
    assert_eq!(json["expense_ratio"], 23.0);
    // Income rows stay out of the expense breakdowns
    assert_eq!(json["category_breakdown"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get_request("/transaction_stats/ghost@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_dashboard() {
    let (app, _) = setup_test_app();
    signup(&app, "dash@example.com", 40000).await;

    for i in 0..7 {
        add_transaction(
            &app,
            "dash@example.com",
            serde_json::json!({
                "amount": 100,
                "description": format!("Spend {}", i),
                "category": "Food & Dining",
                "mood": "Neutral",
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(get_request("/user_dashboard/dash@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    assert_eq!(json["user_profile"]["email"], "dash@example.com");
    assert_eq!(json["financial_summary"]["monthly_income"], 40000.0);
    assert_eq!(json["financial_summary"]["total_expenses"], 700.0);
    // Dashboard caps recent activity at five entries
    assert_eq!(json["recent_transactions"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_ai_suggestions_fire_for_overspending() {
    let (app, _) = setup_test_app();
    signup(&app, "sug@example.com", 10000).await;

    add_transaction(
        &app,
        "sug@example.com",
        serde_json::json!({
            "amount": 9000,
            "description": "Shopping spree",
            "category": "Shopping",
            "mood": "Stressed",
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get_request("/ai_suggestions/sug@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    let ids: Vec<&str> = json["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"savings_rate"));
    assert!(ids.contains(&"expense_ratio"));
    assert!(ids.contains(&"mood_spending"));
    assert_eq!(json["user_stats"]["monthly_income"], 10000.0);
}

#[tokio::test]
async fn test_top_spending_locations_offsets_coincident_points() {
    let (app, _) = setup_test_app();
    signup(&app, "geo@example.com", 50000).await;

    for amount in [300, 200, 100] {
        add_transaction(
            &app,
            "geo@example.com",
            serde_json::json!({
                "amount": amount,
                "description": "Chennai spend",
                "category": "Shopping",
                "mood": "Happy",
                "location": "Chennai",
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(get_request("/top_spending_locations/geo@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    let points = json["top_locations"].as_array().unwrap();
    assert_eq!(points.len(), 3);
    let lats: Vec<f64> = points.iter().map(|p| p["latitude"].as_f64().unwrap()).collect();
    assert!(lats[0] != lats[1] && lats[1] != lats[2]);
    assert_eq!(points[0]["color"], "#EC4899");
    assert_eq!(points[0]["total_amount"], 300.0);
}

#[tokio::test]
async fn test_moods_transactions_grouping() {
    let (app, _) = setup_test_app();
    signup(&app, "moodtx@example.com", 50000).await;

    for (amount, mood) in [(100, "Happy"), (200, "Sad"), (50, "Happy")] {
        add_transaction(
            &app,
            "moodtx@example.com",
            serde_json::json!({
                "amount": amount,
                "description": "spend",
                "category": "Food & Dining",
                "mood": mood,
            }),
        )
        .await;
    }

    let response = app
        .clone()
        .oneshot(get_request("/moods_transactions/moodtx@example.com?days=30"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;

    // Payload is an object keyed by mood, not a list
    let data = json["data"].as_object().unwrap();
    assert_eq!(data.len(), 2);
    let happy = &data["Happy"];
    assert_eq!(happy["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(happy["total"], 150.0);
    assert_eq!(data["Sad"]["total"], 200.0);
}

// ========== Seeding ==========

#[tokio::test]
async fn test_init_sample_transactions() {
    let (app, _) = setup_test_app();
    signup(&app, "seed@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/init_sample_transactions/seed@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 11);
    assert_eq!(json["user_income"], 50000.0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/init_sample_transactions/ghost@example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Calendar, Goals, Achievements ==========

#[tokio::test]
async fn test_calendar_event_lifecycle() {
    let (app, _) = setup_test_app();
    signup(&app, "cal@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/calendar_event",
            serde_json::json!({
                "user_email": "cal@example.com",
                "title": "Goa trip",
                "start_date": "2026-12-20",
                "end_date": "2026-12-27",
                "target_amount": 20000,
                "saved_amount": 5000,
                "location": "Goa",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let id = json["event"]["id"].as_i64().unwrap();
    assert_eq!(json["event"]["progress_percent"], 25.0);

    // Update in place via explicit id
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/calendar_event",
            serde_json::json!({
                "user_email": "cal@example.com",
                "id": id,
                "title": "Goa trip",
                "start_date": "2026-12-20",
                "target_amount": 20000,
                "saved_amount": 30000,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    // Progress caps at 100
    assert_eq!(json["event"]["progress_percent"], 100.0);

    let response = app
        .clone()
        .oneshot(get_request("/calendar_events/cal@example.com"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["events"].as_array().unwrap().len(), 1);

    // Unknown id fails rather than inserting
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/calendar_event",
            serde_json::json!({
                "user_email": "cal@example.com",
                "id": 9999,
                "title": "Phantom",
                "start_date": "2026-12-20",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_goals_and_achievements_endpoints() {
    let (app, _) = setup_test_app();
    signup(&app, "goal@example.com", 50000).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/goals/goal@example.com",
            serde_json::json!({
                "title": "Emergency fund",
                "target": 100000,
                "current": 25000,
                "category": "Savings",
                "deadline": "2027-03-01",
                "color": "#6366F1",
                "icon": "shield",
                "monthly_contribution": 5000,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request("/goals/goal@example.com"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    let goals = json["goals"].as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["title"], "Emergency fund");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/achievements/goal@example.com",
            serde_json::json!({
                "title": "First 10k saved",
                "date": "2026-08-01",
                "icon": "trophy",
                "color": "#F59E0B",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request("/achievements/goal@example.com"))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["achievements"].as_array().unwrap().len(), 1);
}
