//! Calendar event, goal, and achievement handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use finsight_core::models::{CalendarEvent, NewAchievement, NewCalendarEvent, NewGoal};

fn event_json(ev: &CalendarEvent) -> serde_json::Value {
    serde_json::json!({
        "id": ev.id,
        "title": ev.title,
        "description": ev.description,
        "start_date": ev.start_date,
        "end_date": ev.end_date,
        "target_amount": ev.target_amount,
        "saved_amount": ev.saved_amount,
        "progress_percent": ev.progress_percent(),
        "location": ev.location,
    })
}

#[derive(Deserialize)]
pub struct CalendarEventRequest {
    pub user_email: String,
    #[serde(flatten)]
    pub event: NewCalendarEvent,
}

/// POST /calendar_event - Create or update a savings event
pub async fn upsert_calendar_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CalendarEventRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = state.db.upsert_calendar_event(&body.user_email, &body.event)?;

    let events = state.db.list_calendar_events(&body.user_email)?;
    let event = events
        .iter()
        .find(|ev| ev.id == id)
        .ok_or_else(|| AppError::internal("Event vanished after upsert"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "event": event_json(event),
    })))
}

/// GET /calendar_events/:email - A user's savings events with progress
pub async fn calendar_events(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let events = state.db.list_calendar_events(&email)?;
    let result: Vec<_> = events.iter().map(event_json).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "events": result,
    })))
}

/// GET /goals/:email - A user's savings goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let goals = state.db.list_goals(&email)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "goals": goals,
    })))
}

/// POST /goals/:email - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(body): Json<NewGoal>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.create_goal(&email, &body)?;
    let goals = state.db.list_goals(&email)?;
    let goal = goals
        .iter()
        .find(|g| g.id == id)
        .ok_or_else(|| AppError::internal("Goal vanished after insert"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Goal created successfully",
            "goal": goal,
        })),
    ))
}

/// GET /achievements/:email - A user's achievements
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let achievements = state.db.list_achievements(&email)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "achievements": achievements,
    })))
}

/// POST /achievements/:email - Record an achievement
pub async fn create_achievement(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
    Json(body): Json<NewAchievement>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.db.create_achievement(&email, &body)?;
    let achievements = state.db.list_achievements(&email)?;
    let achievement = achievements
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::internal("Achievement vanished after insert"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Achievement recorded successfully",
            "achievement": achievement,
        })),
    ))
}
