//! Calendar event, goal, and achievement operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{decode_amount, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Achievement, CalendarEvent, Goal, NewAchievement, NewCalendarEvent, NewGoal};

impl Database {
    /// Create a calendar event, or update it in place when `id` is set
    ///
    /// Updating an event that does not belong to the user (or does not
    /// exist) fails with `NotFound`.
    pub fn upsert_calendar_event(&self, email: &str, event: &NewCalendarEvent) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;

        if let Some(id) = event.id {
            let changed = conn.execute(
                r#"
                UPDATE calendar_events
                SET title = ?, description = ?, start_date = ?, end_date = ?,
                    target_amount = ?, saved_amount = ?, location = ?
                WHERE id = ? AND user_id = ?
                "#,
                params![
                    event.title,
                    event.description,
                    event.start_date.to_string(),
                    event.end_date.map(|d| d.to_string()),
                    event.target_amount.to_string(),
                    event.saved_amount.to_string(),
                    event.location,
                    id,
                    user_id,
                ],
            )?;
            if changed == 0 {
                return Err(Error::NotFound(format!("Calendar event not found: {}", id)));
            }
            Ok(id)
        } else {
            conn.execute(
                r#"
                INSERT INTO calendar_events (user_id, title, description, start_date, end_date, target_amount, saved_amount, location)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    event.title,
                    event.description,
                    event.start_date.to_string(),
                    event.end_date.map(|d| d.to_string()),
                    event.target_amount.to_string(),
                    event.saved_amount.to_string(),
                    event.location,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        }
    }

    /// List a user's calendar events, earliest start first
    pub fn list_calendar_events(&self, email: &str) -> Result<Vec<CalendarEvent>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, description, start_date, end_date,
                   target_amount, saved_amount, location, created_at
            FROM calendar_events
            WHERE user_id = ?
            ORDER BY start_date ASC, id ASC
            "#,
        )?;

        let events = stmt
            .query_map(params![user_id], |row| {
                let start_date: String = row.get(4)?;
                let end_date: Option<String> = row.get(5)?;
                let target_raw: String = row.get(6)?;
                let saved_raw: String = row.get(7)?;
                let created_at: String = row.get(9)?;
                Ok(CalendarEvent {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    start_date: parse_date(&start_date),
                    end_date: end_date.as_deref().map(parse_date),
                    target_amount: decode_amount(6, &target_raw)?,
                    saved_amount: decode_amount(7, &saved_raw)?,
                    location: row.get(8)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Create a savings goal
    pub fn create_goal(&self, email: &str, goal: &NewGoal) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO goals (user_id, title, target, current, category, deadline, color, icon, description, monthly_contribution)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                goal.title,
                goal.target.to_string(),
                goal.current.to_string(),
                goal.category,
                goal.deadline.to_string(),
                goal.color,
                goal.icon,
                goal.description,
                goal.monthly_contribution.map(|m| m.to_string()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's goals, nearest deadline first
    pub fn list_goals(&self, email: &str) -> Result<Vec<Goal>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, target, current, category, deadline,
                   color, icon, description, monthly_contribution
            FROM goals
            WHERE user_id = ?
            ORDER BY deadline ASC, id ASC
            "#,
        )?;

        let goals = stmt
            .query_map(params![user_id], |row| {
                let target_raw: String = row.get(3)?;
                let current_raw: String = row.get(4)?;
                let deadline: String = row.get(6)?;
                let monthly_raw: Option<String> = row.get(10)?;
                let monthly_contribution = match monthly_raw {
                    Some(raw) => Some(decode_amount(10, &raw)?),
                    None => None,
                };
                Ok(Goal {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    target: decode_amount(3, &target_raw)?,
                    current: decode_amount(4, &current_raw)?,
                    category: row.get(5)?,
                    deadline: parse_date(&deadline),
                    color: row.get(7)?,
                    icon: row.get(8)?,
                    description: row.get(9)?,
                    monthly_contribution,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Create an achievement
    pub fn create_achievement(&self, email: &str, achievement: &NewAchievement) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO achievements (user_id, title, description, date, icon, color)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                achievement.title,
                achievement.description,
                achievement.date.to_string(),
                achievement.icon,
                achievement.color,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List a user's achievements, newest first
    pub fn list_achievements(&self, email: &str) -> Result<Vec<Achievement>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, title, description, date, icon, color
            FROM achievements
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let achievements = stmt
            .query_map(params![user_id], |row| {
                let date: String = row.get(4)?;
                Ok(Achievement {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    date: parse_date(&date),
                    icon: row.get(5)?,
                    color: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(achievements)
    }
}

/// Parse a SQLite DATE column ("YYYY-MM-DD")
fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}
