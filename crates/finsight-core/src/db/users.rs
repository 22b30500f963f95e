//! User profile, activity marker, and mood log operations

use rusqlite::{params, OptionalExtension};

use super::{decode_amount, parse_datetime, Database};
use crate::error::{Error, Result};
#[cfg(test)]
use crate::models::MoodEntry;
use crate::models::{ActiveMarker, NewUserProfile, UserProfile, UserProfileUpdate};

impl Database {
    /// Create a user profile
    ///
    /// Fails with `InvalidInput` if the email is already registered.
    pub fn create_user(&self, user: &NewUserProfile) -> Result<i64> {
        let conn = self.conn()?;

        let result = conn.execute(
            r#"
            INSERT INTO users (name, phone_number, email, occupation, income, financial_goal, risk, location)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user.name,
                user.phone_number,
                user.email,
                user.occupation,
                user.income.to_string(),
                user.financial_goal,
                user.risk,
                user.location,
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::InvalidInput(format!(
                    "Email already registered: {}",
                    user.email
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<UserProfile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone_number, email, occupation, income, financial_goal, risk, location, created_at
             FROM users WHERE id = ?",
        )?;

        let user = stmt.query_row(params![id], Self::map_user_row).optional()?;
        Ok(user)
    }

    /// Get a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone_number, email, occupation, income, financial_goal, risk, location, created_at
             FROM users WHERE email = ?",
        )?;

        let user = stmt
            .query_row(params![email], Self::map_user_row)
            .optional()?;
        Ok(user)
    }

    /// Resolve an email to a user ID, or fail with NotFound
    pub fn require_user_id(&self, email: &str) -> Result<i64> {
        let conn = self.conn()?;
        let id: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;
        id.ok_or_else(|| Error::NotFound(format!("User not found: {}", email)))
    }

    /// Apply a partial update to a user by ID
    ///
    /// Returns the number of rows changed (0 when the id does not exist).
    pub fn update_user(&self, id: i64, update: &UserProfileUpdate) -> Result<usize> {
        if update.is_empty() {
            return Err(Error::InvalidInput("No fields to update".to_string()));
        }
        let conn = self.conn()?;

        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = update.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(ref phone) = update.phone_number {
            sets.push("phone_number = ?");
            values.push(Box::new(phone.clone()));
        }
        if let Some(ref occupation) = update.occupation {
            sets.push("occupation = ?");
            values.push(Box::new(occupation.clone()));
        }
        if let Some(income) = update.income {
            sets.push("income = ?");
            values.push(Box::new(income.to_string()));
        }
        if let Some(ref goal) = update.financial_goal {
            sets.push("financial_goal = ?");
            values.push(Box::new(goal.clone()));
        }
        if let Some(ref risk) = update.risk {
            sets.push("risk = ?");
            values.push(Box::new(risk.clone()));
        }
        if let Some(ref location) = update.location {
            sets.push("location = ?");
            values.push(Box::new(location.clone()));
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?", sets.join(", "));
        values.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        Ok(changed)
    }

    /// Apply a partial update to a user addressed by email
    pub fn update_user_by_email(&self, email: &str, update: &UserProfileUpdate) -> Result<usize> {
        let id = self.require_user_id(email)?;
        self.update_user(id, update)
    }

    /// Record an activity marker for a user
    pub fn mark_active(&self, email: &str) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO active_markers (user_id) VALUES (?)",
            params![user_id],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get the most recently recorded activity marker, if any
    pub fn last_active_user(&self) -> Result<Option<ActiveMarker>> {
        let conn = self.conn()?;
        let marker = conn
            .query_row(
                r#"
                SELECT a.id, a.user_id, u.email, a.created_at
                FROM active_markers a
                JOIN users u ON u.id = a.user_id
                ORDER BY a.id DESC
                LIMIT 1
                "#,
                [],
                |row| {
                    let created_at: String = row.get(3)?;
                    Ok(ActiveMarker {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        email: row.get(2)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;
        Ok(marker)
    }

    /// Record a mood entry for a user
    pub fn add_mood(&self, email: &str, mood: &str) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO mood_entries (user_id, mood) VALUES (?, ?)",
            params![user_id, mood],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List mood entries recorded in the last `days` days for a user
    #[cfg(test)]
    pub(crate) fn recent_moods(&self, user_id: i64, days: i64) -> Result<Vec<MoodEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, mood, created_at
            FROM mood_entries
            WHERE user_id = ?
              AND created_at >= datetime('now', ?)
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let modifier = format!("-{} days", days);
        let entries = stmt
            .query_map(params![user_id, modifier], |row| {
                let created_at: String = row.get(3)?;
                Ok(MoodEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    mood: row.get(2)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Helper to convert a row to UserProfile
    /// Column order: id, name, phone_number, email, occupation, income,
    ///               financial_goal, risk, location, created_at
    fn map_user_row(row: &rusqlite::Row) -> rusqlite::Result<UserProfile> {
        let income_raw: String = row.get(5)?;
        let created_at: String = row.get(9)?;
        Ok(UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            phone_number: row.get(2)?,
            email: row.get(3)?,
            occupation: row.get(4)?,
            income: decode_amount(5, &income_raw)?,
            financial_goal: row.get(6)?,
            risk: row.get(7)?,
            location: row.get(8)?,
            created_at: parse_datetime(&created_at),
        })
    }
}
