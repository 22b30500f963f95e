//! Transaction operations

#[cfg(test)]
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{decode_amount, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionUpdate};

const TRANSACTION_COLUMNS: &str = "t.id, t.user_id, u.email, t.amount, t.description, \
     t.category, t.mood, t.location, t.transaction_date, t.transaction_type";

impl Database {
    /// Insert a transaction for the user addressed by email
    pub fn insert_transaction(&self, email: &str, tx: &NewTransaction) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, description, category, mood, location, transaction_type)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.amount.to_string(),
                tx.description,
                tx.category,
                tx.mood,
                tx.location,
                tx.transaction_type.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Insert a transaction with an explicit date (backdated test fixtures)
    #[cfg(test)]
    pub(crate) fn insert_transaction_dated(
        &self,
        email: &str,
        tx: &NewTransaction,
        date: DateTime<Utc>,
    ) -> Result<i64> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, amount, description, category, mood, location, transaction_date, transaction_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.amount.to_string(),
                tx.description,
                tx.category,
                tx.mood,
                tx.location,
                date.format("%Y-%m-%d %H:%M:%S").to_string(),
                tx.transaction_type.as_str(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List a user's transactions, newest first
    pub fn list_user_transactions(&self, email: &str) -> Result<Vec<Transaction>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = ?
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id], Self::map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// List all transactions across users, newest first
    pub fn list_all_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map([], Self::map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions t JOIN users u ON u.id = t.user_id WHERE t.id = ?",
            TRANSACTION_COLUMNS
        ))?;

        let transaction = stmt
            .query_row(params![id], Self::map_transaction_row)
            .optional()?;

        Ok(transaction)
    }

    /// Apply a partial update to a transaction
    ///
    /// Returns the number of rows changed (0 when the id does not exist).
    pub fn update_transaction(&self, id: i64, update: &TransactionUpdate) -> Result<usize> {
        let conn = self.conn()?;

        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(amount) = update.amount {
            sets.push("amount = ?");
            values.push(Box::new(amount.to_string()));
        }
        if let Some(ref description) = update.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(ref category) = update.category {
            sets.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(ref mood) = update.mood {
            sets.push("mood = ?");
            values.push(Box::new(mood.clone()));
        }
        if let Some(ref location) = update.location {
            sets.push("location = ?");
            values.push(Box::new(location.clone()));
        }
        if let Some(tx_type) = update.transaction_type {
            sets.push("transaction_type = ?");
            values.push(Box::new(tx_type.as_str().to_string()));
        }

        if sets.is_empty() {
            return Err(Error::InvalidInput("No fields to update".to_string()));
        }

        let sql = format!("UPDATE transactions SET {} WHERE id = ?", sets.join(", "));
        values.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        Ok(changed)
    }

    /// Delete a transaction; returns the number of rows removed
    pub fn delete_transaction(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(deleted)
    }

    /// Most recent transactions for a user, capped at `limit`
    pub fn recent_transactions(&self, email: &str, limit: i64) -> Result<Vec<Transaction>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = ?
            ORDER BY t.transaction_date DESC, t.id DESC
            LIMIT ?
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, limit], Self::map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// A user's transactions in a given category (exact match, case-insensitive)
    pub fn transactions_by_category(&self, email: &str, category: &str) -> Result<Vec<Transaction>> {
        let user_id = self.require_user_id(email)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = ? AND t.category = ? COLLATE NOCASE
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, category], Self::map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// A user's transactions from the last `days` days, newest first
    pub fn transactions_since(&self, user_id: i64, days: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = ?
              AND t.transaction_date >= datetime('now', ?)
            ORDER BY t.transaction_date DESC, t.id DESC
            "#,
            TRANSACTION_COLUMNS
        ))?;

        let modifier = format!("-{} days", days);
        let transactions = stmt
            .query_map(params![user_id, modifier], Self::map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count transactions across all users
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Count users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Helper to convert a row to Transaction
    /// Column order: id, user_id, email, amount, description, category, mood,
    ///               location, transaction_date, transaction_type
    pub(crate) fn map_transaction_row(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let amount_raw: String = row.get(3)?;
        let date_str: String = row.get(8)?;
        let type_str: String = row.get(9)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            user_email: row.get(2)?,
            amount: decode_amount(3, &amount_raw)?,
            description: row.get(4)?,
            category: row.get(5)?,
            mood: row.get(6)?,
            location: row.get(7)?,
            transaction_date: parse_datetime(&date_str),
            transaction_type: type_str.parse().unwrap_or_default(),
        })
    }
}
