//! FinSight core library
//!
//! Domain logic for the FinSight personal finance tracker:
//! - Encrypted SQLite storage (users, transactions, moods, calendar, goals)
//! - One-time passcode issuance and verification
//! - Transaction aggregation and rule-based suggestions
//! - Spending-map location annotation
//! - OTP mail delivery

pub mod db;
pub mod error;
pub mod geo;
pub mod mail;
pub mod models;
pub mod otp;
pub mod seed;
pub mod stats;
pub mod suggestions;

pub use db::Database;
pub use error::{Error, Result};
pub use mail::{MailClient, Mailer, MockMailer};
pub use otp::OtpStore;
pub use suggestions::SuggestionEngine;
