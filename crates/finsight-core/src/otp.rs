//! One-time passcode issuance and verification
//!
//! Codes live in process memory only. A restart drops all outstanding
//! codes, which is acceptable for a login flow where the user can simply
//! request a new one.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

/// How long an issued code stays valid
pub const OTP_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct IssuedOtp {
    code: String,
    issued_at: Instant,
}

/// In-memory store of outstanding codes, keyed by email
///
/// One outstanding code per email: issuing a new code replaces any
/// previous one. Verification consumes the code whether or not it was
/// the TTL that killed it, so a code can never succeed twice.
pub struct OtpStore {
    codes: Mutex<HashMap<String, IssuedOtp>>,
    ttl: Duration,
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OtpStore {
    pub fn new() -> Self {
        Self::with_ttl(OTP_TTL)
    }

    /// Store with a custom TTL (for tests)
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a fresh six-digit code for an email, replacing any
    /// outstanding one
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{}", rand::thread_rng().gen_range(100000..=999999));
        let mut codes = self.codes.lock().unwrap_or_else(|e| e.into_inner());
        codes.insert(
            email.to_string(),
            IssuedOtp {
                code: code.clone(),
                issued_at: Instant::now(),
            },
        );
        code
    }

    /// Verify a submitted code, consuming it on success
    ///
    /// The check and removal happen under one lock so two concurrent
    /// submissions of the same code cannot both succeed.
    pub fn verify(&self, email: &str, submitted: &str) -> bool {
        let mut codes = self.codes.lock().unwrap_or_else(|e| e.into_inner());
        match codes.get(email) {
            Some(entry) if entry.issued_at.elapsed() > self.ttl => {
                // Expired codes are dead regardless of what was submitted
                codes.remove(email);
                false
            }
            Some(entry) if entry.code == submitted => {
                codes.remove(email);
                true
            }
            _ => false,
        }
    }
}
