//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod analytics;
pub mod calendar;
pub mod otp;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use analytics::*;
pub use calendar::*;
pub use otp::*;
pub use transactions::*;
pub use users::*;
