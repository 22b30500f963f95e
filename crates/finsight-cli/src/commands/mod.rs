//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `seed` - Sample data seeding command
//! - `serve` - Web server command
//! - `status` - Database status command

pub mod core;
pub mod seed;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use core::*;
pub use seed::*;
pub use serve::*;
pub use status::*;
