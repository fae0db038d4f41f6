//! Scheduled cleanup of a user's posts, batched to stay inside the
//! platform's rate limits.
//!
//! Each invocation is one short-lived pass: select an action from the mode
//! and calendar, retrieve post IDs into the pending queue and/or delete a
//! daily budget of them, persist the state files, exit with a code the
//! external scheduler can branch on.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod schedule;
pub mod state;

pub use error::{MoltError, Result};
