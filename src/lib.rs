//! Habit Tracker - backend for a Telegram habit-tracking bot
//!
//! Users are identified by their Telegram id. Each user owns habits with a
//! reminder time and a target number of days, and records one execution per
//! habit per day. Running and best streaks are kept on the habit.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and the streak rule
//! - **services**: Application use cases and business logic
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{ExecutionStatus, Habit, HabitExecution, User};
pub use errors::{AppError, AppResult};
