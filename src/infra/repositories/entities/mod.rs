//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod habit;
pub mod habit_execution;
pub mod user;
