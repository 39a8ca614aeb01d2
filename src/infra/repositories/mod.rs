//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod base;
pub(crate) mod entities;
mod habit_execution_repository;
mod habit_repository;
mod user_repository;

pub use base::{ApplyChanges, BaseRepository};
pub use habit_execution_repository::{HabitExecutionRepository, HabitExecutionStore};
pub use habit_repository::{HabitRepository, HabitStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use habit_execution_repository::MockHabitExecutionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use habit_repository::MockHabitRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
