//! Infrastructure layer - External systems integration
//!
//! Database connection, migrations, SeaORM entities and the repositories
//! built on top of them.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    HabitExecutionRepository, HabitExecutionStore, HabitRepository, HabitStore, UserRepository,
    UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockHabitExecutionRepository, MockHabitRepository, MockUserRepository};
