//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories so services depend on a single
//! abstraction instead of individual stores.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::repositories::{
    HabitExecutionRepository, HabitExecutionStore, HabitRepository, HabitStore, UserRepository,
    UserStore,
};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get habit repository
    fn habits(&self) -> Arc<dyn HabitRepository>;

    /// Get habit execution repository
    fn executions(&self) -> Arc<dyn HabitExecutionRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    habit_repo: Arc<HabitStore>,
    execution_repo: Arc<HabitExecutionStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            habit_repo: Arc::new(HabitStore::new(db.clone())),
            execution_repo: Arc::new(HabitExecutionStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn habits(&self) -> Arc<dyn HabitRepository> {
        self.habit_repo.clone()
    }

    fn executions(&self) -> Arc<dyn HabitExecutionRepository> {
        self.execution_repo.clone()
    }
}
