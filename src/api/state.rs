//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, ExecutionService, HabitService, ServiceContainer, Services, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub habit_service: Arc<dyn HabitService>,
    pub execution_service: Arc<dyn ExecutionService>,
    /// Database connection, used by the health check
    pub database: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let config = Arc::new(config);
        let container = Services::from_connection(database.get_connection(), (*config).clone());

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            habit_service: container.habits(),
            execution_service: container.executions(),
            database,
            config,
        }
    }
}
