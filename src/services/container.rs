//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ExecutionManager, ExecutionService, HabitManager, HabitService,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn habits(&self) -> Arc<dyn HabitService>;

    fn executions(&self) -> Arc<dyn ExecutionService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    habit_service: Arc<dyn HabitService>,
    execution_service: Arc<dyn ExecutionService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        let user_service: Arc<dyn UserService> = Arc::new(UserManager::new(uow.clone()));
        let habit_service = Arc::new(HabitManager::new(uow.clone(), config.days_to_form_habit));
        let execution_service = Arc::new(ExecutionManager::new(uow));
        let auth_service = Arc::new(Authenticator::new(user_service.clone(), config));

        Self {
            auth_service,
            user_service,
            habit_service,
            execution_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn habits(&self) -> Arc<dyn HabitService> {
        self.habit_service.clone()
    }

    fn executions(&self) -> Arc<dyn ExecutionService> {
        self.execution_service.clone()
    }
}
