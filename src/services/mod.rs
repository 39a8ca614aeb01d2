//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod auth_service;
pub mod container;
mod execution_service;
mod habit_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use execution_service::{ExecutionManager, ExecutionService};
pub use habit_service::{HabitManager, HabitService};
pub use user_service::{UserManager, UserService};

use crate::domain::Habit;
use crate::errors::{AppError, AppResult};
use crate::infra::HabitRepository;

/// Load a habit on behalf of `user_id`; other users' habits are not found
pub(crate) async fn find_owned_habit(
    habits: &dyn HabitRepository,
    user_id: i32,
    habit_id: i32,
) -> AppResult<Habit> {
    match habits.get_by_id(habit_id).await? {
        Some(habit) if habit.is_owned_by(user_id) => Ok(habit),
        Some(_) => {
            tracing::warn!(habit_id, user_id, "Access to foreign habit");
            Err(AppError::NotFound)
        }
        None => Err(AppError::NotFound),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveTime, Utc};
    use std::sync::Arc;

    use crate::domain::{ExecutionStatus, Habit, HabitExecution, HabitFrequency, User};
    use crate::infra::{
        HabitExecutionRepository, HabitRepository, MockHabitExecutionRepository,
        MockHabitRepository, MockUserRepository, UnitOfWork, UserRepository,
    };

    /// Unit of Work over mock repositories
    pub struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
        habits: Arc<MockHabitRepository>,
        executions: Arc<MockHabitExecutionRepository>,
    }

    impl TestUnitOfWork {
        pub fn new(
            users: MockUserRepository,
            habits: MockHabitRepository,
            executions: MockHabitExecutionRepository,
        ) -> Self {
            Self {
                users: Arc::new(users),
                habits: Arc::new(habits),
                executions: Arc::new(executions),
            }
        }

        pub fn with_users(users: MockUserRepository) -> Self {
            Self::new(users, Default::default(), Default::default())
        }

        pub fn with_habits(habits: MockHabitRepository) -> Self {
            Self::new(Default::default(), habits, Default::default())
        }
    }

    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn habits(&self) -> Arc<dyn HabitRepository> {
            self.habits.clone()
        }

        fn executions(&self) -> Arc<dyn HabitExecutionRepository> {
            self.executions.clone()
        }
    }

    pub fn sample_user(id: i32, telegram_id: i64) -> User {
        let now = Utc::now();
        User {
            id,
            telegram_id,
            username: None,
            first_name: None,
            last_name: None,
            is_active: true,
            is_bot_blocked: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sample_habit(id: i32, user_id: i32) -> Habit {
        let now = Utc::now();
        Habit {
            id,
            user_id,
            name: "Read".to_string(),
            description: None,
            frequency: HabitFrequency::Daily,
            target_days: 21,
            time_to_remind: NaiveTime::from_hms_opt(21, 0, 0),
            is_active: true,
            current_streak: 0,
            max_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sample_execution(
        id: i32,
        habit_id: i32,
        execution_date: NaiveDate,
        status: ExecutionStatus,
    ) -> HabitExecution {
        let now = Utc::now();
        HabitExecution {
            id,
            habit_id,
            execution_date,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}
