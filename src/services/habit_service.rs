//! Habit service - Habit lifecycle for the owning user.
//!
//! Habits owned by another user are reported as not found.

use async_trait::async_trait;
use std::sync::Arc;

use super::find_owned_habit;
use crate::domain::{CreateHabit, Habit, HabitDetails, NewHabit, UpdateHabit};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Habit service trait for dependency injection.
#[async_trait]
pub trait HabitService: Send + Sync {
    /// Create a habit; `target_days` defaults to the configured value
    async fn create_habit(&self, user_id: i32, data: CreateHabit) -> AppResult<Habit>;

    /// Page of the user's habits with the total count.
    ///
    /// `active_only` lists active habits by reminder time, otherwise all
    /// habits newest first.
    async fn list_habits(
        &self,
        user_id: i32,
        active_only: bool,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Habit>, u64)>;

    async fn get_habit(&self, user_id: i32, habit_id: i32) -> AppResult<Habit>;

    /// Habit with its executions
    async fn get_habit_details(&self, user_id: i32, habit_id: i32) -> AppResult<HabitDetails>;

    async fn update_habit(
        &self,
        user_id: i32,
        habit_id: i32,
        changes: UpdateHabit,
    ) -> AppResult<Habit>;

    /// Delete the habit and, by cascade, its executions
    async fn delete_habit(&self, user_id: i32, habit_id: i32) -> AppResult<()>;
}

/// Concrete implementation of HabitService using Unit of Work.
pub struct HabitManager<U: UnitOfWork> {
    uow: Arc<U>,
    default_target_days: i32,
}

impl<U: UnitOfWork> HabitManager<U> {
    pub fn new(uow: Arc<U>, default_target_days: i32) -> Self {
        Self {
            uow,
            default_target_days,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> HabitService for HabitManager<U> {
    async fn create_habit(&self, user_id: i32, data: CreateHabit) -> AppResult<Habit> {
        let new = NewHabit::from_request(user_id, data, self.default_target_days);
        self.uow.habits().create(new).await
    }

    async fn list_habits(
        &self,
        user_id: i32,
        active_only: bool,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Habit>, u64)> {
        let habits = self.uow.habits();
        let data = if active_only {
            habits
                .get_active_habits_by_user_id(user_id, page.offset(), page.limit())
                .await?
        } else {
            habits
                .get_habits_by_user_id(user_id, page.offset(), page.limit())
                .await?
        };
        let total = habits.count_habits_by_user_id(user_id, active_only).await?;
        Ok((data, total))
    }

    async fn get_habit(&self, user_id: i32, habit_id: i32) -> AppResult<Habit> {
        find_owned_habit(self.uow.habits().as_ref(), user_id, habit_id).await
    }

    async fn get_habit_details(&self, user_id: i32, habit_id: i32) -> AppResult<HabitDetails> {
        self.uow
            .habits()
            .get_habit_with_details(habit_id, user_id)
            .await?
            .ok_or_not_found()
    }

    async fn update_habit(
        &self,
        user_id: i32,
        habit_id: i32,
        changes: UpdateHabit,
    ) -> AppResult<Habit> {
        let habits = self.uow.habits();
        let habit = find_owned_habit(habits.as_ref(), user_id, habit_id).await?;
        habits.update(habit, changes).await
    }

    async fn delete_habit(&self, user_id: i32, habit_id: i32) -> AppResult<()> {
        let habits = self.uow.habits();
        let habit = find_owned_habit(habits.as_ref(), user_id, habit_id).await?;
        habits.delete(habit).await?;
        tracing::info!(habit_id, user_id, "Habit deleted");
        Ok(())
    }
}
