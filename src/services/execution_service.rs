//! Execution service - Daily habit records and streak maintenance.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::find_owned_habit;
use crate::config::{MAX_RECENT_EXECUTIONS, STREAK_LOOKBACK_DAYS};
use crate::domain::{
    current_streak, ExecutionFilter, ExecutionStatus, Habit, HabitExecution, NewExecution,
    UpdateExecution,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Execution service trait for dependency injection.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Record the habit's status for `date`, replacing an existing record for that day
    async fn record_execution(
        &self,
        user_id: i32,
        habit_id: i32,
        status: ExecutionStatus,
        date: NaiveDate,
    ) -> AppResult<HabitExecution>;

    /// Change the status of an existing execution of the habit
    async fn update_execution(
        &self,
        user_id: i32,
        habit_id: i32,
        execution_id: i32,
        changes: UpdateExecution,
    ) -> AppResult<HabitExecution>;

    /// Filtered page of executions, newest first, with the total count
    async fn list_executions(
        &self,
        user_id: i32,
        habit_id: i32,
        filter: ExecutionFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<HabitExecution>, u64)>;

    /// The `n` most recent executions
    async fn recent_executions(
        &self,
        user_id: i32,
        habit_id: i32,
        n: u64,
    ) -> AppResult<Vec<HabitExecution>>;
}

/// Concrete implementation of ExecutionService using Unit of Work.
pub struct ExecutionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ExecutionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Recompute the running streak and raise the best streak if exceeded
    async fn refresh_streak(&self, habit: &Habit) -> AppResult<()> {
        let history = self
            .uow
            .executions()
            .get_last_n_executions(habit.id, STREAK_LOOKBACK_DAYS)
            .await?;

        let current = current_streak(&history);
        let max = habit.max_streak.max(current);

        if current != habit.current_streak || max != habit.max_streak {
            tracing::debug!(habit_id = habit.id, current, max, "Streak changed");
            self.uow.habits().set_streaks(habit.id, current, max).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> ExecutionService for ExecutionManager<U> {
    async fn record_execution(
        &self,
        user_id: i32,
        habit_id: i32,
        status: ExecutionStatus,
        date: NaiveDate,
    ) -> AppResult<HabitExecution> {
        let habit = find_owned_habit(self.uow.habits().as_ref(), user_id, habit_id).await?;
        let executions = self.uow.executions();

        let execution = match executions
            .get_execution_by_habit_id_and_date(habit_id, date)
            .await?
        {
            Some(existing) => {
                executions
                    .update(existing, UpdateExecution { status })
                    .await?
            }
            None => match executions
                .create(NewExecution {
                    habit_id,
                    execution_date: date,
                    status,
                })
                .await
            {
                Ok(created) => created,
                // Recorded concurrently by another request
                Err(AppError::Conflict(_)) => {
                    let existing = executions
                        .get_execution_by_habit_id_and_date(habit_id, date)
                        .await?
                        .ok_or_not_found()?;
                    executions
                        .update(existing, UpdateExecution { status })
                        .await?
                }
                Err(e) => return Err(e),
            },
        };

        self.refresh_streak(&habit).await?;
        Ok(execution)
    }

    async fn update_execution(
        &self,
        user_id: i32,
        habit_id: i32,
        execution_id: i32,
        changes: UpdateExecution,
    ) -> AppResult<HabitExecution> {
        let habit = find_owned_habit(self.uow.habits().as_ref(), user_id, habit_id).await?;
        let executions = self.uow.executions();

        let execution = executions
            .get_by_id(execution_id)
            .await?
            .filter(|e| e.habit_id == habit_id)
            .ok_or_not_found()?;

        let updated = executions.update(execution, changes).await?;
        self.refresh_streak(&habit).await?;
        Ok(updated)
    }

    async fn list_executions(
        &self,
        user_id: i32,
        habit_id: i32,
        filter: ExecutionFilter,
        page: &PaginationParams,
    ) -> AppResult<(Vec<HabitExecution>, u64)> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(AppError::validation("start_date must not be after end_date"));
            }
        }

        find_owned_habit(self.uow.habits().as_ref(), user_id, habit_id).await?;
        let executions = self.uow.executions();
        let data = executions
            .get_executions_for_habit(habit_id, filter, page.offset(), page.limit())
            .await?;
        let total = executions.count_executions_for_habit(habit_id, filter).await?;
        Ok((data, total))
    }

    async fn recent_executions(
        &self,
        user_id: i32,
        habit_id: i32,
        n: u64,
    ) -> AppResult<Vec<HabitExecution>> {
        if n == 0 || n > MAX_RECENT_EXECUTIONS {
            return Err(AppError::validation(format!(
                "n must be between 1 and {}",
                MAX_RECENT_EXECUTIONS
            )));
        }

        find_owned_habit(self.uow.habits().as_ref(), user_id, habit_id).await?;
        self.uow.executions().get_last_n_executions(habit_id, n).await
    }
}
