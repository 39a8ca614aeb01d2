//! Habit execution repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, Order, Set};

use super::base::{ApplyChanges, BaseRepository};
use super::entities::habit_execution::{self, ActiveModel, Entity as HabitExecutionEntity};
use crate::domain::{ExecutionFilter, HabitExecution, NewExecution, UpdateExecution};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Habit execution repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HabitExecutionRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<HabitExecution>>;

    /// The record of a habit on a given day
    async fn get_execution_by_habit_id_and_date(
        &self,
        habit_id: i32,
        execution_date: NaiveDate,
    ) -> AppResult<Option<HabitExecution>>;

    /// Filtered executions of a habit, newest date first
    async fn get_executions_for_habit(
        &self,
        habit_id: i32,
        filter: ExecutionFilter,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<HabitExecution>>;

    async fn count_executions_for_habit(
        &self,
        habit_id: i32,
        filter: ExecutionFilter,
    ) -> AppResult<u64>;

    /// The `n` most recent executions by date
    async fn get_last_n_executions(&self, habit_id: i32, n: u64)
        -> AppResult<Vec<HabitExecution>>;

    async fn create(&self, data: NewExecution) -> AppResult<HabitExecution>;

    async fn update(
        &self,
        execution: HabitExecution,
        changes: UpdateExecution,
    ) -> AppResult<HabitExecution>;

    /// Delete by id, returning the deleted execution
    async fn remove(&self, id: i32) -> AppResult<Option<HabitExecution>>;
}

impl IntoActiveModel<ActiveModel> for NewExecution {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            habit_id: Set(self.habit_id),
            execution_date: Set(self.execution_date),
            status: Set(self.status.into()),
            ..Default::default()
        }
    }
}

impl ApplyChanges<ActiveModel> for UpdateExecution {
    fn apply_to(self, active: &mut ActiveModel) {
        active.status = Set(self.status.into());
    }
}

fn filter_condition(habit_id: i32, filter: &ExecutionFilter) -> Condition {
    let mut condition = Condition::all().add(habit_execution::Column::HabitId.eq(habit_id));
    if let Some(status) = filter.status {
        condition = condition.add(habit_execution::Column::Status.eq(status.as_str()));
    }
    if let Some(start) = filter.start_date {
        condition = condition.add(habit_execution::Column::ExecutionDate.gte(start));
    }
    if let Some(end) = filter.end_date {
        condition = condition.add(habit_execution::Column::ExecutionDate.lte(end));
    }
    condition
}

fn newest_first() -> [(habit_execution::Column, Order); 2] {
    [
        (habit_execution::Column::ExecutionDate, Order::Desc),
        (habit_execution::Column::Id, Order::Desc),
    ]
}

/// Concrete implementation of HabitExecutionRepository
pub struct HabitExecutionStore {
    base: BaseRepository<HabitExecutionEntity, ActiveModel>,
}

impl HabitExecutionStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db, "Execution"),
        }
    }
}

#[async_trait]
impl HabitExecutionRepository for HabitExecutionStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<HabitExecution>> {
        Ok(self.base.get_by_id(id).await?.map(HabitExecution::from))
    }

    async fn get_execution_by_habit_id_and_date(
        &self,
        habit_id: i32,
        execution_date: NaiveDate,
    ) -> AppResult<Option<HabitExecution>> {
        tracing::debug!(habit_id, %execution_date, "Fetching execution for day");
        let row = self
            .base
            .get_first_by(
                Condition::all()
                    .add(habit_execution::Column::HabitId.eq(habit_id))
                    .add(habit_execution::Column::ExecutionDate.eq(execution_date)),
            )
            .await?;
        Ok(row.map(HabitExecution::from))
    }

    async fn get_executions_for_habit(
        &self,
        habit_id: i32,
        filter: ExecutionFilter,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<HabitExecution>> {
        tracing::debug!(habit_id, ?filter, skip, limit, "Fetching executions for habit");
        let rows = self
            .base
            .get_multi_by(filter_condition(habit_id, &filter), skip, limit, &newest_first())
            .await?;
        Ok(rows.into_iter().map(HabitExecution::from).collect())
    }

    async fn count_executions_for_habit(
        &self,
        habit_id: i32,
        filter: ExecutionFilter,
    ) -> AppResult<u64> {
        self.base.count_by(filter_condition(habit_id, &filter)).await
    }

    async fn get_last_n_executions(
        &self,
        habit_id: i32,
        n: u64,
    ) -> AppResult<Vec<HabitExecution>> {
        let rows = self
            .base
            .get_multi_by(
                Condition::all().add(habit_execution::Column::HabitId.eq(habit_id)),
                0,
                n,
                &newest_first(),
            )
            .await?;
        tracing::debug!(habit_id, requested = n, found = rows.len(), "Last executions fetched");
        Ok(rows.into_iter().map(HabitExecution::from).collect())
    }

    async fn create(&self, data: NewExecution) -> AppResult<HabitExecution> {
        let model = self.base.create(data).await?;
        tracing::info!(
            execution_id = model.id,
            habit_id = model.habit_id,
            status = %model.status,
            "Execution recorded"
        );
        Ok(HabitExecution::from(model))
    }

    async fn update(
        &self,
        execution: HabitExecution,
        changes: UpdateExecution,
    ) -> AppResult<HabitExecution> {
        let model = self
            .base
            .update(habit_execution::Model::from(execution), changes)
            .await?;
        Ok(HabitExecution::from(model))
    }

    async fn remove(&self, id: i32) -> AppResult<Option<HabitExecution>> {
        Ok(self.base.remove(id).await?.map(HabitExecution::from))
    }
}
