//! Habit repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, ModelTrait, Order, QueryOrder,
    Set,
};

use super::base::{ApplyChanges, BaseRepository};
use super::entities::{
    habit::{self, ActiveModel, Entity as HabitEntity},
    habit_execution,
};
use crate::domain::{Habit, HabitDetails, HabitExecution, NewHabit, UpdateHabit};
use crate::errors::{AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Habit repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HabitRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Habit>>;

    /// All habits of a user, newest first
    async fn get_habits_by_user_id(&self, user_id: i32, skip: u64, limit: u64)
        -> AppResult<Vec<Habit>>;

    /// Active habits of a user ordered by reminder time, then name
    async fn get_active_habits_by_user_id(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<Habit>>;

    async fn count_habits_by_user_id(&self, user_id: i32, active_only: bool) -> AppResult<u64>;

    /// The habit with its executions, only when owned by `user_id`
    async fn get_habit_with_details(
        &self,
        habit_id: i32,
        user_id: i32,
    ) -> AppResult<Option<HabitDetails>>;

    async fn create(&self, data: NewHabit) -> AppResult<Habit>;

    /// Apply a partial update to a loaded habit
    async fn update(&self, habit: Habit, changes: UpdateHabit) -> AppResult<Habit>;

    /// Overwrite the streak counters
    async fn set_streaks(&self, habit_id: i32, current: i32, max: i32) -> AppResult<Habit>;

    async fn delete(&self, habit: Habit) -> AppResult<()>;

    /// Delete by id, returning the deleted habit
    async fn remove(&self, id: i32) -> AppResult<Option<Habit>>;
}

impl IntoActiveModel<ActiveModel> for NewHabit {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            user_id: Set(self.user_id),
            name: Set(self.name),
            description: Set(self.description),
            frequency: Set(crate::domain::HabitFrequency::Daily.into()),
            target_days: Set(self.target_days),
            time_to_remind: Set(self.time_to_remind),
            is_active: Set(true),
            current_streak: Set(0),
            max_streak: Set(0),
            ..Default::default()
        }
    }
}

impl ApplyChanges<ActiveModel> for UpdateHabit {
    fn apply_to(self, active: &mut ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(time_to_remind) = self.time_to_remind {
            active.time_to_remind = Set(Some(time_to_remind));
        }
        if let Some(target_days) = self.target_days {
            active.target_days = Set(target_days);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
    }
}

#[derive(Debug)]
struct StreakChanges {
    current: i32,
    max: i32,
}

impl ApplyChanges<ActiveModel> for StreakChanges {
    fn apply_to(self, active: &mut ActiveModel) {
        active.current_streak = Set(self.current);
        active.max_streak = Set(self.max);
    }
}

fn owned_by(user_id: i32) -> Condition {
    Condition::all().add(habit::Column::UserId.eq(user_id))
}

/// Concrete implementation of HabitRepository
pub struct HabitStore {
    base: BaseRepository<HabitEntity, ActiveModel>,
}

impl HabitStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db, "Habit"),
        }
    }
}

#[async_trait]
impl HabitRepository for HabitStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Habit>> {
        Ok(self.base.get_by_id(id).await?.map(Habit::from))
    }

    async fn get_habits_by_user_id(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<Habit>> {
        let rows = self
            .base
            .get_multi_by(
                owned_by(user_id),
                skip,
                limit,
                &[
                    (habit::Column::CreatedAt, Order::Desc),
                    (habit::Column::Id, Order::Desc),
                ],
            )
            .await?;
        tracing::debug!(user_id, found = rows.len(), "Habits fetched for user");
        Ok(rows.into_iter().map(Habit::from).collect())
    }

    async fn get_active_habits_by_user_id(
        &self,
        user_id: i32,
        skip: u64,
        limit: u64,
    ) -> AppResult<Vec<Habit>> {
        let rows = self
            .base
            .get_multi_by(
                owned_by(user_id).add(habit::Column::IsActive.eq(true)),
                skip,
                limit,
                &[
                    (habit::Column::TimeToRemind, Order::Asc),
                    (habit::Column::Name, Order::Asc),
                ],
            )
            .await?;
        tracing::debug!(user_id, found = rows.len(), "Active habits fetched for user");
        Ok(rows.into_iter().map(Habit::from).collect())
    }

    async fn count_habits_by_user_id(&self, user_id: i32, active_only: bool) -> AppResult<u64> {
        let mut condition = owned_by(user_id);
        if active_only {
            condition = condition.add(habit::Column::IsActive.eq(true));
        }
        self.base.count_by(condition).await
    }

    async fn get_habit_with_details(
        &self,
        habit_id: i32,
        user_id: i32,
    ) -> AppResult<Option<HabitDetails>> {
        tracing::debug!(habit_id, user_id, "Fetching habit with executions");
        let Some(row) = self
            .base
            .get_first_by(owned_by(user_id).add(habit::Column::Id.eq(habit_id)))
            .await?
        else {
            return Ok(None);
        };

        let executions = row
            .find_related(habit_execution::Entity)
            .order_by_desc(habit_execution::Column::ExecutionDate)
            .all(self.base.db())
            .await?
            .into_iter()
            .map(HabitExecution::from)
            .collect();

        Ok(Some(HabitDetails {
            habit: Habit::from(row),
            executions,
        }))
    }

    async fn create(&self, data: NewHabit) -> AppResult<Habit> {
        let model = self.base.create(data).await?;
        tracing::info!(habit_id = model.id, user_id = model.user_id, "Habit created");
        Ok(Habit::from(model))
    }

    async fn update(&self, habit: Habit, changes: UpdateHabit) -> AppResult<Habit> {
        let model = self.base.update(habit::Model::from(habit), changes).await?;
        Ok(Habit::from(model))
    }

    async fn set_streaks(&self, habit_id: i32, current: i32, max: i32) -> AppResult<Habit> {
        let row = self.base.get_by_id(habit_id).await?.ok_or_not_found()?;
        let model = self.base.update(row, StreakChanges { current, max }).await?;
        Ok(Habit::from(model))
    }

    async fn delete(&self, habit: Habit) -> AppResult<()> {
        self.base.delete(habit::Model::from(habit)).await
    }

    async fn remove(&self, id: i32) -> AppResult<Option<Habit>> {
        Ok(self.base.remove(id).await?.map(Habit::from))
    }
}
