//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, IntoActiveModel, Set};

use super::base::{ApplyChanges, BaseRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by primary key
    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by Telegram id
    async fn get_by_telegram_id(&self, telegram_id: i64) -> AppResult<Option<User>>;

    /// Find user by username; an empty username never matches
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Page of users
    async fn get_multi(&self, skip: u64, limit: u64) -> AppResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> AppResult<u64>;

    /// Insert a new user from a Telegram profile
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Apply a partial update to a loaded user
    async fn update(&self, user: User, changes: UpdateUser) -> AppResult<User>;

    /// Partial update addressed by Telegram id; `None` when no such user
    async fn update_by_telegram_id(
        &self,
        telegram_id: i64,
        changes: UpdateUser,
    ) -> AppResult<Option<User>>;

    /// Delete by id, returning the deleted user
    async fn remove(&self, id: i32) -> AppResult<Option<User>>;
}

impl IntoActiveModel<ActiveModel> for CreateUser {
    fn into_active_model(self) -> ActiveModel {
        ActiveModel {
            telegram_id: Set(self.telegram_id),
            username: Set(self.username),
            first_name: Set(self.first_name),
            last_name: Set(self.last_name),
            is_active: Set(true),
            is_bot_blocked: Set(false),
            ..Default::default()
        }
    }
}

impl ApplyChanges<ActiveModel> for UpdateUser {
    fn apply_to(self, active: &mut ActiveModel) {
        if let Some(username) = self.username {
            active.username = Set(Some(username));
        }
        if let Some(first_name) = self.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = self.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(is_bot_blocked) = self.is_bot_blocked {
            active.is_bot_blocked = Set(is_bot_blocked);
        }
    }
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    base: BaseRepository<UserEntity, ActiveModel>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db, "User"),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.base.get_by_id(id).await?.map(User::from))
    }

    async fn get_by_telegram_id(&self, telegram_id: i64) -> AppResult<Option<User>> {
        tracing::debug!(telegram_id, "Fetching user by Telegram id");
        let row = self
            .base
            .get_first_by(Condition::all().add(user::Column::TelegramId.eq(telegram_id)))
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        if username.is_empty() {
            return Ok(None);
        }
        tracing::debug!(username, "Fetching user by username");
        let row = self
            .base
            .get_first_by(Condition::all().add(user::Column::Username.eq(username)))
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_multi(&self, skip: u64, limit: u64) -> AppResult<Vec<User>> {
        let rows = self.base.get_multi(skip, limit).await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        self.base.count_by(Condition::all()).await
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let model = self.base.create(data).await?;
        tracing::info!(user_id = model.id, telegram_id = model.telegram_id, "User created");
        Ok(User::from(model))
    }

    async fn update(&self, user: User, changes: UpdateUser) -> AppResult<User> {
        let model = self.base.update(user::Model::from(user), changes).await?;
        Ok(User::from(model))
    }

    async fn update_by_telegram_id(
        &self,
        telegram_id: i64,
        changes: UpdateUser,
    ) -> AppResult<Option<User>> {
        match self.get_by_telegram_id(telegram_id).await? {
            Some(user) => Ok(Some(self.update(user, changes).await?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.base.remove(id).await?.map(User::from))
    }
}
