//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CreateUser, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Find the user by Telegram id or register it.
    ///
    /// An existing user gets its profile fields refreshed from `profile`.
    async fn register_or_get(&self, profile: CreateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Partial profile update
    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User>;

    /// Page of users with the total count
    async fn list_users(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn refresh_profile(&self, user: User, profile: &CreateUser) -> AppResult<User> {
        let changes = UpdateUser::from_profile(profile);
        if changes.is_noop_for(&user) {
            return Ok(user);
        }
        tracing::info!(user_id = user.id, "Refreshing Telegram profile");
        self.uow.users().update(user, changes).await
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register_or_get(&self, profile: CreateUser) -> AppResult<User> {
        let users = self.uow.users();

        if let Some(user) = users.get_by_telegram_id(profile.telegram_id).await? {
            return self.refresh_profile(user, &profile).await;
        }

        match users.create(profile.clone()).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, telegram_id = user.telegram_id, "User registered");
                Ok(user)
            }
            // Registered concurrently by another request
            Err(AppError::Conflict(_)) => users
                .get_by_telegram_id(profile.telegram_id)
                .await?
                .ok_or_not_found(),
            Err(e) => Err(e),
        }
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().get_by_id(id).await?.ok_or_not_found()
    }

    async fn update_user(&self, id: i32, changes: UpdateUser) -> AppResult<User> {
        let users = self.uow.users();
        let user = users.get_by_id(id).await?.ok_or_not_found()?;
        users.update(user, changes).await
    }

    async fn list_users(&self, page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let users = self.uow.users();
        let data = users.get_multi(page.offset(), page.limit()).await?;
        let total = users.count().await?;
        Ok((data, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::{sample_user, TestUnitOfWork};
    use mockall::predicate::eq;

    fn profile(telegram_id: i64) -> CreateUser {
        CreateUser {
            telegram_id,
            username: Some("johndoe".into()),
            first_name: Some("John".into()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_new_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_telegram_id()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|data| {
            let mut user = sample_user(1, data.telegram_id);
            user.username = data.username;
            Ok(user)
        });

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service.register_or_get(profile(42)).await.unwrap();

        assert_eq!(user.telegram_id, 42);
        assert_eq!(user.username.as_deref(), Some("johndoe"));
    }

    #[tokio::test]
    async fn test_register_returns_existing_without_update() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_telegram_id().returning(|tg| {
            let mut user = sample_user(5, tg);
            user.username = Some("johndoe".into());
            user.first_name = Some("John".into());
            Ok(Some(user))
        });
        repo.expect_create().never();
        repo.expect_update().never();

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service.register_or_get(profile(42)).await.unwrap();
        assert_eq!(user.id, 5);
    }

    #[tokio::test]
    async fn test_register_refreshes_changed_profile() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_telegram_id()
            .returning(|tg| Ok(Some(sample_user(5, tg))));
        repo.expect_update().times(1).returning(|mut user, changes| {
            user.username = changes.username;
            user.first_name = changes.first_name;
            Ok(user)
        });

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service.register_or_get(profile(42)).await.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("John"));
    }

    #[tokio::test]
    async fn test_register_recovers_from_concurrent_insert() {
        let mut repo = MockUserRepository::new();
        let mut calls = 0;
        repo.expect_get_by_telegram_id().times(2).returning(move |tg| {
            calls += 1;
            if calls == 1 {
                Ok(None)
            } else {
                let mut user = sample_user(9, tg);
                user.username = Some("johndoe".into());
                user.first_name = Some("John".into());
                Ok(Some(user))
            }
        });
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("User")));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let user = service.register_or_get(profile(42)).await.unwrap();
        assert_eq!(user.id, 9);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let result = service.get_user(1).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_users_returns_total() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_multi()
            .with(eq(20), eq(20))
            .returning(|_, _| Ok(vec![sample_user(21, 1)]));
        repo.expect_count().returning(|| Ok(21));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(repo)));
        let page = PaginationParams {
            page: 2,
            per_page: 20,
        };
        let (users, total) = service.list_users(&page).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(total, 21);
    }
}
