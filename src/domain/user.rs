//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Telegram user known to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_bot_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with: first name, then username, then the Telegram id
    pub fn display_name(&self) -> String {
        self.first_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| self.telegram_id.to_string())
    }

    /// Whether the bot can still reach this user
    pub fn is_reachable(&self) -> bool {
        self.is_active && !self.is_bot_blocked
    }
}

/// Telegram profile sent by the bot when a user starts a conversation
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Telegram user id
    #[schema(example = 123456789)]
    #[validate(range(min = 1, message = "telegram_id must be positive"))]
    pub telegram_id: i64,
    /// Telegram username (without @)
    #[schema(example = "johndoe")]
    #[validate(length(max = 100, message = "username must be at most 100 characters"))]
    pub username: Option<String>,
    #[schema(example = "John")]
    #[validate(length(max = 100, message = "first_name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[schema(example = "Doe")]
    #[validate(length(max = 100, message = "last_name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

/// Partial user update; absent fields stay untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(max = 100, message = "username must be at most 100 characters"))]
    pub username: Option<String>,
    #[validate(length(max = 100, message = "first_name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "last_name must be at most 100 characters"))]
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_bot_blocked: Option<bool>,
}

impl UpdateUser {
    /// Profile refresh built from a fresh Telegram profile
    pub fn from_profile(profile: &CreateUser) -> Self {
        Self {
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            ..Self::default()
        }
    }

    /// True when applying this update would not change `user`
    pub fn is_noop_for(&self, user: &User) -> bool {
        fn same<T: PartialEq>(new: &Option<T>, current: &T) -> bool {
            new.as_ref().map_or(true, |v| v == current)
        }
        fn same_opt<T: PartialEq>(new: &Option<T>, current: &Option<T>) -> bool {
            new.is_none() || new == current
        }

        same_opt(&self.username, &user.username)
            && same_opt(&self.first_name, &user.first_name)
            && same_opt(&self.last_name, &user.last_name)
            && same(&self.is_active, &user.is_active)
            && same(&self.is_bot_blocked, &user.is_bot_blocked)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 123456789)]
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_bot_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            telegram_id: user.telegram_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_active: user.is_active,
            is_bot_blocked: user.is_bot_blocked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
