//! Authentication service - Bot key check and JWT issuing.
//!
//! The Telegram bot authenticates with a shared key and exchanges a user's
//! Telegram profile for a bearer token scoped to that user.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::UserService;
use crate::config::{Config, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER};
use crate::domain::{CreateUser, User, UserResponse};
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Internal user id
    pub sub: i32,
    pub telegram_id: i64,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 1800)]
    pub expires_in: i64,
    /// The user the token was issued for
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Reject anything but the configured bot shared key
    fn verify_bot_key(&self, presented: &str) -> AppResult<()>;

    /// Register or refresh the Telegram user and issue a token for it
    async fn issue_token(&self, profile: CreateUser) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
    let now = Utc::now();
    let expires_at = now + Duration::minutes(config.jwt_expire_minutes);

    let claims = Claims {
        sub: user.id,
        telegram_id: user.telegram_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok((token, config.jwt_expire_minutes * SECONDS_PER_MINUTE))
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserService>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserService>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    fn verify_bot_key(&self, presented: &str) -> AppResult<()> {
        if self.config.is_valid_bot_key(presented) {
            Ok(())
        } else {
            tracing::warn!("Rejected request with invalid bot key");
            Err(AppError::Unauthorized)
        }
    }

    async fn issue_token(&self, profile: CreateUser) -> AppResult<TokenResponse> {
        let user = self.users.register_or_get(profile).await?;
        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        let (access_token, expires_in) = generate_token(&user, &self.config)?;
        tracing::info!(user_id = user.id, "Access token issued");

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            user: user.into(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::sample_user;
    use crate::types::PaginationParams;
    use crate::domain::UpdateUser;

    struct FixedUsers {
        active: bool,
    }

    #[async_trait]
    impl UserService for FixedUsers {
        async fn register_or_get(&self, profile: CreateUser) -> AppResult<User> {
            let mut user = sample_user(7, profile.telegram_id);
            user.is_active = self.active;
            Ok(user)
        }
        async fn get_user(&self, id: i32) -> AppResult<User> {
            Ok(sample_user(id, 1))
        }
        async fn update_user(&self, id: i32, _changes: UpdateUser) -> AppResult<User> {
            Ok(sample_user(id, 1))
        }
        async fn list_users(&self, _page: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
            Ok((vec![], 0))
        }
    }

    fn authenticator(active: bool) -> Authenticator {
        Authenticator::new(
            Arc::new(FixedUsers { active }),
            Config::for_database("sqlite::memory:"),
        )
    }

    fn profile() -> CreateUser {
        CreateUser {
            telegram_id: 555,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_issued_token_verifies() {
        let auth = authenticator(true);
        let token = auth.issue_token(profile()).await.unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 30 * 60);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.telegram_id, 555);
    }

    #[tokio::test]
    async fn test_inactive_user_gets_no_token() {
        let auth = authenticator(false);
        let result = auth.issue_token(profile()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_bot_key() {
        let auth = authenticator(true);
        assert!(auth.verify_bot_key("test-bot-key").is_ok());
        assert!(matches!(auth.verify_bot_key("nope"), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let auth = authenticator(true);
        assert!(matches!(auth.verify_token("not.a.jwt"), Err(AppError::Jwt(_))));
    }
}
