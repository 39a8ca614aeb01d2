//! API middleware.

mod auth;

pub use auth::{auth_middleware, bot_key_middleware, CurrentUser};
