//! HTTP request handlers.

pub mod auth_handler;
pub mod execution_handler;
pub mod habit_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use habit_handler::habit_routes;
pub use user_handler::user_routes;
