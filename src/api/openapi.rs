//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, execution_handler, habit_handler, user_handler};
use crate::config::API_KEY_HEADER;
use crate::domain::{
    CreateExecution, CreateHabit, CreateUser, ExecutionResponse, ExecutionStatus,
    HabitDetailsResponse, HabitFrequency, HabitResponse, UpdateExecution, UpdateHabit,
    UpdateUser, UserResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Habit Tracker API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Habit Tracker",
        version = "0.1.0",
        description = "Backend of a Telegram habit-tracking bot: users, habits and daily executions"
    ),
    paths(
        auth_handler::issue_token,
        user_handler::get_current_user,
        user_handler::update_current_user,
        habit_handler::list_habits,
        habit_handler::create_habit,
        habit_handler::get_habit,
        habit_handler::update_habit,
        habit_handler::delete_habit,
        execution_handler::list_executions,
        execution_handler::record_execution,
        execution_handler::recent_executions,
        execution_handler::update_execution,
    ),
    components(
        schemas(
            CreateUser,
            UpdateUser,
            UserResponse,
            TokenResponse,
            HabitFrequency,
            CreateHabit,
            UpdateHabit,
            HabitResponse,
            HabitDetailsResponse,
            ExecutionStatus,
            CreateExecution,
            UpdateExecution,
            ExecutionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token exchange for the Telegram bot"),
        (name = "Users", description = "Current user profile"),
        (name = "Habits", description = "Habit management"),
        (name = "Executions", description = "Daily habit records")
    )
)]
pub struct ApiDoc;

/// Bearer JWT for users, shared header key for the bot
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "bot_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}
