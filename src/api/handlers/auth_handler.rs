//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::CreateUser;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(issue_token))
}

/// Exchange a Telegram profile for an access token.
///
/// Registers the user on first contact and refreshes the stored profile
/// afterwards. Only callable by the bot.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "Authentication",
    security(("bot_key" = [])),
    request_body = CreateUser,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Missing or invalid bot key"),
        (status = 403, description = "User is deactivated"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.auth_service.issue_token(payload).await?;
    Ok(Json(token))
}
