//! Habit handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::execution_handler;
use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CreateHabit, HabitDetailsResponse, HabitResponse, UpdateHabit};
use crate::errors::AppResult;
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Query for listing habits
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HabitListQuery {
    /// Only active habits, ordered by reminder time
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Create habit routes, executions included
pub fn habit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_habits).post(create_habit))
        .route(
            "/:id",
            get(get_habit).patch(update_habit).delete(delete_habit),
        )
        .merge(execution_handler::execution_routes())
}

/// List the current user's habits
#[utoipa::path(
    get,
    path = "/habits",
    tag = "Habits",
    security(("bearer_auth" = [])),
    params(HabitListQuery),
    responses(
        (status = 200, description = "Page of habits", body = [HabitResponse]),
        (status = 400, description = "Malformed query string"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_habits(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<HabitListQuery>,
) -> AppResult<Json<Paginated<HabitResponse>>> {
    let page = PaginationParams::new(query.page, query.per_page);
    let (habits, total) = state
        .habit_service
        .list_habits(current_user.id, query.active_only, &page)
        .await?;

    Ok(Json(
        Paginated::new(habits, &page, total).map(HabitResponse::from),
    ))
}

/// Create a habit
#[utoipa::path(
    post,
    path = "/habits",
    tag = "Habits",
    security(("bearer_auth" = [])),
    request_body = CreateHabit,
    responses(
        (status = 201, description = "Habit created", body = HabitResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_habit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateHabit>,
) -> AppResult<Created<HabitResponse>> {
    let habit = state
        .habit_service
        .create_habit(current_user.id, payload)
        .await?;
    Ok(Created(habit.into()))
}

/// Get a habit with its executions
#[utoipa::path(
    get,
    path = "/habits/{id}",
    tag = "Habits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    responses(
        (status = 200, description = "Habit with executions", body = HabitDetailsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found")
    )
)]
pub async fn get_habit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<HabitDetailsResponse>> {
    let details = state
        .habit_service
        .get_habit_details(current_user.id, id)
        .await?;
    Ok(Json(details.into()))
}

/// Partially update a habit
#[utoipa::path(
    patch,
    path = "/habits/{id}",
    tag = "Habits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    request_body = UpdateHabit,
    responses(
        (status = 200, description = "Habit updated", body = HabitResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_habit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateHabit>,
) -> AppResult<Json<HabitResponse>> {
    let habit = state
        .habit_service
        .update_habit(current_user.id, id, payload)
        .await?;
    Ok(Json(habit.into()))
}

/// Delete a habit and its executions
#[utoipa::path(
    delete,
    path = "/habits/{id}",
    tag = "Habits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    responses(
        (status = 204, description = "Habit deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Habit not found")
    )
)]
pub async fn delete_habit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<NoContent> {
    state
        .habit_service
        .delete_habit(current_user.id, id)
        .await?;
    Ok(NoContent)
}
