use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{HomeStats, HomeStatsInput, HomeStatsPatch},
};

#[utoipa::path(
    get,
    path = "/api/home-stats",
    tag = "home-stats",
    responses((status = 200, description = "Stats ordered by `order`", body = [HomeStats]))
)]
pub async fn list_home_stats(State(state): State<AppState>) -> AppResult<Json<Vec<HomeStats>>> {
    Ok(Json(state.repo.list_home_stats().await?))
}

#[utoipa::path(
    get,
    path = "/api/home-stats/{id}",
    tag = "home-stats",
    params(("id" = String, Path, description = "Stat id")),
    responses(
        (status = 200, description = "Stat", body = HomeStats),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_home_stat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<HomeStats>> {
    state
        .repo
        .get_home_stat(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("HomeStats", &id))
}

#[utoipa::path(
    post,
    path = "/api/home-stats",
    tag = "home-stats",
    request_body = HomeStatsInput,
    responses(
        (status = 201, description = "Created", body = HomeStats),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_home_stat(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<HomeStatsInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<HomeStats>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let stat = state.repo.create_home_stat(input).await?;
    tracing::info!(admin = %admin.id, stat_id = %stat.id, "home stat created");
    Ok((StatusCode::CREATED, Json(stat)))
}

#[utoipa::path(
    put,
    path = "/api/home-stats/{id}",
    tag = "home-stats",
    params(("id" = String, Path, description = "Stat id")),
    request_body = HomeStatsInput,
    responses(
        (status = 200, description = "Updated", body = HomeStats),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_home_stat(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HomeStatsInput>, JsonRejection>,
) -> AppResult<Json<HomeStats>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let stat = state
        .repo
        .update_home_stat(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("HomeStats", &id))?;
    tracing::info!(admin = %admin.id, stat_id = %id, "home stat updated");
    Ok(Json(stat))
}

#[utoipa::path(
    patch,
    path = "/api/home-stats/{id}",
    tag = "home-stats",
    params(("id" = String, Path, description = "Stat id")),
    request_body = HomeStatsPatch,
    responses(
        (status = 200, description = "Updated", body = HomeStats),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn partial_update_home_stat(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<HomeStatsPatch>, JsonRejection>,
) -> AppResult<Json<HomeStats>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let stat = state
        .repo
        .update_home_stat(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("HomeStats", &id))?;
    tracing::info!(admin = %admin.id, stat_id = %id, "home stat patched");
    Ok(Json(stat))
}

#[utoipa::path(
    delete,
    path = "/api/home-stats/{id}",
    tag = "home-stats",
    params(("id" = String, Path, description = "Stat id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_home_stat(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_home_stat(&id).await? {
        return Err(AppError::not_found("HomeStats", &id));
    }
    tracing::info!(admin = %admin.id, stat_id = %id, "home stat deleted");
    Ok(StatusCode::NO_CONTENT)
}
