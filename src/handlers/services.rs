use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{Service, ServiceInput, ServicePatch},
};

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "services",
    responses((status = 200, description = "Services ordered by `order`", body = [Service]))
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    Ok(Json(state.repo.list_services().await?))
}

#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Service>> {
    state
        .repo
        .get_service(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Service", &id))
}

#[utoipa::path(
    post,
    path = "/api/services",
    tag = "services",
    request_body = ServiceInput,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<ServiceInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let service = state.repo.create_service(input).await?;
    tracing::info!(admin = %admin.id, service_id = %service.id, "service created");
    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    request_body = ServiceInput,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ServiceInput>, JsonRejection>,
) -> AppResult<Json<Service>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let service = state
        .repo
        .update_service(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("Service", &id))?;
    tracing::info!(admin = %admin.id, service_id = %id, "service updated");
    Ok(Json(service))
}

#[utoipa::path(
    patch,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    request_body = ServicePatch,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn partial_update_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ServicePatch>, JsonRejection>,
) -> AppResult<Json<Service>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let service = state
        .repo
        .update_service(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Service", &id))?;
    tracing::info!(admin = %admin.id, service_id = %id, "service patched");
    Ok(Json(service))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_service(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_service(&id).await? {
        return Err(AppError::not_found("Service", &id));
    }
    tracing::info!(admin = %admin.id, service_id = %id, "service deleted");
    Ok(StatusCode::NO_CONTENT)
}
