use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{ContactInfo, ContactInfoInput, ContactInfoPatch},
};

/// list_contact_info
///
/// [Public Route] Usually a single record. Clients use the first entry.
#[utoipa::path(
    get,
    path = "/api/contact-info",
    tag = "contact-info",
    responses((status = 200, description = "Contact records", body = [ContactInfo]))
)]
pub async fn list_contact_info(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ContactInfo>>> {
    Ok(Json(state.repo.list_contact_info().await?))
}

#[utoipa::path(
    get,
    path = "/api/contact-info/{id}",
    tag = "contact-info",
    params(("id" = String, Path, description = "Contact record id")),
    responses(
        (status = 200, description = "Contact record", body = ContactInfo),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_contact_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContactInfo>> {
    state
        .repo
        .get_contact_info(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("ContactInfo", &id))
}

#[utoipa::path(
    post,
    path = "/api/contact-info",
    tag = "contact-info",
    request_body = ContactInfoInput,
    responses(
        (status = 201, description = "Created", body = ContactInfo),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_contact_info(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<ContactInfoInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContactInfo>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let info = state.repo.create_contact_info(input).await?;
    tracing::info!(admin = %admin.id, contact_id = %info.id, "contact info created");
    Ok((StatusCode::CREATED, Json(info)))
}

#[utoipa::path(
    put,
    path = "/api/contact-info/{id}",
    tag = "contact-info",
    params(("id" = String, Path, description = "Contact record id")),
    request_body = ContactInfoInput,
    responses(
        (status = 200, description = "Updated", body = ContactInfo),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_contact_info(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInfoInput>, JsonRejection>,
) -> AppResult<Json<ContactInfo>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let info = state
        .repo
        .update_contact_info(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("ContactInfo", &id))?;
    tracing::info!(admin = %admin.id, contact_id = %id, "contact info updated");
    Ok(Json(info))
}

#[utoipa::path(
    patch,
    path = "/api/contact-info/{id}",
    tag = "contact-info",
    params(("id" = String, Path, description = "Contact record id")),
    request_body = ContactInfoPatch,
    responses(
        (status = 200, description = "Updated", body = ContactInfo),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn partial_update_contact_info(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContactInfoPatch>, JsonRejection>,
) -> AppResult<Json<ContactInfo>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let info = state
        .repo
        .update_contact_info(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("ContactInfo", &id))?;
    tracing::info!(admin = %admin.id, contact_id = %id, "contact info patched");
    Ok(Json(info))
}

#[utoipa::path(
    delete,
    path = "/api/contact-info/{id}",
    tag = "contact-info",
    params(("id" = String, Path, description = "Contact record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_contact_info(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_contact_info(&id).await? {
        return Err(AppError::not_found("ContactInfo", &id));
    }
    tracing::info!(admin = %admin.id, contact_id = %id, "contact info deleted");
    Ok(StatusCode::NO_CONTENT)
}
