use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::{QueryPairs, last_value};
use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{
        ContentFilter, ContentSectionInput, ContentSectionPatch, ContentSectionResponse, Section,
    },
};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentQuery {
    /// Exact section match: `hero`, `mission`, `about` or `contact`.
    pub section: Option<String>,
}

impl ContentQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            section: last_value(pairs, "section"),
        }
    }

    /// `None` when the requested section does not exist, in which case
    /// nothing can match.
    pub fn filter(&self) -> Option<ContentFilter> {
        match self.section.as_deref().filter(|s| !s.is_empty()) {
            None => Some(ContentFilter::default()),
            Some(raw) => raw.parse::<Section>().ok().map(|section| ContentFilter {
                section: Some(section),
            }),
        }
    }
}

/// list_content_sections
///
/// [Public Route] Lists page-section texts, optionally for one section only.
#[utoipa::path(
    get,
    path = "/api/content",
    tag = "content",
    params(ContentQuery),
    responses((status = 200, description = "Content sections", body = [ContentSectionResponse]))
)]
pub async fn list_content_sections(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<Json<Vec<ContentSectionResponse>>> {
    let Some(filter) = ContentQuery::from_pairs(&pairs).filter() else {
        return Ok(Json(Vec::new()));
    };
    let sections = state.repo.list_content_sections(filter).await?;
    let storage = state.storage.as_ref();
    Ok(Json(sections.into_iter().map(|c| c.present(storage)).collect()))
}

#[utoipa::path(
    get,
    path = "/api/content/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Content section id")),
    responses(
        (status = 200, description = "Content section", body = ContentSectionResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_content_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ContentSectionResponse>> {
    let section = state
        .repo
        .get_content_section(&id)
        .await?
        .ok_or_else(|| AppError::not_found("ContentSection", &id))?;
    Ok(Json(section.present(state.storage.as_ref())))
}

/// create_content_section
///
/// [Admin Route] A second record for an already-used section is rejected
/// with 409 by stores that keep sections unique.
#[utoipa::path(
    post,
    path = "/api/content",
    tag = "content",
    request_body = ContentSectionInput,
    responses(
        (status = 201, description = "Created", body = ContentSectionResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff"),
        (status = 409, description = "Section already exists")
    )
)]
pub async fn create_content_section(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<ContentSectionInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContentSectionResponse>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let section = state.repo.create_content_section(input).await?;
    tracing::info!(
        admin = %admin.id,
        content_id = %section.id,
        section = %section.section,
        "content section created"
    );
    Ok((
        StatusCode::CREATED,
        Json(section.present(state.storage.as_ref())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/content/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Content section id")),
    request_body = ContentSectionInput,
    responses(
        (status = 200, description = "Updated", body = ContentSectionResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Section already exists")
    )
)]
pub async fn update_content_section(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContentSectionInput>, JsonRejection>,
) -> AppResult<Json<ContentSectionResponse>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let section = state
        .repo
        .update_content_section(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("ContentSection", &id))?;
    tracing::info!(admin = %admin.id, content_id = %id, "content section updated");
    Ok(Json(section.present(state.storage.as_ref())))
}

#[utoipa::path(
    patch,
    path = "/api/content/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Content section id")),
    request_body = ContentSectionPatch,
    responses(
        (status = 200, description = "Updated", body = ContentSectionResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Section already exists")
    )
)]
pub async fn partial_update_content_section(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ContentSectionPatch>, JsonRejection>,
) -> AppResult<Json<ContentSectionResponse>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let section = state
        .repo
        .update_content_section(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("ContentSection", &id))?;
    tracing::info!(admin = %admin.id, content_id = %id, "content section patched");
    Ok(Json(section.present(state.storage.as_ref())))
}

#[utoipa::path(
    delete,
    path = "/api/content/{id}",
    tag = "content",
    params(("id" = String, Path, description = "Content section id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_content_section(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_content_section(&id).await? {
        return Err(AppError::not_found("ContentSection", &id));
    }
    tracing::info!(admin = %admin.id, content_id = %id, "content section deleted");
    Ok(StatusCode::NO_CONTENT)
}
