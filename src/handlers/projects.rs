use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::{QueryPairs, featured_flag, last_value, parse_limit};
use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{ProjectFilter, ProjectInput, ProjectPatch, ProjectResponse},
};

/// ProjectQuery
///
/// Query parameters accepted by GET /api/projects. Both are kept as raw
/// strings so that malformed values are ignored instead of rejected.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectQuery {
    /// `true` keeps featured projects only.
    pub featured: Option<String>,
    /// Maximum number of projects returned, applied after ordering.
    pub limit: Option<String>,
}

impl ProjectQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            featured: last_value(pairs, "featured"),
            limit: last_value(pairs, "limit"),
        }
    }

    pub fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            featured_only: featured_flag(self.featured.as_deref()),
            limit: parse_limit(self.limit.as_deref()),
        }
    }
}

/// list_projects
///
/// [Public Route] Lists projects ordered by `order`, optionally restricted to
/// featured ones and truncated to `limit`.
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    params(ProjectQuery),
    responses((status = 200, description = "Projects ordered by `order`", body = [ProjectResponse]))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<Json<Vec<ProjectResponse>>> {
    let filter = ProjectQuery::from_pairs(&pairs).filter();
    let projects = state.repo.list_projects(filter).await?;
    let storage = state.storage.as_ref();
    Ok(Json(projects.into_iter().map(|p| p.present(storage)).collect()))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProjectResponse>> {
    let project = state
        .repo
        .get_project(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", &id))?;
    Ok(Json(project.present(state.storage.as_ref())))
}

/// create_project
///
/// [Admin Route] Validates and stores a new project.
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = ProjectInput,
    responses(
        (status = 201, description = "Created", body = ProjectResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let project = state.repo.create_project(input).await?;
    tracing::info!(admin = %admin.id, project_id = %project.id, "project created");
    Ok((StatusCode::CREATED, Json(project.present(state.storage.as_ref()))))
}

/// update_project
///
/// [Admin Route] Full update. Every required field must be present; optional
/// fields left out keep their stored value.
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectInput,
    responses(
        (status = 200, description = "Updated", body = ProjectResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> AppResult<Json<ProjectResponse>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let project = state
        .repo
        .update_project(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("Project", &id))?;
    tracing::info!(admin = %admin.id, project_id = %id, "project updated");
    Ok(Json(project.present(state.storage.as_ref())))
}

/// partial_update_project
///
/// [Admin Route] Writes only the supplied fields.
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectPatch,
    responses(
        (status = 200, description = "Updated", body = ProjectResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn partial_update_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> AppResult<Json<ProjectResponse>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let project = state
        .repo
        .update_project(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Project", &id))?;
    tracing::info!(admin = %admin.id, project_id = %id, "project patched");
    Ok(Json(project.present(state.storage.as_ref())))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_project(&id).await? {
        return Err(AppError::not_found("Project", &id));
    }
    tracing::info!(admin = %admin.id, project_id = %id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}
