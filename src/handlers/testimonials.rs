use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::{QueryPairs, featured_flag, last_value};
use crate::{
    AppState,
    auth::AdminUser,
    error::{AppError, AppResult, json_body},
    models::{TestimonialFilter, TestimonialInput, TestimonialPatch, TestimonialResponse},
};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TestimonialQuery {
    /// `true` keeps featured testimonials only.
    pub featured: Option<String>,
}

impl TestimonialQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            featured: last_value(pairs, "featured"),
        }
    }

    pub fn filter(&self) -> TestimonialFilter {
        TestimonialFilter {
            featured_only: featured_flag(self.featured.as_deref()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/testimonials",
    tag = "testimonials",
    params(TestimonialQuery),
    responses((status = 200, description = "Testimonials ordered by `order`", body = [TestimonialResponse]))
)]
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(pairs): Query<QueryPairs>,
) -> AppResult<Json<Vec<TestimonialResponse>>> {
    let filter = TestimonialQuery::from_pairs(&pairs).filter();
    let testimonials = state.repo.list_testimonials(filter).await?;
    let storage = state.storage.as_ref();
    Ok(Json(
        testimonials.into_iter().map(|t| t.present(storage)).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/testimonials/{id}",
    tag = "testimonials",
    params(("id" = String, Path, description = "Testimonial id")),
    responses(
        (status = 200, description = "Testimonial", body = TestimonialResponse),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_testimonial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TestimonialResponse>> {
    let testimonial = state
        .repo
        .get_testimonial(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Testimonial", &id))?;
    Ok(Json(testimonial.present(state.storage.as_ref())))
}

#[utoipa::path(
    post,
    path = "/api/testimonials",
    tag = "testimonials",
    request_body = TestimonialInput,
    responses(
        (status = 201, description = "Created", body = TestimonialResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<TestimonialInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TestimonialResponse>)> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let testimonial = state.repo.create_testimonial(input).await?;
    tracing::info!(admin = %admin.id, testimonial_id = %testimonial.id, "testimonial created");
    Ok((
        StatusCode::CREATED,
        Json(testimonial.present(state.storage.as_ref())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/testimonials/{id}",
    tag = "testimonials",
    params(("id" = String, Path, description = "Testimonial id")),
    request_body = TestimonialInput,
    responses(
        (status = 200, description = "Updated", body = TestimonialResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TestimonialInput>, JsonRejection>,
) -> AppResult<Json<TestimonialResponse>> {
    let input = json_body(payload)?;
    input.validate().into_result()?;

    let testimonial = state
        .repo
        .update_testimonial(&id, input.into())
        .await?
        .ok_or_else(|| AppError::not_found("Testimonial", &id))?;
    tracing::info!(admin = %admin.id, testimonial_id = %id, "testimonial updated");
    Ok(Json(testimonial.present(state.storage.as_ref())))
}

#[utoipa::path(
    patch,
    path = "/api/testimonials/{id}",
    tag = "testimonials",
    params(("id" = String, Path, description = "Testimonial id")),
    request_body = TestimonialPatch,
    responses(
        (status = 200, description = "Updated", body = TestimonialResponse),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn partial_update_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TestimonialPatch>, JsonRejection>,
) -> AppResult<Json<TestimonialResponse>> {
    let patch = json_body(payload)?;
    patch.validate().into_result()?;

    let testimonial = state
        .repo
        .update_testimonial(&id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Testimonial", &id))?;
    tracing::info!(admin = %admin.id, testimonial_id = %id, "testimonial patched");
    Ok(Json(testimonial.present(state.storage.as_ref())))
}

#[utoipa::path(
    delete,
    path = "/api/testimonials/{id}",
    tag = "testimonials",
    params(("id" = String, Path, description = "Testimonial id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_testimonial(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_testimonial(&id).await? {
        return Err(AppError::not_found("Testimonial", &id));
    }
    tracing::info!(admin = %admin.id, testimonial_id = %id, "testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}
