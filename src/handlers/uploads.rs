use std::{ffi::OsStr, path::Path};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AdminUser,
    error::{AppResult, json_body},
    models::{PresignedUrlRequest, PresignedUrlResponse},
    validation::ValidationErrors,
};

/// Derives a lowercase, alphanumeric file extension, or `bin` when there is none.
fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(OsStr::to_str)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "bin".to_string())
}

/// create_presigned_upload
///
/// [Admin Route] Issues a short-lived URL the client PUTs an image to directly.
/// The returned `resource_key` is what goes into an entity's `image` field.
/// Keys are random, so two uploads of the same filename never collide.
#[utoipa::path(
    post,
    path = "/api/uploads/presigned",
    tag = "uploads",
    request_body = PresignedUrlRequest,
    responses(
        (status = 200, description = "Upload URL", body = PresignedUrlResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not staff")
    )
)]
pub async fn create_presigned_upload(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    payload: Result<Json<PresignedUrlRequest>, JsonRejection>,
) -> AppResult<Json<PresignedUrlResponse>> {
    let request = json_body(payload)?;

    let mut errors = ValidationErrors::new();
    errors.text("filename", &request.filename, Some(255));
    if !request.file_type.starts_with("image/") {
        errors.add("file_type", "Only image uploads are accepted.");
    }
    errors.into_result()?;

    let folder = request.folder.map_or("uploads", |folder| folder.prefix());
    let resource_key = format!(
        "{folder}/{}.{}",
        Uuid::new_v4(),
        file_extension(&request.filename)
    );

    let upload_url = state
        .storage
        .get_presigned_upload_url(&resource_key, &request.file_type)
        .await?;
    tracing::info!(admin = %admin.id, key = %resource_key, "presigned upload issued");

    Ok(Json(PresignedUrlResponse {
        upload_url,
        resource_key,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_normalized() {
        assert_eq!(file_extension("Cover.PNG"), "png");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn missing_or_odd_extension_falls_back_to_bin() {
        assert_eq!(file_extension("README"), "bin");
        assert_eq!(file_extension("photo.j?g"), "bin");
        assert_eq!(file_extension(""), "bin");
    }
}
