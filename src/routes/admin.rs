use axum::{Router, routing::post};

use super::route_both;
use crate::{AppState, handlers::uploads};

/// Admin Router Module
///
/// Endpoints that only make sense for content editors. The staff check is
/// done by the `AdminUser` extractor in each handler.
pub fn admin_routes() -> Router<AppState> {
    // POST /uploads/presigned
    // Hands out a presigned PUT URL for an image; the returned key is then
    // stored in a project, testimonial or content section `image` field.
    route_both(
        Router::new(),
        "/uploads/presigned",
        post(uploads::create_presigned_upload),
    )
}
