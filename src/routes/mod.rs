/// Router Module Index
///
/// Every route lives under `/api`. Reads are public; writes check the staff
/// flag inside the handler through the `AdminUser` extractor, so one path can
/// serve both without separate routers.

/// The six content resources (list/retrieve open, create/update/delete admin-only).
pub mod resources;

/// Routes with no public counterpart at all.
pub mod admin;

use axum::{Router, routing::MethodRouter};

use crate::AppState;

/// Registers `path` and `path/` with the same handlers; the front-end client
/// appends the trailing slash.
pub(crate) fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}
