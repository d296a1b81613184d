use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod storage;
pub mod validation;

use routes::{admin, resources};

pub use config::{AppConfig, DataBackend, Env};
pub use error::{AppError, RepoError};
pub use repository::{InMemoryRepository, Repository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::projects::list_projects, handlers::projects::get_project,
        handlers::projects::create_project, handlers::projects::update_project,
        handlers::projects::partial_update_project, handlers::projects::delete_project,
        handlers::testimonials::list_testimonials, handlers::testimonials::get_testimonial,
        handlers::testimonials::create_testimonial, handlers::testimonials::update_testimonial,
        handlers::testimonials::partial_update_testimonial,
        handlers::testimonials::delete_testimonial,
        handlers::services::list_services, handlers::services::get_service,
        handlers::services::create_service, handlers::services::update_service,
        handlers::services::partial_update_service, handlers::services::delete_service,
        handlers::home_stats::list_home_stats, handlers::home_stats::get_home_stat,
        handlers::home_stats::create_home_stat, handlers::home_stats::update_home_stat,
        handlers::home_stats::partial_update_home_stat, handlers::home_stats::delete_home_stat,
        handlers::content::list_content_sections, handlers::content::get_content_section,
        handlers::content::create_content_section, handlers::content::update_content_section,
        handlers::content::partial_update_content_section,
        handlers::content::delete_content_section,
        handlers::contact_info::list_contact_info, handlers::contact_info::get_contact_info,
        handlers::contact_info::create_contact_info, handlers::contact_info::update_contact_info,
        handlers::contact_info::partial_update_contact_info,
        handlers::contact_info::delete_contact_info,
        handlers::uploads::create_presigned_upload,
    ),
    components(
        schemas(
            models::Section, models::MediaFolder,
            models::ProjectResponse, models::ProjectInput, models::ProjectPatch,
            models::TestimonialResponse, models::TestimonialInput, models::TestimonialPatch,
            models::Service, models::ServiceInput, models::ServicePatch,
            models::HomeStats, models::HomeStatsInput, models::HomeStatsPatch,
            models::ContentSectionResponse, models::ContentSectionInput,
            models::ContentSectionPatch,
            models::ContactInfo, models::ContactInfoInput, models::ContactInfoPatch,
            models::PresignedUrlRequest, models::PresignedUrlResponse,
        )
    ),
    tags(
        (name = "portfolio", description = "Portfolio content API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Single immutable container for the services every request needs. Cloned
/// per request; the services themselves sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Content store (Postgres, Firestore or in-memory).
    pub repo: RepositoryState,
    /// Media bucket: presigned uploads and public asset URLs.
    pub storage: StorageState,
    pub config: AppConfig,
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// init_tracing
///
/// Pretty output locally, one JSON object per line in production.
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_tracing(env: Env, default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let (pretty, json) = match env {
        Env::Local => (Some(tracing_subscriber::fmt::layer().pretty()), None),
        Env::Production => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// create_router
///
/// `/health`, Swagger UI and the `/api` tree, wrapped in request-id,
/// tracing and permissive CORS layers.
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let api = Router::new()
        .merge(resources::resource_routes())
        .merge(admin::admin_routes());

    let observability = ServiceBuilder::new()
        // Client-supplied ids are kept; others get a fresh UUID.
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .layer(PropagateRequestIdLayer::new(request_id));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(observability)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Span for one request. Logs the path without the query string.
fn request_span(request: &axum::http::Request<axum::body::Body>) -> Span {
    let req_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        req_id,
    )
}
