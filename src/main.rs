use portfolio_backend::{
    AppState,
    config::{AppConfig, DataBackend, Env},
    create_router, init_tracing, repository,
    seed::{self, SeedProfile},
    storage::{S3StorageClient, StorageService, StorageState},
};
use std::sync::Arc;
use tokio::net::TcpListener;

/// main
///
/// Initializes configuration, logging, the content store, media storage and
/// the HTTP server, in that order. Any start-up failure is fatal.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging: pretty locally, JSON in production
    init_tracing(
        config.env,
        "portfolio_backend=debug,tower_http=info,axum=trace",
    );
    tracing::info!(
        "Application starting in {:?} mode with the {} content store",
        config.env,
        config.backend
    );

    // 3. Content store (migrations run here for Postgres)
    let repo = repository::connect(&config)
        .await
        .expect("FATAL: could not open the content store. Check DATA_BACKEND and its settings.");

    // The in-memory store starts empty on every boot.
    if config.backend == DataBackend::Memory {
        let profile = SeedProfile::default_for(config.backend);
        seed::seed(repo.as_ref(), profile)
            .await
            .expect("FATAL: could not seed the in-memory content store");
    }

    // 4. Media storage (S3/MinIO)
    let s3_client = S3StorageClient::from_config(&config).await;

    // LOCAL-ONLY: create the MinIO bucket on first start.
    if config.env == Env::Local {
        s3_client.ensure_bucket_exists().await;
    }
    let storage = Arc::new(s3_client) as StorageState;

    // 5. State, router and server
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState {
        repo,
        storage,
        config,
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: could not bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {bind_addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://{bind_addr}/swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
