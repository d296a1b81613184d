//! Writes the default portfolio content into the configured content store.

use clap::Parser;
use portfolio_backend::{
    AppConfig, DataBackend, init_tracing,
    repository,
    seed::{self, SeedProfile},
};

/// Seed the portfolio content store with default content
#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Idempotently insert default portfolio content", long_about = None)]
struct Cli {
    /// Content store to write to (postgres, firestore or memory). Defaults to DATA_BACKEND.
    #[arg(long)]
    backend: Option<DataBackend>,

    /// Payload set (starter or showcase). Defaults to the backend's usual profile.
    #[arg(long)]
    profile: Option<SeedProfile>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config =
        AppConfig::load_with_backend(cli.backend).expect("FATAL: invalid configuration");
    init_tracing(config.env, "portfolio_backend=info,seed=info");

    let profile = cli
        .profile
        .unwrap_or_else(|| SeedProfile::default_for(config.backend));
    tracing::info!(backend = %config.backend, %profile, "starting seeder");

    let repo = repository::connect(&config)
        .await
        .expect("FATAL: could not open the content store");

    match seed::seed(repo.as_ref(), profile).await {
        Ok(report) => {
            tracing::info!(
                created = report.created.len(),
                skipped = report.skipped.len(),
                "database seeded successfully"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "seeding failed");
            std::process::exit(1);
        }
    }
}
