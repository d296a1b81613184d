use std::{env, fmt, path::PathBuf, str::FromStr};

/// AppConfig
///
/// Immutable application configuration, loaded once at start-up and shared
/// through `AppState` (pulled into handlers and extractors via `FromRef`).
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Runtime environment marker. Controls log format and fail-fast strictness.
    pub env: Env,
    /// Which content store serves the API and receives seed data.
    pub backend: DataBackend,
    /// Postgres connection string. Required when `backend` is `Postgres`.
    pub db_url: Option<String>,
    /// Firestore connection settings. Required when `backend` is `Firestore`.
    pub firestore: Option<FirestoreConfig>,
    // S3-compatible storage endpoint URL (MinIO in local).
    pub s3_endpoint: String,
    pub s3_region: String,
    pub s3_key: String,
    pub s3_secret: String,
    /// The bucket holding uploaded images.
    pub s3_bucket: String,
    /// Public prefix prepended to an uploaded object key to form `imageUrl`.
    pub media_base_url: String,
    /// Shared HS256 secret used to validate bearer tokens.
    pub jwt_secret: String,
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
}

/// Env
///
/// Runtime context: local development or hardened production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// DataBackend
///
/// The swappable content store.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DataBackend {
    Postgres,
    Firestore,
    Memory,
}

impl FromStr for DataBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DataBackend::Postgres),
            "firestore" | "firebase" => Ok(DataBackend::Firestore),
            "memory" => Ok(DataBackend::Memory),
            other => Err(ConfigError::Invalid {
                var: "DATA_BACKEND",
                reason: format!("unknown backend \"{other}\""),
            }),
        }
    }
}

impl fmt::Display for DataBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataBackend::Postgres => "postgres",
            DataBackend::Firestore => "firestore",
            DataBackend::Memory => "memory",
        })
    }
}

/// FirestoreConfig
///
/// Either a service-account key file (production) or an emulator host
/// (local), plus the Google Cloud project id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Overrides the project id found in the service-account key.
    pub project_id: Option<String>,
    pub credentials_path: Option<PathBuf>,
    /// `host:port` of a Firestore emulator. Disables authentication.
    pub emulator_host: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration for tests: in-memory store, local
    /// MinIO defaults, a fixed JWT secret.
    fn default() -> Self {
        Self {
            env: Env::Local,
            backend: DataBackend::Memory,
            db_url: None,
            firestore: None,
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_key: "admin".to_string(),
            s3_secret: "password".to_string(),
            s3_bucket: "portfolio-test".to_string(),
            media_base_url: "http://localhost:9000/portfolio-test".to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

fn var(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    var(name).ok_or(ConfigError::Missing(name))
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables. In production every
    /// secret must be supplied explicitly; local mode falls back to the
    /// docker-compose defaults (MinIO, in-memory store, fixed JWT secret).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_backend(None)
    }

    /// load_with_backend
    ///
    /// Same as [`AppConfig::load`], but `backend` (when given) takes precedence
    /// over `DATA_BACKEND`. Used by the seeder's `--backend` flag.
    pub fn load_with_backend(backend: Option<DataBackend>) -> Result<Self, ConfigError> {
        let env = match var("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let backend = match (backend, var("DATA_BACKEND")) {
            (Some(backend), _) => backend,
            (None, Some(value)) => value.parse()?,
            (None, None) if env == Env::Production => DataBackend::Postgres,
            (None, None) if var("DATABASE_URL").is_some() => DataBackend::Postgres,
            (None, None) => DataBackend::Memory,
        };

        let jwt_secret = match env {
            Env::Production => required("JWT_SECRET")?,
            Env::Local => var("JWT_SECRET").unwrap_or_else(|| LOCAL_JWT_SECRET.to_string()),
        };

        let db_url = var("DATABASE_URL");
        if backend == DataBackend::Postgres && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let firestore = match backend {
            DataBackend::Firestore => Some(Self::load_firestore()?),
            _ => None,
        };

        let (s3_endpoint, s3_region, s3_key, s3_secret) = match env {
            Env::Local => (
                var("S3_ENDPOINT").unwrap_or_else(|| "http://localhost:9000".to_string()),
                var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                var("S3_ACCESS_KEY").unwrap_or_else(|| "admin".to_string()),
                var("S3_SECRET_KEY").unwrap_or_else(|| "password".to_string()),
            ),
            Env::Production => (
                required("S3_ENDPOINT")?,
                var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                required("S3_ACCESS_KEY")?,
                required("S3_SECRET_KEY")?,
            ),
        };
        let s3_bucket = var("S3_BUCKET_NAME").unwrap_or_else(|| "portfolio-media".to_string());

        let media_base_url = var("MEDIA_BASE_URL")
            .unwrap_or_else(|| format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket));
        if !(media_base_url.starts_with("http://") || media_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "MEDIA_BASE_URL",
                reason: "must be an absolute http(s) URL".to_string(),
            });
        }

        Ok(Self {
            env,
            backend,
            db_url,
            firestore,
            s3_endpoint,
            s3_region,
            s3_key,
            s3_secret,
            s3_bucket,
            media_base_url,
            jwt_secret,
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string()),
        })
    }

    fn load_firestore() -> Result<FirestoreConfig, ConfigError> {
        let config = FirestoreConfig {
            project_id: var("FIRESTORE_PROJECT_ID"),
            credentials_path: var("FIREBASE_SERVICE_ACCOUNT_PATH").map(PathBuf::from),
            emulator_host: var("FIRESTORE_EMULATOR_HOST"),
        };

        if config.emulator_host.is_some() {
            if config.project_id.is_none() {
                return Err(ConfigError::Missing("FIRESTORE_PROJECT_ID"));
            }
        } else if config.credentials_path.is_none() {
            return Err(ConfigError::Missing("FIREBASE_SERVICE_ACCOUNT_PATH"));
        }

        Ok(config)
    }
}
