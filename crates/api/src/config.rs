use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`; generation batches
    /// hold the request open while the image model renders).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Generative API connection settings.
    pub genai: GenAiConfig,
    /// Object store connection settings.
    pub storage: StorageConfig,
    /// Sandbox / no-backing-store mode: skip upload, settlement, and
    /// persistence; apply a fixed local credit decrement instead.
    pub sandbox_mode: bool,
}

/// Connection settings for the generative API.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// Base URL (default: `https://generativelanguage.googleapis.com`).
    pub api_url: String,
    /// API key. May be empty in sandbox mode.
    pub api_key: String,
    /// Model id for image variation calls.
    pub image_model: String,
    /// Model id for metadata/scoring/enhancement calls.
    pub text_model: String,
}

/// Connection settings for the object store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Store base URL. May be empty in sandbox mode.
    pub url: String,
    /// Bucket receiving generated thumbnails.
    pub bucket: String,
    /// Bearer token authorized to write the bucket.
    pub service_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                       |
    /// |------------------------|-----------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                     |
    /// | `PORT`                 | `3000`                                        |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`                       |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                                         |
    /// | `GENAI_API_URL`        | `https://generativelanguage.googleapis.com`   |
    /// | `GENAI_API_KEY`        | (empty)                                       |
    /// | `GENAI_IMAGE_MODEL`    | `gemini-2.5-flash-image`                      |
    /// | `GENAI_TEXT_MODEL`     | `gemini-3-flash-preview`                      |
    /// | `STORAGE_URL`          | (empty)                                       |
    /// | `STORAGE_BUCKET`       | `viralthumb`                                  |
    /// | `STORAGE_SERVICE_KEY`  | (empty)                                       |
    /// | `SANDBOX_MODE`         | `false`                                       |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let genai = GenAiConfig {
            api_url: std::env::var("GENAI_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            api_key: std::env::var("GENAI_API_KEY").unwrap_or_default(),
            image_model: std::env::var("GENAI_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash-image".into()),
            text_model: std::env::var("GENAI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-3-flash-preview".into()),
        };

        let storage = StorageConfig {
            url: std::env::var("STORAGE_URL").unwrap_or_default(),
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "viralthumb".into()),
            service_key: std::env::var("STORAGE_SERVICE_KEY").unwrap_or_default(),
        };

        let sandbox_mode = std::env::var("SANDBOX_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if sandbox_mode {
            tracing::warn!(
                "SANDBOX_MODE is on: uploads, credit settlement, and persistence are disabled"
            );
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            genai,
            storage,
            sandbox_mode,
        }
    }
}
