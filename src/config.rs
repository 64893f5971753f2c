use std::env;
use thiserror::Error;

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// REST base used when `GEMINI_API_BASE` is not set.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Body cap applied to the text-only route when `UPLOAD_BODY_LIMIT_BYTES` is not set.
pub const DEFAULT_UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Outbound HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Runtime configuration for the summarizer server.
///
/// Built once in `main` and handed to the components that need it; nothing reads the
/// environment after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential sent to the Gemini API.
    pub gemini_api_key: String,
    /// Model identifier passed on every generation call.
    pub gemini_model: String,
    /// Base URL of the Gemini REST API.
    pub gemini_api_base: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Origins allowed by CORS. A `*` entry allows any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Maximum request body accepted on routes without their own size policy.
    pub upload_body_limit: usize,
}

impl Config {
    /// Read an optional `.env` file, then load configuration from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_env()?;
        tracing::debug!(
            model = %config.gemini_model,
            api_base = %config.gemini_api_base,
            server_port = ?config.server_port,
            cors_allowed_origins = ?config.cors_allowed_origins,
            upload_body_limit = config.upload_body_limit,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: load_env("GEMINI_API_KEY")?,
            gemini_model: load_env_optional("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: load_env_optional("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            cors_allowed_origins: load_env_optional("CORS_ALLOWED_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or_else(|| vec!["*".to_string()]),
            upload_body_limit: load_env_optional("UPLOAD_BODY_LIMIT_BYTES")
                .map(|value| {
                    value.parse().map_err(|_| {
                        ConfigError::InvalidValue("UPLOAD_BODY_LIMIT_BYTES".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(DEFAULT_UPLOAD_BODY_LIMIT),
        })
    }

    /// Whether CORS should accept requests from any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
