use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Firebase project
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    pub firebase_storage_bucket: String,

    // Backend endpoints (overridable so tests can point at a mock server)
    pub auth_base_url: String,
    pub token_base_url: String,
    pub firestore_base_url: String,
    pub storage_base_url: String,

    // Feed Policy
    pub feed_mode: FeedMode,
    pub allow_guest_posts: bool,

    // Sessions
    pub session_ttl: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,

    // HTTP client
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Everyone sees every post; the home page offers a category filter and
    /// requires sign-in. Ordering uses the server-assigned creation time.
    Community,
    /// Signed-in users see only their own posts, visitors see everything.
    /// Ordering uses the client-assigned creation time.
    Personal,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let firebase_project_id = required_env("FIREBASE_PROJECT_ID")?;
        let default_bucket = format!("{firebase_project_id}.firebasestorage.app");

        Ok(Self {
            // Firebase project
            firebase_api_key: required_env("FIREBASE_API_KEY")?,
            firebase_storage_bucket: env_or_default("FIREBASE_STORAGE_BUCKET", &default_bucket),
            firebase_project_id,

            // Backend endpoints
            auth_base_url: env_or_default(
                "FIREBASE_AUTH_URL",
                "https://identitytoolkit.googleapis.com",
            ),
            token_base_url: env_or_default(
                "FIREBASE_TOKEN_URL",
                "https://securetoken.googleapis.com",
            ),
            firestore_base_url: env_or_default(
                "FIRESTORE_URL",
                "https://firestore.googleapis.com",
            ),
            storage_base_url: env_or_default(
                "FIREBASE_STORAGE_URL",
                "https://firebasestorage.googleapis.com",
            ),

            // Feed Policy
            feed_mode: parse_feed_mode(&env_or_default("FEED_MODE", "community"))?,
            allow_guest_posts: parse_env_bool("ALLOW_GUEST_POSTS", false)?,

            // Sessions
            session_ttl: Duration::from_secs(
                parse_env_u64("SESSION_TTL_DAYS", 30)?.saturating_mul(86_400),
            ),

            // Web Server
            web_host: env_or_default("WEB_HOST", "127.0.0.1"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,

            // HTTP client
            request_timeout: Duration::from_secs(parse_env_u64("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.firebase_api_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "FIREBASE_API_KEY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.firebase_project_id.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "FIREBASE_PROJECT_ID".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.firebase_storage_bucket.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "FIREBASE_STORAGE_BUCKET".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_DAYS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Root of the Firestore document tree for this project.
    ///
    /// Document paths under the `(default)` database are appended to this.
    #[must_use]
    pub fn firestore_documents_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.firebase_project_id
        )
    }

    /// Fixed configuration for tests. Tests override the fields they care
    /// about with struct update syntax.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            firebase_api_key: "test-api-key".to_string(),
            firebase_project_id: "demo-project".to_string(),
            firebase_storage_bucket: "demo-project.firebasestorage.app".to_string(),
            auth_base_url: "http://127.0.0.1:9".to_string(),
            token_base_url: "http://127.0.0.1:9".to_string(),
            firestore_base_url: "http://127.0.0.1:9".to_string(),
            storage_base_url: "http://127.0.0.1:9".to_string(),
            feed_mode: FeedMode::Community,
            allow_guest_posts: false,
            session_ttl: Duration::from_secs(30 * 86_400),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            request_timeout: Duration::from_secs(5),
        }
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_feed_mode(value: &str) -> Result<FeedMode, ConfigError> {
    match value.to_lowercase().as_str() {
        "community" => Ok(FeedMode::Community),
        "personal" => Ok(FeedMode::Personal),
        _ => Err(ConfigError::InvalidValue {
            name: "FEED_MODE".to_string(),
            message: format!("must be 'community' or 'personal', got '{value}'"),
        }),
    }
}
