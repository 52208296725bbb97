//! Client configuration (layered: code > env > defaults).

use std::time::Duration;

use crate::auth::claims::DEFAULT_EXPIRY_THRESHOLD_SECS;
use crate::client::RefreshPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REFRESH_ROUTE: &str = "/oauth/refresh";
pub const DEFAULT_LOGOUT_ROUTE: &str = "/oauth/logout";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Google OAuth client settings used to build the consent URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    /// Backend callback that exchanges the code and redirects back with `?token=`.
    pub redirect_uri: String,
}

/// Settings for talking to the JobBlog API.
///
/// # Example
/// ```
/// use jobblog::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.jobblog.dev")
///     .with_expiry_threshold_secs(120);
/// assert_eq!(config.refresh_policy().expiry_threshold_secs, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub refresh_route: String,
    pub logout_route: String,
    pub expiry_threshold_secs: i64,
    pub request_timeout: Duration,
    pub google: Option<GoogleOAuthConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_route: DEFAULT_REFRESH_ROUTE.to_string(),
            logout_route: DEFAULT_LOGOUT_ROUTE.to_string(),
            expiry_threshold_secs: DEFAULT_EXPIRY_THRESHOLD_SECS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            google: None,
        }
    }

    /// Load from environment variables (`JOBBLOG_API_BASE_URL`, ...).
    ///
    /// A `.env` file is honoured if present. Unparseable numbers fall back to
    /// their defaults with a warning.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new(
            lookup("JOBBLOG_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        );

        if let Some(raw) = lookup("JOBBLOG_REFRESH_THRESHOLD_SECS") {
            match raw.trim().parse::<i64>() {
                Ok(secs) if secs >= 0 => config.expiry_threshold_secs = secs,
                _ => tracing::warn!(value = %raw, "ignoring invalid JOBBLOG_REFRESH_THRESHOLD_SECS"),
            }
        }

        if let Some(raw) = lookup("JOBBLOG_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "ignoring invalid JOBBLOG_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let (Some(client_id), Some(redirect_uri)) = (
            lookup("JOBBLOG_GOOGLE_CLIENT_ID"),
            lookup("JOBBLOG_GOOGLE_REDIRECT_URI"),
        ) {
            config.google = Some(GoogleOAuthConfig {
                client_id,
                redirect_uri,
            });
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_expiry_threshold_secs(mut self, secs: i64) -> Self {
        self.expiry_threshold_secs = secs;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_google(mut self, google: GoogleOAuthConfig) -> Self {
        self.google = Some(google);
        self
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        RefreshPolicy {
            refresh_route: self.refresh_route.clone(),
            expiry_threshold_secs: self.expiry_threshold_secs,
        }
    }
}
