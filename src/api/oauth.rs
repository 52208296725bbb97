//! Google sign-in glue, session bootstrap and logout.

use reqwest::Url;
use serde_json::json;

use crate::auth::{AccessToken, LogoutReason};
use crate::client::{ApiError, ApiRequest, AuthPipeline};
use crate::config::GoogleOAuthConfig;

pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Consent-screen URL that starts the Google login.
pub fn google_authorize_url(config: &GoogleOAuthConfig) -> Result<Url, ApiError> {
    Url::parse_with_params(
        GOOGLE_AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("prompt", "select_account"),
        ],
    )
    .map_err(|err| ApiError::InvalidRequest(format!("authorize url: {err}")))
}

/// Pull the access token out of the post-login redirect (`...?token=...`).
pub fn token_from_callback(callback_url: &str) -> Option<AccessToken> {
    let url = Url::parse(callback_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(AccessToken::new)
}

/// Session entry and exit points.
#[derive(Debug, Clone)]
pub struct OAuthApi {
    pipeline: AuthPipeline,
    logout_route: String,
}

impl OAuthApi {
    pub fn new(pipeline: AuthPipeline, logout_route: impl Into<String>) -> Self {
        Self {
            pipeline,
            logout_route: logout_route.into(),
        }
    }

    /// Turn the refresh cookie into an access token at start-up.
    ///
    /// Returns whether the session is now authenticated. A failed attempt has
    /// already cleared the session and fired the logout signal.
    pub async fn bootstrap(&self) -> bool {
        match self.pipeline.refresh().await {
            Ok(token) => {
                tracing::debug!(token = %token.preview(), "session bootstrapped");
                true
            }
            Err(err) => {
                tracing::info!(error = %err, "no active session");
                false
            }
        }
    }

    /// Store the token delivered by the OAuth callback redirect.
    pub fn complete_login(&self, callback_url: &str) -> Result<AccessToken, ApiError> {
        let token = token_from_callback(callback_url).ok_or_else(|| {
            ApiError::InvalidRequest("callback URL carries no token".to_string())
        })?;
        self.pipeline.session().set_token(token.clone());
        Ok(token)
    }

    /// Invalidate the refresh credential server-side and drop the local token.
    ///
    /// The server call is best effort; the local session is cleared regardless.
    /// If that call already ended the session, the logout signal is not fired
    /// a second time.
    pub async fn logout(&self) {
        let request = ApiRequest::post(self.logout_route.as_str()).with_body(json!({}));
        if let Err(err) = self.pipeline.send(request).await {
            tracing::warn!(error = %err, "logout request failed");
        }
        let session = self.pipeline.session();
        if session.is_authenticated() {
            session.end(LogoutReason::UserRequested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_client_settings() {
        let url = google_authorize_url(&GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            redirect_uri: "https://api.example.com/oauth/google/callback".to_string(),
        })
        .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(url.as_str().starts_with(GOOGLE_AUTHORIZE_URL));
        assert!(pairs.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "openid email profile".to_string())));
        assert!(pairs.contains(&("prompt".to_string(), "select_account".to_string())));
    }

    #[test]
    fn callback_token_extraction() {
        let token = token_from_callback("https://app.example.com/auth/google/callback?token=abc.def.ghi");
        assert_eq!(token.map(|t| t.as_str().to_string()), Some("abc.def.ghi".to_string()));
        assert!(token_from_callback("https://app.example.com/auth/google/callback").is_none());
        assert!(token_from_callback("https://app.example.com/cb?token=").is_none());
        assert!(token_from_callback("not a url").is_none());
    }
}
