use std::fmt;
use std::sync::Arc;

use super::claims::{decode_claims, TokenClaims};

/// Opaque bearer credential issued by the JobBlog backend.
///
/// Cloning is cheap; the value is shared, never copied per reader. `Debug`
/// output only shows a short preview.
///
/// # Example
/// ```
/// use jobblog::auth::AccessToken;
///
/// let token = AccessToken::new("header.payload.signature");
/// assert_eq!(token.bearer(), "Bearer header.payload.signature");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(Arc<str>);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Decoded (unverified) claims, or `None` when the token is malformed.
    pub fn claims(&self) -> Option<TokenClaims> {
        decode_claims(&self.0)
    }

    /// First few characters followed by an ellipsis, for logs.
    pub fn preview(&self) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(8).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.preview()).finish()
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for AccessToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
