//! Unverified JWT payload decoding.
//!
//! The client never validates signatures; it only reads `exp` to decide when
//! to renew. Anything that does not decode is treated as expiring.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lookahead window used when no explicit threshold is configured.
pub const DEFAULT_EXPIRY_THRESHOLD_SECS: i64 = 60;

const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Claims carried by a JobBlog access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id.
    #[serde(default)]
    pub sub: String,
    /// User token version; bumped server-side to revoke every session.
    #[serde(default)]
    pub uver: i64,
    pub iat: Option<i64>,
    pub exp: Option<i64>,
    pub token_type: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Seconds between `now` and `exp`; negative once expired.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.exp.map(|exp| exp - now.timestamp())
    }

    pub fn is_access_token(&self) -> bool {
        self.token_type.as_deref().map_or(true, |kind| kind == "access")
    }
}

/// Decode the payload segment of a JWT.
///
/// Accepts URL-safe or standard base64, padded or not. Returns `None` for
/// anything that is not a three-part token with a JSON object payload.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.trim().split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if payload.is_empty() || parts.next().is_some() {
        return None;
    }
    let normalized: String = payload
        .chars()
        .map(|ch| match ch {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = PAYLOAD_ENGINE.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether `token` should be renewed before use.
///
/// Absent, malformed and `exp`-less tokens all count as expiring.
pub fn is_expiring_soon(token: Option<&str>, threshold_secs: i64) -> bool {
    is_expiring_soon_at(token, threshold_secs, Utc::now())
}

/// [`is_expiring_soon`] against an explicit clock reading.
pub fn is_expiring_soon_at(token: Option<&str>, threshold_secs: i64, now: DateTime<Utc>) -> bool {
    let Some(token) = token else {
        return true;
    };
    decode_claims(token)
        .and_then(|claims| claims.seconds_until_expiry(now))
        .map_or(true, |remaining| remaining <= threshold_secs)
}
