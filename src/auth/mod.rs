//! Access-token lifecycle: session state, claims, single-flight refresh.

pub mod claims;
pub mod error;
pub mod refresh;
pub mod session;
pub mod token;

pub use claims::{decode_claims, is_expiring_soon, TokenClaims, DEFAULT_EXPIRY_THRESHOLD_SECS};
pub use error::RefreshError;
pub use refresh::Refresher;
pub use session::{LogoutReason, LogoutSignal, Session, TracingLogoutSignal};
pub use token::AccessToken;
