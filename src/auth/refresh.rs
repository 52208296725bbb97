//! Single-flight access-token refresh.
//!
//! Concurrent demands share one pending refresh. The slot holds a
//! [`Shared`] future; the future clears the slot itself when it settles, so
//! every caller that joined observes the same outcome and the next demand
//! after settlement starts a new call.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::json;

use super::error::RefreshError;
use super::session::{LogoutReason, Session};
use super::token::AccessToken;
use crate::client::{ApiRequest, Transport};

type PendingRefresh = Shared<BoxFuture<'static, Result<AccessToken, RefreshError>>>;

/// Coordinates refresh calls against the refresh route.
///
/// Every failed attempt is terminal for the session: the token is cleared and
/// the logout signal fires once, however many callers were waiting on it.
#[derive(Clone)]
pub struct Refresher {
    inner: Arc<RefresherInner>,
}

struct RefresherInner {
    transport: Arc<dyn Transport>,
    session: Session,
    route: String,
    in_flight: Mutex<Option<PendingRefresh>>,
}

impl fmt::Debug for Refresher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refresher")
            .field("route", &self.inner.route)
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

impl Refresher {
    pub fn new(transport: Arc<dyn Transport>, session: Session, route: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RefresherInner {
                transport,
                session,
                route: route.into(),
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn route(&self) -> &str {
        &self.inner.route
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Obtain a fresh access token, joining any refresh already in flight.
    pub async fn refresh(&self) -> Result<AccessToken, RefreshError> {
        let pending = {
            let mut slot = self
                .inner
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(pending) => {
                    tracing::debug!("joining in-flight token refresh");
                    pending.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    let pending = async move {
                        let outcome = inner.perform().await;
                        inner.settle(&outcome);
                        outcome
                    }
                    .boxed()
                    .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }
}

impl RefresherInner {
    async fn perform(&self) -> Result<AccessToken, RefreshError> {
        tracing::debug!(route = %self.route, "refreshing access token");
        let request = ApiRequest::post(self.route.as_str()).with_body(json!({}));
        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|err| RefreshError::Transport(err.to_string()))?;
        if !response.is_success() {
            return Err(RefreshError::from_status(response.status()));
        }
        let value = response.text_value();
        if value.is_empty() {
            return Err(RefreshError::EmptyToken);
        }
        let token = AccessToken::new(value);
        self.session.set_token(token.clone());
        Ok(token)
    }

    fn settle(&self, outcome: &Result<AccessToken, RefreshError>) {
        *self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(err) = outcome {
            tracing::warn!(error = %err, "token refresh failed; ending session");
            let reason = if err.is_rejected() {
                LogoutReason::RefreshRejected
            } else {
                LogoutReason::RefreshFailed
            };
            self.session.end(reason);
        }
    }
}
