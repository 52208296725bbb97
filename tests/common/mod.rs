//! Shared test helpers: token minting, logout recording, scripted transport.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde_json::{json, Value};
use wiremock::MockServer;

use jobblog::auth::{LogoutReason, LogoutSignal, Session};
use jobblog::client::{ApiRequest, ApiResponse, AuthPipeline, Transport, TransportError};
use jobblog::config::ClientConfig;

/// Unsigned JWT with the given payload.
pub fn jwt(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// Access token for `sub` expiring `secs` from now (negative = already expired).
pub fn access_token(sub: &str, secs: i64) -> String {
    let now = Utc::now().timestamp();
    jwt(json!({
        "sub": sub,
        "uver": 1,
        "token_type": "access",
        "iat": now,
        "exp": now + secs,
    }))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Logout hook that remembers every call.
#[derive(Default)]
pub struct RecordingSignal {
    events: Mutex<Vec<LogoutReason>>,
}

impl RecordingSignal {
    pub fn events(&self) -> Vec<LogoutReason> {
        self.events.lock().expect("signal lock poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("signal lock poisoned").len()
    }
}

impl LogoutSignal for RecordingSignal {
    fn logged_out(&self, reason: LogoutReason) {
        self.events
            .lock()
            .expect("signal lock poisoned")
            .push(reason);
    }
}

pub fn recorded_session() -> (Session, Arc<RecordingSignal>) {
    let signal = Arc::new(RecordingSignal::default());
    let session = Session::with_logout_signal(signal.clone());
    (session, signal)
}

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri())
}

pub fn pipeline_for(server: &MockServer, session: Session) -> AuthPipeline {
    AuthPipeline::from_config(&config_for(server), session).expect("pipeline")
}

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

/// In-memory transport answering from a closure and recording what it saw.
pub struct ScriptedTransport {
    handler: Handler,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent.lock().expect("transport lock poisoned").clone()
    }

    pub fn sent_to(&self, route: &str) -> Vec<ApiRequest> {
        self.sent()
            .into_iter()
            .filter(|request| request.route() == route)
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.sent
            .lock()
            .expect("transport lock poisoned")
            .push(request.clone());
        (self.handler)(request)
    }
}
