mod common;

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobblog::auth::{LogoutReason, RefreshError, Refresher};
use jobblog::client::{ApiResponse, HttpTransport, TransportError};

use common::{access_token, config_for, recorded_session, ScriptedTransport};

const ROUTE: &str = "/oauth/refresh";

#[tokio::test]
async fn plain_text_body_becomes_the_session_token() {
    let token = access_token("1", 3600);
    let body = token.clone();
    let transport = ScriptedTransport::new(move |_| Ok(ApiResponse::from_status(StatusCode::OK, body.clone())));
    let (session, signal) = recorded_session();
    let refresher = Refresher::new(transport.clone(), session.clone(), ROUTE);

    let fresh = refresher.refresh().await.expect("refresh");
    assert_eq!(fresh.as_str(), token);
    assert_eq!(session.get_token(), Some(fresh));
    assert!(!refresher.is_in_flight());
    assert_eq!(signal.count(), 0);

    let sent = transport.sent_to(ROUTE);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].authorization().is_none());
}

#[tokio::test]
async fn json_quoted_body_is_accepted() {
    let transport =
        ScriptedTransport::new(|_| Ok(ApiResponse::from_status(StatusCode::OK, "\"abc.def.ghi\"\n")));
    let (session, _signal) = recorded_session();
    let refresher = Refresher::new(transport, session, ROUTE);

    assert_eq!(refresher.refresh().await.expect("refresh").as_str(), "abc.def.ghi");
}

#[tokio::test]
async fn each_failure_class_ends_the_session() {
    struct Case {
        /// `None` stands for a transport failure.
        response: Option<ApiResponse>,
        expected: RefreshError,
        reason: LogoutReason,
    }

    let cases = vec![
        Case {
            response: Some(ApiResponse::from_status(StatusCode::UNAUTHORIZED, "")),
            expected: RefreshError::Rejected {
                status: StatusCode::UNAUTHORIZED,
            },
            reason: LogoutReason::RefreshRejected,
        },
        Case {
            response: Some(ApiResponse::from_status(StatusCode::FORBIDDEN, "")),
            expected: RefreshError::Rejected {
                status: StatusCode::FORBIDDEN,
            },
            reason: LogoutReason::RefreshRejected,
        },
        Case {
            response: Some(ApiResponse::from_status(StatusCode::BAD_GATEWAY, "")),
            expected: RefreshError::UnexpectedStatus {
                status: StatusCode::BAD_GATEWAY,
            },
            reason: LogoutReason::RefreshFailed,
        },
        Case {
            response: Some(ApiResponse::from_status(StatusCode::OK, "   ")),
            expected: RefreshError::EmptyToken,
            reason: LogoutReason::RefreshFailed,
        },
        Case {
            response: None,
            expected: RefreshError::Transport("Transport error: connection reset".to_string()),
            reason: LogoutReason::RefreshFailed,
        },
    ];

    for case in cases {
        let Case {
            response,
            expected,
            reason,
        } = case;
        let transport = ScriptedTransport::new(move |_| {
            response
                .clone()
                .ok_or_else(|| TransportError::Other("connection reset".to_string()))
        });
        let (session, signal) = recorded_session();
        session.set_token(access_token("1", 3600).as_str());
        let refresher = Refresher::new(transport, session.clone(), ROUTE);

        let err = refresher.refresh().await.expect_err("refresh should fail");
        assert_eq!(err, expected);
        assert!(session.get_token().is_none());
        assert_eq!(signal.events(), vec![reason]);
        assert!(!refresher.is_in_flight());
    }
}

#[tokio::test]
async fn settled_refresh_does_not_cache_its_outcome() {
    let transport = ScriptedTransport::new(|_| Ok(ApiResponse::from_status(StatusCode::OK, "t")));
    let (session, _signal) = recorded_session();
    let refresher = Refresher::new(transport.clone(), session, ROUTE);

    refresher.refresh().await.expect("first");
    refresher.refresh().await.expect("second");
    assert_eq!(transport.sent_to(ROUTE).len(), 2);
}

#[tokio::test]
async fn concurrent_refreshes_join_one_request() {
    let server = MockServer::start().await;
    let fresh = access_token("1", 3600);
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(fresh.clone())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(HttpTransport::new(&config_for(&server)).expect("transport"));
    let (session, _signal) = recorded_session();
    let refresher = Refresher::new(transport, session, ROUTE);
    let other = refresher.clone();

    let (a, b, c) = tokio::join!(refresher.refresh(), other.refresh(), refresher.refresh());
    let a = a.expect("a");
    assert_eq!(a.as_str(), fresh);
    assert_eq!(b.expect("b"), a);
    assert_eq!(c.expect("c"), a);
}

#[tokio::test]
async fn refresh_cookie_rides_along() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ROUTE))
        .and(wiremock::matchers::header("cookie", "refreshToken=opaque-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("issued"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&config_for(&server)).expect("transport");
    transport.set_refresh_credential("opaque-123").expect("cookie");
    let (session, _signal) = recorded_session();
    let refresher = Refresher::new(Arc::new(transport), session.clone(), ROUTE);

    refresher.refresh().await.expect("refresh");
    assert_eq!(session.get_token().map(|t| t.as_str().to_string()), Some("issued".to_string()));
}
