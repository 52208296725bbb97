//! Tests for the error system.

use jobblog::auth::RefreshError;
use jobblog::client::{ApiError, TransportError};
use jobblog::error::unified::*;
use jobblog::error::*;
use reqwest::StatusCode;

fn status(code: StatusCode) -> JobBlogError {
    JobBlogError::Api(ApiError::Status {
        status: code,
        body: "body".to_string(),
    })
}

#[test]
fn status_error_display_carries_code_and_body() {
    assert_eq!(
        status(StatusCode::NOT_FOUND).to_string(),
        "API error (status 404 Not Found): body"
    );
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: JobBlogError,
        expected_category: ErrorCategory,
        expected_recovery: RecoverySuggestion,
    }

    let serde_error = serde_json::from_str::<serde_json::Value>("{not-json}").unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");

    let cases = vec![
        Case {
            error: JobBlogError::NotSignedIn,
            expected_category: ErrorCategory::Authentication,
            expected_recovery: RecoverySuggestion::SignInAgain,
        },
        Case {
            error: RefreshError::Rejected {
                status: StatusCode::UNAUTHORIZED,
            }
            .into(),
            expected_category: ErrorCategory::Authentication,
            expected_recovery: RecoverySuggestion::SignInAgain,
        },
        Case {
            error: status(StatusCode::UNAUTHORIZED),
            expected_category: ErrorCategory::Authentication,
            expected_recovery: RecoverySuggestion::SignInAgain,
        },
        Case {
            error: status(StatusCode::BAD_GATEWAY),
            expected_category: ErrorCategory::Server,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: status(StatusCode::CONFLICT),
            expected_category: ErrorCategory::Api,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: TransportError::Other("reset".to_string()).into(),
            expected_category: ErrorCategory::Network,
            expected_recovery: RecoverySuggestion::RetryLater,
        },
        Case {
            error: ApiError::InvalidAttachment("too big".to_string()).into(),
            expected_category: ErrorCategory::Validation,
            expected_recovery: RecoverySuggestion::FixInput,
        },
        Case {
            error: JobBlogError::Configuration("bad-config".to_string()),
            expected_category: ErrorCategory::Configuration,
            expected_recovery: RecoverySuggestion::CheckConfiguration,
        },
        Case {
            error: JobBlogError::Serialization(serde_error),
            expected_category: ErrorCategory::Serialization,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
        Case {
            error: JobBlogError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_recovery: RecoverySuggestion::ContactSupport,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(
            case.error.recovery_suggestion(),
            case.expected_recovery,
            "{}",
            case.error
        );
    }
}

#[test]
fn transport_errors_are_transparent_through_api_error() {
    let err: JobBlogError = TransportError::InvalidUrl("nope".to_string()).into();
    assert_eq!(err.to_string(), "Invalid URL: nope");
}
