// svckit/src/errors.rs
//
// Error taxonomy for the dashboard client

use thiserror::Error;

/// Failure of a request against the feedback backend.
///
/// Read failures are never fatal: the dashboard keeps showing the last
/// good value and records the error for the operator.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request dropped before a response arrived")]
    Aborted,
}

/// Client-side guard failures. Raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Feedback text is required")]
    EmptyFeedback,

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Unknown sentiment: {0}")]
    UnknownSentiment(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("A submission is already in progress")]
    SubmissionPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_message() {
        let err = ApiError::Server {
            status: 500,
            body: "Error retrieving feedback".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 500: Error retrieving feedback");
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<u64>("not a number").unwrap_err();
        let err: ApiError = parse.into();
        assert!(matches!(err, ApiError::Json(_)));
    }
}
