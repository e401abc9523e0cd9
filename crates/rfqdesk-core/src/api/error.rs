use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("No network connection")]
    NetworkUnavailable(#[from] reqwest::Error),

    /// No valid session; the caller must sign in again.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Input rejected locally, before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// No unlock allowance left in the current period.
    #[error("Unlock quota exhausted")]
    QuotaExhausted,

    /// The server refused the request for any other reason.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in log messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Machine-readable envelope code the server sends when the unlock
/// allowance is spent.
const QUOTA_EXHAUSTED_CODE: &str = "quota_exhausted";

/// Error envelope shape; either field may carry the human-readable text.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // Back up to a char boundary; bodies are often multibyte UTF-8.
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Classify a non-2xx response from its status and body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let code = parsed.as_ref().and_then(|b| b.error.as_deref());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Unauthenticated;
        }
        if status == reqwest::StatusCode::PAYMENT_REQUIRED || code == Some(QUOTA_EXHAUSTED_CODE) {
            return ApiError::QuotaExhausted;
        }

        let message = parsed
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                tracing::debug!(
                    status = status.as_u16(),
                    body = %Self::truncate_body(body),
                    "error response had no usable message"
                );
                "Request failed".to_string()
            });

        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_401_maps_to_unauthenticated() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, r#"{"message": "expired"}"#);
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn test_402_maps_to_quota_exhausted() {
        let err = ApiError::from_status(StatusCode::PAYMENT_REQUIRED, "");
        assert!(matches!(err, ApiError::QuotaExhausted));
    }

    #[test]
    fn test_quota_code_maps_regardless_of_status() {
        let err = ApiError::from_status(
            StatusCode::FORBIDDEN,
            r#"{"success": false, "error": "quota_exhausted"}"#,
        );
        assert!(matches!(err, ApiError::QuotaExhausted));
    }

    #[test]
    fn test_rejection_carries_server_message() {
        let err = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"success": false, "message": "Email already registered"}"#,
        );
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Email already registered");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_gets_generic_message() {
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "<html>upstream died</html>");
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Request failed");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // Three-byte characters put the cut position inside a code point
        let body = "ề".repeat(200);
        assert!(body.len() > MAX_ERROR_BODY_LENGTH);
        assert!(!body.is_char_boundary(MAX_ERROR_BODY_LENGTH));

        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
        assert!(truncated.len() < body.len());
    }
}
