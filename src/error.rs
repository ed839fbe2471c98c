use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

/// Failure taxonomy for the relay. Every variant carries the client-facing
/// message; upstream detail is logged at the call site and never serialized.
///
/// Upstream GraphQL failures are deliberately not subdivided further — the
/// relay surfaces rate limiting, bad credentials and missing resources all as
/// `UpstreamError`. Callers that need finer classification can branch on the
/// variant once one is added, without string matching.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed client input.
    #[error("{0}")]
    InvalidRequest(String),
    /// GitHub explicitly declined the request (e.g. a spent OAuth code).
    #[error("{0}")]
    UpstreamRejected(String),
    /// Transport failure or an upstream body we could not decode.
    #[error("{0}")]
    UpstreamUnavailable(String),
    /// Unclassified GraphQL error from GitHub.
    #[error("{0}")]
    UpstreamError(String),
}

impl RelayError {
    /// Swap the client-facing message, preserving the failure kind. Handlers
    /// use this to attach route-specific wording after logging the detail.
    pub fn with_message(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match self {
            RelayError::InvalidRequest(_) => RelayError::InvalidRequest(msg),
            RelayError::UpstreamRejected(_) => RelayError::UpstreamRejected(msg),
            RelayError::UpstreamUnavailable(_) => RelayError::UpstreamUnavailable(msg),
            RelayError::UpstreamError(_) => RelayError::UpstreamError(msg),
        }
    }
}

impl actix_web::ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) | RelayError::UpstreamRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::UpstreamUnavailable(_) | RelayError::UpstreamError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        log::error!("outbound GitHub call failed: {:?}", e);
        RelayError::UpstreamUnavailable("upstream request failed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn kinds_map_to_status_codes() {
        assert_eq!(
            RelayError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UpstreamRejected("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UpstreamUnavailable("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::UpstreamError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn with_message_preserves_kind() {
        let e = RelayError::UpstreamError("internal detail".into()).with_message("generic");
        match e {
            RelayError::UpstreamError(msg) => assert_eq!(msg, "generic"),
            other => panic!("kind changed: {:?}", other),
        }
    }
}
