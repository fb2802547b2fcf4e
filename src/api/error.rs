use reqwest::StatusCode;
use thiserror::Error;

/// User-facing text of every failed request
pub const REQUEST_FAILED_MESSAGE: &str = "Something bad happened; please try again later.";

/// Coarse classification of a failed request, kept for diagnostics.
///
/// Callers see one generic message whatever the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 401/403 from the service
    Unauthorized,
    /// 404 from the service
    NotFound,
    /// 400/409/422: the service rejected the submitted data
    Validation,
    /// Network errors, malformed bodies and every other status
    Transient,
}

impl FailureKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Unauthorized,
            StatusCode::NOT_FOUND => FailureKind::NotFound,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                FailureKind::Validation
            }
            _ => FailureKind::Transient,
        }
    }
}

/// A request to the movie service failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", REQUEST_FAILED_MESSAGE)]
pub struct ApiError {
    kind: FailureKind,
}

impl ApiError {
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    pub fn transient() -> Self {
        Self::new(FailureKind::Transient)
    }

    pub fn from_status(status: StatusCode) -> Self {
        Self::new(FailureKind::from_status(status))
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_generic_for_every_kind() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::NOT_FOUND, StatusCode::INTERNAL_SERVER_ERROR] {
            assert_eq!(ApiError::from_status(status).to_string(), REQUEST_FAILED_MESSAGE);
        }
    }

    #[test]
    fn statuses_are_classified() {
        assert_eq!(FailureKind::from_status(StatusCode::FORBIDDEN), FailureKind::Unauthorized);
        assert_eq!(FailureKind::from_status(StatusCode::NOT_FOUND), FailureKind::NotFound);
        assert_eq!(FailureKind::from_status(StatusCode::UNPROCESSABLE_ENTITY), FailureKind::Validation);
        assert_eq!(FailureKind::from_status(StatusCode::BAD_GATEWAY), FailureKind::Transient);
    }
}
