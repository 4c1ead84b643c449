//! Error taxonomy for the dashboard controller.
//!
//! Every failure a user action can produce is one of three kinds:
//! - [`DashboardError::MissingCredentials`]: no session token, raised before any network I/O
//! - [`DashboardError::Service`]: the remote API failed (see [`ServiceError`])
//! - [`DashboardError::LocalValidation`]: input rejected locally, never sent to the server
//!
//! Storage failures of the durable key-value store are reported as
//! [`DashboardError::Store`].

use thiserror::Error;

/// Failure reported by the remote domain service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("could not reach the server: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server answered with a body this client cannot use.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// True when the server refused the session token.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}

/// Failure of the durable key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to encode stored value: {0}")]
    Encode(String),
}

/// Any failure surfaced by a dashboard action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("no session token found, please log in again")]
    MissingCredentials,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("{0}")]
    LocalValidation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::LocalValidation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_401_is_auth_rejection() {
        let unauthorized = ServiceError::Rejected {
            status: 401,
            message: "expired".to_owned(),
        };
        let server_error = ServiceError::Rejected {
            status: 500,
            message: "boom".to_owned(),
        };

        assert!(unauthorized.is_auth_rejection());
        assert!(!server_error.is_auth_rejection());
        assert!(!ServiceError::Network("refused".to_owned()).is_auth_rejection());
    }

    #[test]
    fn test_service_error_converts_into_dashboard_error() {
        let err: DashboardError = ServiceError::Malformed("not json".to_owned()).into();
        assert!(matches!(err, DashboardError::Service(ServiceError::Malformed(_))));
        assert_eq!(err.to_string(), "malformed response: not json");
    }
}
