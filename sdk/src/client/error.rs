//! Client error types.
//!
//! Provides error types for ledger operations.

use std::fmt;

/// Ledger client errors.
#[derive(Debug)]
pub enum ClientError {
    /// HTTP request failed.
    Request(reqwest::Error),

    /// Failed to deserialize response.
    Deserialization(String),

    /// Node answered with a non-success HTTP status.
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// RPC node returned an error object.
    Rpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
    },

    /// Ledger refused the transaction (bad signature, account already in
    /// use, insufficient funds, program constraint).
    Rejected(String),

    /// Transaction or account not found.
    NotFound(String),

    /// Rate limited (429).
    RateLimited {
        /// Retry after seconds.
        retry_after: Option<u64>,
    },

    /// Invalid configuration.
    InvalidConfig(String),

    /// Request timeout.
    Timeout,
}

impl ClientError {
    /// Returns true if a request may have reached the ledger even though no
    /// answer came back: a timeout, or a server-side HTTP failure.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "HTTP request failed: {}", e),
            Self::Deserialization(msg) => write!(f, "deserialization failed: {}", msg),
            Self::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            Self::Rpc { code, message } => write!(f, "RPC error [{}]: {}", code, message),
            Self::Rejected(reason) => write!(f, "transaction rejected: {}", reason),
            Self::NotFound(resource) => write!(f, "not found: {}", resource),
            Self::RateLimited { retry_after } => {
                if let Some(secs) = retry_after {
                    write!(f, "rate limited, retry after {} seconds", secs)
                } else {
                    write!(f, "rate limited")
                }
            }
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::Timeout => write!(f, "request timeout"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Rpc {
            code: -32602,
            message: "invalid params".to_string(),
        };
        assert_eq!(err.to_string(), "RPC error [-32602]: invalid params");
    }

    #[test]
    fn test_client_error_rejected() {
        let err = ClientError::Rejected("account already in use".to_string());
        assert_eq!(
            err.to_string(),
            "transaction rejected: account already in use"
        );
        assert!(!err.is_indeterminate());
    }

    #[test]
    fn test_client_error_rate_limited() {
        let err = ClientError::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = ClientError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_client_error_not_found() {
        let err = ClientError::NotFound("transaction 5xyz".to_string());
        assert_eq!(err.to_string(), "not found: transaction 5xyz");
    }

    #[test]
    fn test_client_error_timeout() {
        let err = ClientError::Timeout;
        assert_eq!(err.to_string(), "request timeout");
        assert!(err.is_indeterminate());
    }

    #[test]
    fn test_client_error_http_status() {
        let gateway = ClientError::Http {
            status: 503,
            body: "upstream unavailable".to_string(),
        };
        assert_eq!(gateway.to_string(), "HTTP 503: upstream unavailable");
        assert!(gateway.is_indeterminate());

        let bad_request = ClientError::Http {
            status: 400,
            body: String::new(),
        };
        assert!(!bad_request.is_indeterminate());

        let rpc = ClientError::Rpc {
            code: -32002,
            message: "simulation failed".to_string(),
        };
        assert!(!rpc.is_indeterminate());
    }
}
