use std::error::Error as StdError;
use thiserror::Error;

/// Result type alias for ruler operations
pub type Result<T> = std::result::Result<T, RulerError>;

/// Errors that can occur when interacting with the ruler API
#[derive(Debug, Error)]
pub enum RulerError {
    /// The configured address is not an absolute URL
    #[error("invalid ruler address: {0}")]
    InvalidAddress(#[source] url::ParseError),

    /// The configured address cannot carry an API path
    #[error("unsupported ruler address: {0}")]
    UnsupportedAddress(String),

    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Transport failure (connection refused, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest_middleware::Error),

    /// The ruler answered 404
    #[error("requested resource not found")]
    NotFound,

    /// The ruler answered with a non-success status other than 404
    #[error("failed request to the ruler api: HTTP {status} - {message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Summary of the response body
        message: String,
    },

    /// Failed to read a successful response body
    #[error("failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// Failed to encode a rule group as YAML
    #[error("failed to encode rule group: {0}")]
    Encode(#[source] serde_yaml::Error),

    /// Failed to decode a YAML response
    #[error("unable to unmarshal response: {0}")]
    Decode(#[source] serde_yaml::Error),

    /// No rule configuration exists for the tenant
    #[error("no config exists for this user")]
    NoConfig,
}

impl RulerError {
    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    ///
    /// The client itself never retries; this only helps callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(source) => {
                if let reqwest_middleware::Error::Reqwest(err) = source {
                    return err.is_connect() || err.is_timeout();
                }
                if let Some(inner) = StdError::source(source) {
                    if let Some(err) = inner.downcast_ref::<reqwest::Error>() {
                        return err.is_connect() || err.is_timeout();
                    }
                }
                false
            }
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the ruler reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_retryable_5xx() {
        for status in [500, 502, 503] {
            let error = RulerError::RequestFailed {
                status,
                message: "request failed with response body oops".to_string(),
            };
            assert!(error.is_retryable(), "status {status}");
        }
    }

    #[test]
    fn test_request_failed_not_retryable_4xx() {
        for status in [400, 401, 403, 409] {
            let error = RulerError::RequestFailed {
                status,
                message: String::new(),
            };
            assert!(!error.is_retryable(), "status {status}");
        }
        assert!(!RulerError::NotFound.is_retryable());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(RulerError::NotFound.is_not_found());
        assert!(!RulerError::NoConfig.is_not_found());
        assert!(!RulerError::RequestFailed {
            status: 404,
            message: String::new()
        }
        .is_not_found());
    }

    #[test]
    fn test_error_display() {
        let error = RulerError::RequestFailed {
            status: 500,
            message: "request failed with response body boom".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed request to the ruler api: HTTP 500 - request failed with response body boom"
        );
        assert_eq!(
            RulerError::NotFound.to_string(),
            "requested resource not found"
        );
        assert_eq!(
            RulerError::NoConfig.to_string(),
            "no config exists for this user"
        );
    }

    #[test]
    fn test_decode_error_not_retryable() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("a: [").unwrap_err();
        let error = RulerError::Decode(yaml_err);
        assert!(!error.is_retryable());
        assert!(error.to_string().starts_with("unable to unmarshal response"));
    }

    #[test]
    fn test_invalid_address_display() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let error = RulerError::InvalidAddress(parse_err);
        assert!(error.to_string().starts_with("invalid ruler address"));
    }
}
