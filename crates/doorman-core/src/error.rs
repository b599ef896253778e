// ── Core error types ──
//
// Errors surfaced by doorman-core. Consumers never see HTTP status codes
// or JSON parse failures directly; the `From<doorman_api::Error>` impl
// translates transport-layer errors into the controller's taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach MyQ at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("MyQ request timed out")]
    Timeout,

    // ── Device errors ────────────────────────────────────────────────
    #[error("No garage door opener is associated with this account")]
    DeviceNotFound,

    #[error("Door command failed: {message}")]
    CommandFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<doorman_api::Error> for CoreError {
    fn from(err: doorman_api::Error) -> Self {
        use doorman_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::AuthenticationFailed { message },
            ApiError::MissingSecurityToken => CoreError::AuthenticationFailed {
                message: "login response did not contain a security token".into(),
            },
            ApiError::SessionExpired { status } => CoreError::AuthenticationFailed {
                message: format!("token refused after re-login (HTTP {status})"),
            },
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            ApiError::DeviceNotFound => CoreError::DeviceNotFound,
            ApiError::Command { status, message } => CoreError::CommandFailed {
                message: format!("HTTP {status}: {message}"),
            },
            ApiError::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            ApiError::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_failures_map_to_authentication() {
        let err: CoreError = doorman_api::Error::MissingSecurityToken.into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));

        let err: CoreError = doorman_api::Error::SessionExpired { status: 401 }.into();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    }

    #[test]
    fn device_and_command_errors_keep_their_category() {
        let err: CoreError = doorman_api::Error::DeviceNotFound.into();
        assert!(matches!(err, CoreError::DeviceNotFound));

        let err: CoreError = doorman_api::Error::Command {
            status: 502,
            message: "gateway".into(),
        }
        .into();
        match err {
            CoreError::CommandFailed { message } => assert_eq!(message, "HTTP 502: gateway"),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }
}
