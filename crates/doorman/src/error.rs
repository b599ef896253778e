//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text
//! and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use doorman_config::ConfigError;
use doorman_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach MyQ at {url}")]
    #[diagnostic(
        code(doorman::connection_failed),
        help(
            "Check network access to the MyQ API.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("MyQ request timed out")]
    #[diagnostic(
        code(doorman::timeout),
        help("Increase the timeout with --timeout or timeout_secs in the settings file.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("MyQ login failed: {message}")]
    #[diagnostic(
        code(doorman::auth_failed),
        help(
            "Verify the ACCOUNT and PASSWORD secrets.\n\
             Store them with: doorman config set-secret PASSWORD"
        )
    )]
    AuthFailed { message: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("No garage door opener found on this MyQ account")]
    #[diagnostic(
        code(doorman::no_device),
        help("Check that the opener is registered in the MyQ app.")
    )]
    DeviceNotFound,

    #[error("Door command failed: {message}")]
    #[diagnostic(code(doorman::command_failed))]
    CommandFailed { message: String },

    #[error("MyQ API error: {message}")]
    #[diagnostic(code(doorman::api_error))]
    ApiError { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Secret '{key}' is not configured")]
    #[diagnostic(
        code(doorman::missing_secret),
        help(
            "Export {key} in the environment, or store it with:\n\
             doorman config set-secret {key}"
        )
    )]
    MissingSecret { key: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(doorman::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(doorman::config),
        help("Run `doorman config show` to inspect the effective settings.")
    )]
    Config { message: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    #[diagnostic(code(doorman::usage))]
    Usage { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::DeviceNotFound => exit_code::NOT_FOUND,
            Self::MissingSecret { .. } | Self::Validation { .. } | Self::Config { .. } => {
                exit_code::CONFIG
            }
            Self::Usage { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => CliError::Config { message },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::DeviceNotFound => CliError::DeviceNotFound,
            CoreError::CommandFailed { message } => CliError::CommandFailed { message },
            CoreError::Api { message, status } => CliError::ApiError {
                message: match status {
                    Some(s) => format!("HTTP {s}: {message}"),
                    None => message,
                },
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<doorman_api::Error> for CliError {
    fn from(err: doorman_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingSecret { key } => CliError::MissingSecret { key },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_category() {
        assert_eq!(CliError::Timeout.exit_code(), exit_code::CONNECTION);
        assert_eq!(CliError::DeviceNotFound.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(
            CliError::from(CoreError::AuthenticationFailed {
                message: "nope".into()
            })
            .exit_code(),
            exit_code::AUTH
        );
        assert_eq!(
            CliError::from(ConfigError::MissingSecret {
                key: "PASSWORD".into()
            })
            .exit_code(),
            exit_code::CONFIG
        );
        assert_eq!(
            CliError::Usage {
                message: "bad".into()
            }
            .exit_code(),
            exit_code::USAGE
        );
        assert_eq!(
            CliError::CommandFailed {
                message: "HTTP 500".into()
            }
            .exit_code(),
            exit_code::GENERAL
        );
    }

    #[test]
    fn api_status_is_kept_in_the_message() {
        let err = CliError::from(CoreError::Api {
            message: "bad gateway".into(),
            status: Some(502),
        });
        assert_eq!(err.to_string(), "MyQ API error: HTTP 502: bad gateway");
    }
}
