use thiserror::Error;

/// Top-level error type for the `doorman-api` crate.
///
/// Covers every failure mode of talking to the MyQ API: login,
/// transport, device discovery, and state-changing commands.
/// `doorman-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (bad credentials, locked account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Login succeeded at the HTTP level but the body carried no token.
    #[error("Login response did not contain a SecurityToken")]
    MissingSecurityToken,

    /// A token-bearing call was refused (token expired or revoked).
    #[error("Session expired -- re-authentication required (HTTP {status})")]
    SessionExpired { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device ──────────────────────────────────────────────────────
    /// The account has no device of type `GarageDoorOpener`.
    #[error("No garage door opener found on this account")]
    DeviceNotFound,

    /// A state-changing request was rejected.
    #[error("Door command failed (HTTP {status}): {message}")]
    Command { status: u16, message: String },

    /// Any other non-success response from a read endpoint.
    #[error("MyQ API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the token has expired
    /// and a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}
