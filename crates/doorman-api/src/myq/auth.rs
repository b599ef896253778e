// MyQ user validation
//
// `POST /api/v4/User/Validate` exchanges account credentials for a
// short-lived `SecurityToken`. The endpoint insists on the headers the
// official mobile app sends.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use crate::error::Error;
use crate::myq::client::{APPLICATION_ID, CallKind, LOGIN_PATH, MyQClient};
use crate::myq::models::{ValidateRequest, ValidateResponse};

/// Account credentials. Immutable for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

impl MyQClient {
    /// Validate credentials and return the issued security token.
    ///
    /// Any non-success status is an [`Error::Authentication`]. A success
    /// response without a `SecurityToken` fails fast with
    /// [`Error::MissingSecurityToken`].
    pub async fn validate(&self, credentials: &Credentials) -> Result<SecretString, Error> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!(%url, username = %credentials.username, "validating credentials");

        let body = ValidateRequest {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
        };

        let resp = self
            .http()
            .post(url)
            .header("User-Agent", "Chamberlain/3.73")
            .header("BrandId", "2")
            .header("ApiVersion", "4.1")
            .header("Culture", "en")
            .header("MyQApplicationId", APPLICATION_ID)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                debug!(%status, error = %e, "failed to read login error body");
                String::new()
            });
            return Err(Error::Authentication {
                message: format!(
                    "login failed (HTTP {status}): {}",
                    body.chars().take(200).collect::<String>()
                ),
            });
        }

        let parsed: ValidateResponse = self.parse_response(resp, CallKind::Read).await?;
        match parsed.security_token {
            Some(token) if !token.is_empty() => {
                debug!("login successful");
                Ok(SecretString::from(token))
            }
            _ => {
                error!(
                    return_code = ?parsed.return_code,
                    error_message = parsed.error_message.as_deref().unwrap_or(""),
                    "login response carried no SecurityToken"
                );
                Err(Error::MissingSecurityToken)
            }
        }
    }
}
