// MyQ API HTTP client
//
// Wraps `reqwest::Client` with MyQ URL construction, the static application
// identifier, and status-to-error classification. Endpoint methods live in
// `auth.rs` and `devices.rs` to keep this module focused on transport.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public MyQ cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://myqexternal.myqdevice.com";

/// Application identifier of the official Chamberlain app. Sent as a header
/// on login and as `appId` / `ApplicationID` on device calls.
pub const APPLICATION_ID: &str =
    "NWknvuBd7LoFHfXmKNMBcgajXtZEgKUh4V7WNzMidrpUUluDpVYVZx+xT4PCM5Kx";

pub(crate) const LOGIN_PATH: &str = "api/v4/User/Validate";
pub(crate) const DEVICE_LIST_PATH: &str = "api/v4/userdevicedetails/get";
pub(crate) const PUT_ATTRIBUTE_PATH: &str = "api/v4/deviceattribute/putdeviceattribute";

/// Which endpoint family a response came from. Decides how a non-success
/// status is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    Read,
    Command,
}

/// Raw HTTP client for the MyQ v4 API.
///
/// Stateless: tokens are passed in by the caller. Cheap to clone
/// (`reqwest::Client` is reference counted).
#[derive(Debug, Clone)]
pub struct MyQClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MyQClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, keeping any path prefix on the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build a device endpoint URL carrying `appId` and `SecurityToken`.
    pub(crate) fn token_endpoint(&self, path: &str, token: &str) -> Result<Url, Error> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("appId", APPLICATION_ID)
            .append_pair("SecurityToken", token);
        Ok(url)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Map a non-success status to an error, or parse the JSON body.
    ///
    /// 401 and 403 always mean the token was refused; everything else is
    /// classified by the kind of call that produced it.
    pub(crate) async fn parse_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        kind: CallKind,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = Self::check_status(resp, kind).await?;
        trace!(%status, "response body received");

        serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Verify a response status, returning the body text on success.
    pub(crate) async fn check_status(
        resp: reqwest::Response,
        kind: CallKind,
    ) -> Result<String, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(%status, "token refused");
            return Err(Error::SessionExpired {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|e| {
                debug!(%status, error = %e, "failed to read error response body");
                String::new()
            });
            let message = body.chars().take(200).collect::<String>();
            return Err(match kind {
                CallKind::Read => Error::Api {
                    status: status.as_u16(),
                    message,
                },
                CallKind::Command => Error::Command {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> MyQClient {
        MyQClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_joins_paths() {
        let c = client("https://myq.example.com");
        assert_eq!(
            c.endpoint(LOGIN_PATH).unwrap().as_str(),
            "https://myq.example.com/api/v4/User/Validate"
        );
    }

    #[test]
    fn endpoint_keeps_base_prefix() {
        let c = client("http://127.0.0.1:9000/proxy/");
        assert_eq!(
            c.endpoint(DEVICE_LIST_PATH).unwrap().as_str(),
            "http://127.0.0.1:9000/proxy/api/v4/userdevicedetails/get"
        );
    }

    #[test]
    fn token_endpoint_adds_query() {
        let c = client("https://myq.example.com");
        let url = c.token_endpoint(DEVICE_LIST_PATH, "tok+1").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("appId".to_string(), APPLICATION_ID.to_string()),
                ("SecurityToken".to_string(), "tok+1".to_string()),
            ]
        );
    }
}
