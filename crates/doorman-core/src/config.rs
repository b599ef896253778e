// ── Runtime configuration ──
//
// Everything one invocation needs: account credentials, the access policy,
// and where and how to reach MyQ. Built once by the caller from settings
// and secrets; never reads files or the environment itself.

use std::time::Duration;

use url::Url;

use doorman_api::myq::client::DEFAULT_BASE_URL;
use doorman_api::{Credentials, DeviceSession, MyQClient, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::policy::AccessPolicy;

#[derive(Debug, Clone)]
pub struct DoorConfig {
    /// MyQ account credentials.
    pub credentials: Credentials,
    /// Who may operate the door, and when.
    pub policy: AccessPolicy,
    /// API base URL (defaults to the public MyQ host).
    pub base_url: Url,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Request timeout.
    pub timeout: Duration,
}

impl DoorConfig {
    pub fn new(credentials: Credentials, policy: AccessPolicy) -> Result<Self, CoreError> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| CoreError::config(format!("invalid default base URL: {e}")))?;
        Ok(Self {
            credentials,
            policy,
            base_url,
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        })
    }

    /// Build a fresh, unauthenticated session. Sessions are never reused
    /// across invocations.
    pub fn session(&self) -> Result<DeviceSession, CoreError> {
        let transport = TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        };
        let client = MyQClient::new(self.base_url.clone(), &transport)?;
        Ok(DeviceSession::new(client, self.credentials.clone()))
    }
}
