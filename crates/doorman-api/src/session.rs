// Authenticated device session
//
// Owns the token lifecycle against the MyQ API for one invocation: lazy
// login, device discovery, and a single transparent re-login when a
// token-bearing call is refused. Never shared and never persisted.

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::door::{DoorState, TargetState};
use crate::error::Error;
use crate::myq::models::{MyQDevice, Scalar};
use crate::myq::{Credentials, MyQClient};

/// Mutable part of the session. Reset on invalidation.
#[derive(Debug, Default)]
struct SessionState {
    token: Option<SecretString>,
    device_id: Option<String>,
    door_state_code: Option<String>,
}

/// One authenticated session against the MyQ API, bound to the single
/// garage door opener of the account.
///
/// All operations take `&mut self`: the session has exactly one owner and
/// remote calls are issued strictly one after another.
#[derive(Debug)]
pub struct DeviceSession {
    client: MyQClient,
    credentials: Credentials,
    state: SessionState,
    logins: u32,
}

impl DeviceSession {
    /// Create a session. Does not touch the network until the first call.
    pub fn new(client: MyQClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            state: SessionState::default(),
            logins: 0,
        }
    }

    /// Whether a token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    /// Id of the discovered opener, if discovery has run.
    pub fn device_id(&self) -> Option<&str> {
        self.state.device_id.as_deref()
    }

    /// Number of logins performed by this session so far.
    pub fn login_count(&self) -> u32 {
        self.logins
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and immediately run device discovery with the fresh token.
    ///
    /// Returns the issued token so callers can use it without re-reading state.
    pub async fn login(&mut self) -> Result<SecretString, Error> {
        self.logins += 1;
        debug!(attempt = self.logins, "logging in to MyQ");

        let token = match self.client.validate(&self.credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "MyQ login failed");
                return Err(e);
            }
        };
        self.state.token = Some(token.clone());

        let devices = self.client.list_devices(token.expose_secret()).await?;
        self.apply_devices(devices)?;
        Ok(token)
    }

    /// Forget the token and everything discovered with it.
    pub fn invalidate(&mut self) {
        self.state = SessionState::default();
    }

    /// Run a token-bearing call with the session's retry contract.
    ///
    /// Logs in first when no token is held. If the login's discovery or the
    /// call is refused with an expired-session error, the token is discarded,
    /// login runs once more, and the call is retried exactly once. Whatever
    /// the retry returns is final.
    async fn authorized<T, F, Fut>(&mut self, call: F) -> Result<T, Error>
    where
        F: Fn(MyQClient, SecretString) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        // Discovery inside a first login can be refused too; it gets the
        // same single retry as the call itself.
        let first = match self.state.token.clone() {
            Some(token) => call(self.client.clone(), token).await,
            None => match self.login().await {
                Ok(token) => call(self.client.clone(), token).await,
                Err(e) => Err(e),
            },
        };

        match first {
            Err(e) if e.is_auth_expired() => {
                warn!(error = %e, "token refused, re-authenticating once");
                self.invalidate();
                let token = self.login().await?;
                call(self.client.clone(), token).await
            }
            other => other,
        }
    }

    // ── Device discovery ─────────────────────────────────────────────

    /// Query the device list and record the opener's id and raw door state.
    pub async fn refresh_device(&mut self) -> Result<(), Error> {
        let devices = self
            .authorized(|client, token| async move {
                client.list_devices(token.expose_secret()).await
            })
            .await?;
        self.apply_devices(devices)
    }

    fn apply_devices(&mut self, devices: Vec<MyQDevice>) -> Result<(), Error> {
        let Some(opener) = devices
            .into_iter()
            .find(|d| d.is_garage_door_opener() && d.id.is_some())
        else {
            self.state.device_id = None;
            self.state.door_state_code = None;
            return Err(Error::DeviceNotFound);
        };

        self.state.door_state_code = opener.door_state_code();
        self.state.device_id = opener.id.map(Scalar::into_string);
        debug!(
            device_id = self.state.device_id.as_deref().unwrap_or(""),
            door_state_code = self.state.door_state_code.as_deref().unwrap_or(""),
            "garage door opener discovered"
        );
        Ok(())
    }

    async fn resolve_device_id(&mut self) -> Result<String, Error> {
        if self.state.device_id.is_none() {
            if self.state.token.is_none() {
                self.login().await?;
            } else {
                self.refresh_device().await?;
            }
        }
        self.state.device_id.clone().ok_or(Error::DeviceNotFound)
    }

    // ── Door operations ──────────────────────────────────────────────

    /// Current door state, always re-queried from the API.
    pub async fn check_state(&mut self) -> Result<DoorState, Error> {
        self.refresh_device().await?;
        Ok(DoorState::from_code(self.state.door_state_code.as_deref()))
    }

    /// Request the door to move to `target`.
    pub async fn set_state(&mut self, target: TargetState) -> Result<(), Error> {
        let device_id = self.resolve_device_id().await?;
        self.authorized(move |client, token| {
            let device_id = device_id.clone();
            async move {
                client
                    .put_door_state(token.expose_secret(), &device_id, target)
                    .await
            }
        })
        .await?;
        info!(%target, "door command accepted");
        Ok(())
    }

    pub async fn open(&mut self) -> Result<(), Error> {
        self.set_state(TargetState::Open).await
    }

    pub async fn close(&mut self) -> Result<(), Error> {
        self.set_state(TargetState::Closed).await
    }

    /// Close an open (or opening) door, open a closed (or closing) one.
    ///
    /// An undeterminable state closes the door. Returns the state observed
    /// before the command was sent.
    pub async fn toggle(&mut self) -> Result<DoorState, Error> {
        let observed = self.check_state().await?;
        if observed == DoorState::Unknown {
            warn!("could not determine door state, closing door");
        }
        self.set_state(observed.toggle_target()).await?;
        Ok(observed)
    }
}
