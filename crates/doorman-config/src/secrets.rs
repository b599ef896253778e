// ── Secret resolution ──
//
// Account credentials, access codes and the cleaner's day never live in the
// settings file. Each key is looked up by name: first the process
// environment, then the system keyring.

use secrecy::SecretString;
use tracing::debug;

use crate::ConfigError;

/// MyQ account username.
pub const ACCOUNT: &str = "ACCOUNT";
/// MyQ account password.
pub const PASSWORD: &str = "PASSWORD";
/// Code valid for the cleaner on their day and hours.
pub const CLEANER_CODE: &str = "CLEANER_CODE";
/// Code valid for the family at any time.
pub const FAMILY_CODE: &str = "FAMILY_CODE";
/// Weekday name the cleaner code is valid on.
pub const CLEANER_DAY: &str = "CLEANER_DAY";

/// Every key `build_door_config` resolves.
pub const ALL_KEYS: [&str; 5] = [ACCOUNT, PASSWORD, CLEANER_CODE, FAMILY_CODE, CLEANER_DAY];

/// A named-secret lookup.
pub trait SecretSource {
    /// Resolve `key`, or `ConfigError::MissingSecret` if this source lacks it.
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError>;
}

/// Process environment, one variable per key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl SecretSource for EnvSecrets {
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        std::env::var(key)
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingSecret { key: key.into() })
    }
}

/// System keyring entries under one service name, user = key.
#[derive(Debug, Clone)]
pub struct KeyringSecrets {
    service: String,
}

impl KeyringSecrets {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Store `value` under `key`.
    pub fn store(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        keyring::Entry::new(&self.service, key)
            .and_then(|entry| entry.set_password(value))
            .map_err(|e| ConfigError::Validation {
                field: key.into(),
                reason: format!("keyring write failed: {e}"),
            })
    }
}

impl SecretSource for KeyringSecrets {
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        match keyring::Entry::new(&self.service, key).and_then(|entry| entry.get_password()) {
            Ok(value) => Ok(SecretString::from(value)),
            Err(err) => {
                debug!(service = %self.service, key, error = %err, "keyring lookup failed");
                Err(ConfigError::MissingSecret { key: key.into() })
            }
        }
    }
}

/// Ordered fallback over several sources; the first hit wins.
pub struct SecretChain {
    sources: Vec<Box<dyn SecretSource + Send + Sync>>,
}

impl SecretChain {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Environment first, then the keyring under `service`.
    pub fn standard(service: &str) -> Self {
        Self::new()
            .with(EnvSecrets)
            .with(KeyringSecrets::new(service))
    }

    #[must_use]
    pub fn with(mut self, source: impl SecretSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl Default for SecretChain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SecretChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretChain")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl SecretSource for SecretChain {
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        for source in &self.sources {
            match source.secret(key) {
                Ok(value) => return Ok(value),
                Err(ConfigError::MissingSecret { .. }) => {}
                Err(other) => return Err(other),
            }
        }
        Err(ConfigError::MissingSecret { key: key.into() })
    }
}
