//! Command handlers and the settings/secrets glue they share.

pub mod config_cmd;
pub mod door;
pub mod invoke;

use doorman_config::{ConfigError, SecretChain, Settings};
use doorman_core::DoorConfig;

use crate::cli::GlobalOpts;

/// Load settings and apply `--base-url` / `--timeout` on top.
pub fn load_settings(global: &GlobalOpts) -> Result<Settings, ConfigError> {
    let mut settings = doorman_config::load_settings(global.config.as_deref())?;
    if let Some(ref url) = global.base_url {
        settings.base_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        settings.timeout_secs = timeout;
    }
    Ok(settings)
}

/// Resolve secrets (environment, then keyring) into a `DoorConfig`.
pub fn door_config(settings: &Settings) -> Result<DoorConfig, ConfigError> {
    let secrets = SecretChain::standard(&settings.keyring_service);
    doorman_config::build_door_config(settings, &secrets)
}
