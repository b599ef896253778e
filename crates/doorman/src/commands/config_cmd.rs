//! Config subcommand handlers.

use std::io::Read;

use secrecy::{ExposeSecret, SecretString};

use doorman_config::{ConfigError, KeyringSecrets, Settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(
    args: ConfigArgs,
    global: &GlobalOpts,
    settings: Result<Settings, ConfigError>,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(doorman_config::config_path);
            println!("{}", path.display());
        }

        ConfigCommand::Show => {
            let rendered = doorman_config::render_settings(&settings?)?;
            print!("{rendered}");
        }

        ConfigCommand::SetSecret { key } => {
            let settings = settings?;
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            let value = SecretString::from(buf.trim_end_matches(['\r', '\n']).to_owned());
            if value.expose_secret().is_empty() {
                return Err(CliError::Validation {
                    field: key,
                    reason: "secret value cannot be empty".into(),
                });
            }
            KeyringSecrets::new(&settings.keyring_service).store(&key, value.expose_secret())?;
            eprintln!("Stored {key} in keyring service '{}'", settings.keyring_service);
        }
    }
    Ok(())
}
