//! `doorman invoke`: one request in, one response out.
//!
//! Never fails once arguments parse. Any problem with the event, settings,
//! secrets or MyQ becomes the generic 500 response on stdout.

use std::io::Read;

use chrono::Utc;
use tracing::error;

use doorman_config::{ConfigError, Settings};
use doorman_core::{CoreError, Invocation, Response, respond};

use crate::cli::InvokeArgs;
use crate::error::CliError;

pub async fn handle(
    args: &InvokeArgs,
    settings: Result<Settings, ConfigError>,
) -> Result<(), CliError> {
    let now = args.at.unwrap_or_else(Utc::now);

    let response = match read_invocation(args) {
        Ok(invocation) => match settings.and_then(|s| super::door_config(&s)) {
            Ok(config) => doorman_core::invoke(&invocation, now, &config).await,
            Err(err) => respond(Err(CoreError::from(err))),
        },
        Err(err) => {
            error!(error = %err, "unreadable invocation event");
            Response::internal_error()
        }
    };

    let rendered =
        serde_json::to_string(&response).map_err(|e| CliError::Internal(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

/// `--code`, else `--event`, else the event JSON on stdin.
fn read_invocation(args: &InvokeArgs) -> Result<Invocation, CliError> {
    if let Some(ref code) = args.code {
        return Ok(Invocation::from_code(code));
    }
    let raw = match args.event {
        Some(ref event) => event.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    serde_json::from_str(&raw).map_err(|e| CliError::Usage {
        message: format!("invocation event is not valid JSON: {e}"),
    })
}
