//! Direct door operations with the account credentials, no code check.

use doorman_config::Settings;
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Clone, Copy)]
pub enum DoorOp {
    State,
    Open,
    Close,
    Toggle,
}

pub async fn handle(op: DoorOp, settings: &Settings) -> Result<(), CliError> {
    let config = super::door_config(settings)?;
    let mut session = config.session()?;

    match op {
        DoorOp::State => {
            let state = session.check_state().await?;
            println!("{state}");
        }
        DoorOp::Open => {
            session.open().await?;
            info!("open requested");
            println!("Open requested");
        }
        DoorOp::Close => {
            session.close().await?;
            info!("close requested");
            println!("Close requested");
        }
        DoorOp::Toggle => {
            let observed = session.toggle().await?;
            println!("{observed} -> {}", observed.toggle_target());
        }
    }
    Ok(())
}
