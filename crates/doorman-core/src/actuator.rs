// ── Door actuator seam ──
//
// The three door operations the decision engine drives. `DeviceSession`
// is the production implementation; tests substitute a recorder.

use std::future::Future;

use doorman_api::{DeviceSession, DoorState, Error, TargetState};

pub trait DoorActuator: Send {
    /// Re-query and return the current door state.
    fn check_state(&mut self) -> impl Future<Output = Result<DoorState, Error>> + Send;

    /// Request the door to move to `target`.
    fn set_state(&mut self, target: TargetState) -> impl Future<Output = Result<(), Error>> + Send;

    /// Flip the door, closing it when the state is unknown. Returns the
    /// state observed before the command.
    fn toggle(&mut self) -> impl Future<Output = Result<DoorState, Error>> + Send;
}

impl DoorActuator for DeviceSession {
    async fn check_state(&mut self) -> Result<DoorState, Error> {
        DeviceSession::check_state(self).await
    }

    async fn set_state(&mut self, target: TargetState) -> Result<(), Error> {
        DeviceSession::set_state(self, target).await
    }

    async fn toggle(&mut self) -> Result<DoorState, Error> {
        DeviceSession::toggle(self).await
    }
}
