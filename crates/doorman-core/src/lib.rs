// doorman-core: Access policy and decision engine between the MyQ session
// and the invocation surface.

pub mod actuator;
pub mod config;
pub mod decision;
pub mod error;
pub mod invocation;
pub mod policy;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actuator::DoorActuator;
pub use config::DoorConfig;
pub use decision::{AccessDecider, Action, Decision, DecisionOutcome, Reason};
pub use error::CoreError;
pub use invocation::{Invocation, Response, handle, invoke, respond};
pub use policy::AccessPolicy;

pub use doorman_api::{DoorState, TargetState};
