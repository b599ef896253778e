// ── Invocation boundary ──
//
// The request/response pair exchanged with whatever transport delivers a
// submitted code. Every failure is caught here, logged, and turned into a
// fixed response; internal detail never reaches the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::actuator::DoorActuator;
use crate::config::DoorConfig;
use crate::decision::{AccessDecider, Action, DecisionOutcome, Reason};
use crate::error::CoreError;
use crate::policy::AccessPolicy;

/// Prefix of the URL-encoded form payload carrying the code.
pub const CODE_PREFIX: &str = "code=";

/// Incoming request: `{"body-json": "code=<value>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(rename = "body-json", default)]
    pub body_json: String,
}

impl Invocation {
    pub fn from_code(code: &str) -> Self {
        Self {
            body_json: format!("{CODE_PREFIX}{code}"),
        }
    }

    /// Everything after `code=`, verbatim. No percent-decoding, no trimming.
    /// A body without the prefix carries no code.
    pub fn submitted_code(&self) -> Option<&str> {
        self.body_json.strip_prefix(CODE_PREFIX)
    }
}

/// Outgoing status/body pair: `{"StatusCode", "Status", "body"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "StatusCode")]
    pub status_code: u16,
    #[serde(rename = "Status")]
    pub status: String,
    pub body: String,
}

impl Response {
    fn new(status_code: u16, status: &str, body: &str) -> Self {
        Self {
            status_code,
            status: status.into(),
            body: body.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, "200 OK", "OK")
    }

    pub fn wrong_day() -> Self {
        Self::new(200, "200 OK", "Cleaner code is not valid today")
    }

    pub fn bad_code() -> Self {
        Self::new(404, "404 Forbidden", "Bad code!")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "500 Internal Server Error", "Internal error")
    }
}

impl From<&DecisionOutcome> for Response {
    fn from(outcome: &DecisionOutcome) -> Self {
        match (outcome.action, outcome.reason) {
            (Action::Deny, Reason::CleanerWrongDay) => Self::wrong_day(),
            (Action::Deny, _) => Self::bad_code(),
            (Action::ToggleDoor | Action::ForceClose, _) => Self::ok(),
        }
    }
}

/// Turn the result of an invocation into its response, logging failures
/// with full context.
pub fn respond(result: Result<DecisionOutcome, CoreError>) -> Response {
    match result {
        Ok(outcome) => {
            debug!(
                action = %outcome.action,
                reason = outcome.reason.description(),
                door_state = ?outcome.observed_door_state,
                "invocation complete"
            );
            Response::from(&outcome)
        }
        Err(err) => {
            error!(error = %err, details = ?err, "invocation failed");
            Response::internal_error()
        }
    }
}

/// Decide and act on one invocation with the given actuator.
pub async fn handle<A: DoorActuator>(
    invocation: &Invocation,
    now: DateTime<Utc>,
    policy: &AccessPolicy,
    actuator: &mut A,
) -> Response {
    let result = AccessDecider::new(policy)
        .execute(invocation.submitted_code(), now, actuator)
        .await;
    respond(result)
}

/// Run one invocation against MyQ with a fresh session.
pub async fn invoke(invocation: &Invocation, now: DateTime<Utc>, config: &DoorConfig) -> Response {
    let mut session = match config.session() {
        Ok(session) => session,
        Err(err) => return respond(Err(err)),
    };
    handle(invocation, now, &config.policy, &mut session).await
}
