// ── Access decisions ──
//
// Maps a submitted code and the current instant onto one of three actions,
// then drives the door accordingly. The first matching rule wins:
//
//   1. cleaner code on the wrong day        -> Deny
//   2. cleaner code inside the hour window  -> ToggleDoor
//   3. cleaner code outside the window      -> ForceClose
//   4. family code, any time                -> ToggleDoor
//   5. anything else                        -> Deny, without touching the API

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::{info, warn};

use doorman_api::{DoorState, TargetState};

use crate::actuator::DoorActuator;
use crate::error::CoreError;
use crate::policy::AccessPolicy;

/// What happens to the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum Action {
    ToggleDoor,
    ForceClose,
    Deny,
}

/// Why a decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Reason {
    FamilyCode,
    CleanerInWindow,
    CleanerOutsideWindow,
    CleanerWrongDay,
    UnrecognizedCode,
}

impl Reason {
    pub fn description(self) -> &'static str {
        match self {
            Self::FamilyCode => "family code",
            Self::CleanerInWindow => "cleaner code within allowed hours",
            Self::CleanerOutsideWindow => "cleaner code outside allowed hours, open forbidden",
            Self::CleanerWrongDay => "cleaner code used on wrong day",
            Self::UnrecognizedCode => "unrecognized code",
        }
    }
}

/// The pure part of a decision: no door has been touched yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

/// A carried-out decision, for logging and the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    pub action: Action,
    pub reason: Reason,
    pub observed_door_state: Option<DoorState>,
    pub est_hour: i64,
}

pub struct AccessDecider<'a> {
    policy: &'a AccessPolicy,
}

impl<'a> AccessDecider<'a> {
    pub fn new(policy: &'a AccessPolicy) -> Self {
        Self { policy }
    }

    /// Decide without side effects. A missing code is unrecognized.
    pub fn decide(&self, code: Option<&str>, now: DateTime<Utc>) -> Decision {
        let code = code.unwrap_or_default();
        let policy = self.policy;

        let reason = if policy.is_cleaner_code(code) {
            if !policy.is_cleaner_day(now) {
                Reason::CleanerWrongDay
            } else if policy.within_window(AccessPolicy::est_hour(now)) {
                Reason::CleanerInWindow
            } else {
                Reason::CleanerOutsideWindow
            }
        } else if policy.is_family_code(code) {
            Reason::FamilyCode
        } else {
            Reason::UnrecognizedCode
        };

        let action = match reason {
            Reason::FamilyCode | Reason::CleanerInWindow => Action::ToggleDoor,
            Reason::CleanerOutsideWindow => Action::ForceClose,
            Reason::CleanerWrongDay | Reason::UnrecognizedCode => Action::Deny,
        };

        Decision { action, reason }
    }

    /// Decide, then drive the door through `actuator`.
    ///
    /// Denied codes never reach the actuator.
    pub async fn execute<A: DoorActuator>(
        &self,
        code: Option<&str>,
        now: DateTime<Utc>,
        actuator: &mut A,
    ) -> Result<DecisionOutcome, CoreError> {
        let Decision { action, reason } = self.decide(code, now);
        let est_hour = AccessPolicy::est_hour(now);
        let minute = now.minute();

        let observed_door_state = match reason {
            Reason::CleanerInWindow => {
                let state = actuator.toggle().await?;
                info!(
                    %state,
                    est_hour,
                    minute,
                    reason = reason.description(),
                    "CLEANER: cleaner operated the door"
                );
                Some(state)
            }
            Reason::CleanerOutsideWindow => {
                let state = actuator.check_state().await?;
                actuator.set_state(TargetState::Closed).await?;
                warn!(
                    %state,
                    est_hour,
                    minute,
                    reason = reason.description(),
                    "CLEANER: BAD TIME: cleaner code used outside allowed hours; closing door"
                );
                Some(state)
            }
            Reason::FamilyCode => {
                let state = actuator.check_state().await?;
                actuator.toggle().await?;
                info!(
                    %state,
                    est_hour,
                    minute,
                    reason = reason.description(),
                    "FAMILY: family code used"
                );
                Some(state)
            }
            Reason::CleanerWrongDay => {
                warn!(
                    weekday = %now.format("%A"),
                    reason = reason.description(),
                    "CLEANER: cleaner code used on wrong day"
                );
                None
            }
            Reason::UnrecognizedCode => {
                warn!(
                    code_len = code.map_or(0, str::len),
                    reason = reason.description(),
                    "BAD CODE: unrecognized code used, forbidden"
                );
                None
            }
        };

        Ok(DecisionOutcome {
            action,
            reason,
            observed_door_state,
            est_hour,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Weekday};
    use doorman_api::Error;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    use super::*;

    const CLEANER: &str = "2468";
    const FAMILY: &str = "1357";

    fn policy() -> AccessPolicy {
        AccessPolicy::new(
            SecretString::from(CLEANER.to_owned()),
            SecretString::from(FAMILY.to_owned()),
            Weekday::Thu,
        )
    }

    /// `weekday` counts from Monday (0). 2024-06-03 is a Monday.
    fn at(weekday: u32, utc_hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3 + weekday, utc_hour, 15, 0)
            .unwrap()
    }

    const THURSDAY: u32 = 3;

    // ── Recording actuator ───────────────────────────────────────────

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        CheckState,
        SetState(TargetState),
        Toggle,
    }

    struct Recorder {
        state: DoorState,
        calls: Vec<Call>,
        fail_commands: bool,
    }

    impl Recorder {
        fn new(state: DoorState) -> Self {
            Self {
                state,
                calls: Vec::new(),
                fail_commands: false,
            }
        }
    }

    impl DoorActuator for Recorder {
        async fn check_state(&mut self) -> Result<DoorState, Error> {
            self.calls.push(Call::CheckState);
            Ok(self.state)
        }

        async fn set_state(&mut self, target: TargetState) -> Result<(), Error> {
            self.calls.push(Call::SetState(target));
            if self.fail_commands {
                return Err(Error::Command {
                    status: 500,
                    message: "offline".into(),
                });
            }
            Ok(())
        }

        async fn toggle(&mut self) -> Result<DoorState, Error> {
            self.calls.push(Call::Toggle);
            Ok(self.state)
        }
    }

    // ── Pure decisions ───────────────────────────────────────────────

    #[test]
    fn family_code_toggles_at_every_hour_and_day() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        for weekday in 0..7 {
            for hour in 0..24 {
                let decision = decider.decide(Some(FAMILY), at(weekday, hour));
                assert_eq!(
                    decision,
                    Decision {
                        action: Action::ToggleDoor,
                        reason: Reason::FamilyCode
                    },
                    "weekday {weekday} hour {hour}"
                );
            }
        }
    }

    #[test]
    fn cleaner_code_on_wrong_day_is_denied_at_every_hour() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        for weekday in (0..7).filter(|d| *d != THURSDAY) {
            for hour in 0..24 {
                let decision = decider.decide(Some(CLEANER), at(weekday, hour));
                assert_eq!(decision.action, Action::Deny, "weekday {weekday} hour {hour}");
                assert_eq!(decision.reason, Reason::CleanerWrongDay);
            }
        }
    }

    #[test]
    fn cleaner_code_on_cleaner_day_follows_the_window() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        for hour in 0..24 {
            let est = i64::from(hour) - 5;
            let expected = if 7 < est && est < 17 {
                Action::ToggleDoor
            } else {
                Action::ForceClose
            };
            assert_eq!(
                decider.decide(Some(CLEANER), at(THURSDAY, hour)).action,
                expected,
                "utc hour {hour}"
            );
        }
    }

    #[test]
    fn window_boundaries_force_close() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        // 12:00 UTC is 7 EST, 22:00 UTC is 17 EST.
        assert_eq!(decider.decide(Some(CLEANER), at(THURSDAY, 12)).action, Action::ForceClose);
        assert_eq!(decider.decide(Some(CLEANER), at(THURSDAY, 13)).action, Action::ToggleDoor);
        assert_eq!(decider.decide(Some(CLEANER), at(THURSDAY, 21)).action, Action::ToggleDoor);
        assert_eq!(decider.decide(Some(CLEANER), at(THURSDAY, 22)).action, Action::ForceClose);
    }

    #[test]
    fn other_codes_are_unrecognized() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        let codes = [
            Some(""),
            Some("garbage"),
            Some(" 1357"),
            Some("1357 "),
            Some("13570"),
            Some("2468%20"),
            None,
        ];
        for code in codes {
            for hour in [0, 13, 23] {
                let decision = decider.decide(code, at(THURSDAY, hour));
                assert_eq!(
                    decision,
                    Decision {
                        action: Action::Deny,
                        reason: Reason::UnrecognizedCode
                    },
                    "code {code:?}"
                );
            }
        }
    }

    #[test]
    fn cleaner_rule_wins_when_codes_collide() {
        let p = AccessPolicy::new(
            SecretString::from("same".to_owned()),
            SecretString::from("same".to_owned()),
            Weekday::Thu,
        );
        let decision = AccessDecider::new(&p).decide(Some("same"), at(0, 13));
        assert_eq!(decision.reason, Reason::CleanerWrongDay);
    }

    // ── Execution ────────────────────────────────────────────────────

    #[tokio::test]
    async fn denied_codes_never_touch_the_door() {
        let p = policy();
        let decider = AccessDecider::new(&p);
        let mut door = Recorder::new(DoorState::Closed);

        let outcome = decider
            .execute(Some("garbage"), at(THURSDAY, 13), &mut door)
            .await
            .unwrap();
        assert_eq!(outcome.action, Action::Deny);
        assert_eq!(outcome.observed_door_state, None);

        decider
            .execute(Some(CLEANER), at(0, 13), &mut door)
            .await
            .unwrap();
        assert!(door.calls.is_empty(), "unexpected calls: {:?}", door.calls);
    }

    #[tokio::test]
    async fn family_code_checks_then_toggles() {
        let p = policy();
        let mut door = Recorder::new(DoorState::Closed);

        let outcome = AccessDecider::new(&p)
            .execute(Some(FAMILY), at(6, 3), &mut door)
            .await
            .unwrap();

        assert_eq!(door.calls, vec![Call::CheckState, Call::Toggle]);
        assert_eq!(
            outcome,
            DecisionOutcome {
                action: Action::ToggleDoor,
                reason: Reason::FamilyCode,
                observed_door_state: Some(DoorState::Closed),
                est_hour: -2,
            }
        );
    }

    #[tokio::test]
    async fn cleaner_in_window_toggles() {
        let p = policy();
        let mut door = Recorder::new(DoorState::Open);

        let outcome = AccessDecider::new(&p)
            .execute(Some(CLEANER), at(THURSDAY, 15), &mut door)
            .await
            .unwrap();

        assert_eq!(door.calls, vec![Call::Toggle]);
        assert_eq!(outcome.reason, Reason::CleanerInWindow);
        assert_eq!(outcome.observed_door_state, Some(DoorState::Open));
    }

    #[tokio::test]
    async fn force_close_closes_even_a_closed_door() {
        let p = policy();
        let mut door = Recorder::new(DoorState::Closed);

        let outcome = AccessDecider::new(&p)
            .execute(Some(CLEANER), at(THURSDAY, 23), &mut door)
            .await
            .unwrap();

        assert_eq!(
            door.calls,
            vec![Call::CheckState, Call::SetState(TargetState::Closed)]
        );
        assert_eq!(outcome.action, Action::ForceClose);
        assert_eq!(outcome.observed_door_state, Some(DoorState::Closed));
    }

    #[tokio::test]
    async fn command_failures_propagate() {
        let p = policy();
        let mut door = Recorder::new(DoorState::Open);
        door.fail_commands = true;

        let result = AccessDecider::new(&p)
            .execute(Some(CLEANER), at(THURSDAY, 4), &mut door)
            .await;

        assert!(
            matches!(result, Err(CoreError::CommandFailed { .. })),
            "expected CommandFailed, got {result:?}"
        );
    }

    #[test]
    fn reasons_describe_themselves_for_logs() {
        assert_eq!(Reason::CleanerWrongDay.description(), "cleaner code used on wrong day");
        assert_eq!(Reason::UnrecognizedCode.description(), "unrecognized code");
        assert_eq!(Reason::FamilyCode.to_string(), "family_code");
    }
}
