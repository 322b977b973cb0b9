//! Autopilot: the polling-driven recurring session trigger.
//!
//! The scheduler owns no timer. An external caller polls `tick`, and the
//! decision whether to run is made from the persisted [`AutopilotConfig`]
//! alone.

use crate::core::error::DomainError;
use crate::session::entities::SessionType;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_INTERVAL_MINUTES: u32 = 15;
pub const MAX_INTERVAL_MINUTES: u32 = 7 * 24 * 60;
pub const DEFAULT_INTERVAL_MINUTES: u32 = 240;
/// How long a tick may hold the run lease before others may take over
pub const LEASE_MINUTES: i64 = 10;

/// Process-wide autopilot state (singleton record)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutopilotConfig {
    pub enabled: bool,
    pub interval_minutes: u32,
    pub type_rotation: Vec<SessionType>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
    pub sessions_run: u64,
    pub current_type_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease: Option<TickLease>,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            type_rotation: SessionType::ALL.to_vec(),
            last_run_at: None,
            next_run_at: None,
            sessions_run: 0,
            current_type_index: 0,
            lease: None,
        }
    }
}

/// Run lease held by the tick that is currently running a session. Written
/// then read back; without a compare-and-swap store it narrows, not closes,
/// the window for overlapping runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickLease {
    pub token: String,
    pub until: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disabled,
    NotYet,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickDecision {
    Skip {
        reason: SkipReason,
        remaining: Option<Duration>,
    },
    Run(SessionType),
}

impl AutopilotConfig {
    /// Decide what a tick at `now` should do. Pure; no side effects.
    pub fn decide(&self, now: DateTime<Utc>) -> TickDecision {
        if !self.enabled || self.type_rotation.is_empty() {
            return TickDecision::Skip {
                reason: SkipReason::Disabled,
                remaining: None,
            };
        }
        if let Some(next) = self.next_run_at
            && now < next
        {
            return TickDecision::Skip {
                reason: SkipReason::NotYet,
                remaining: Some(next - now),
            };
        }
        if let Some(lease) = &self.lease
            && now < lease.until
        {
            return TickDecision::Skip {
                reason: SkipReason::Busy,
                remaining: Some(lease.until - now),
            };
        }
        TickDecision::Run(self.current_type())
    }

    pub fn current_type(&self) -> SessionType {
        self.type_rotation
            .get(self.current_type_index % self.type_rotation.len().max(1))
            .copied()
            .unwrap_or(SessionType::Brainstorm)
    }

    pub fn acquire_lease(&mut self, token: impl Into<String>, now: DateTime<Utc>) {
        self.lease = Some(TickLease {
            token: token.into(),
            until: now + Duration::minutes(LEASE_MINUTES),
        });
    }

    pub fn holds_lease(&self, token: &str) -> bool {
        self.lease.as_ref().is_some_and(|l| l.token == token)
    }

    /// Bookkeeping after one successful run
    pub fn advance(&mut self, now: DateTime<Utc>) {
        let len = self.type_rotation.len().max(1);
        self.current_type_index = (self.current_type_index + 1) % len;
        self.last_run_at = Some(now);
        self.next_run_at = Some(now + Duration::minutes(i64::from(self.interval_minutes)));
        self.sessions_run += 1;
        self.lease = None;
    }

    pub fn apply_patch(
        &mut self,
        patch: &AutopilotPatch,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if let Some(rotation) = &patch.type_rotation {
            if rotation.is_empty() {
                return Err(DomainError::InvalidInput(
                    "typeRotation must name at least one session type".into(),
                ));
            }
            self.type_rotation = rotation.clone();
            self.current_type_index %= rotation.len();
        }
        if let Some(minutes) = patch.interval_minutes {
            let clamped = minutes.clamp(
                u64::from(MIN_INTERVAL_MINUTES),
                u64::from(MAX_INTERVAL_MINUTES),
            );
            self.interval_minutes = clamped as u32;
        }
        if let Some(enabled) = patch.enabled {
            if enabled && !self.enabled && self.next_run_at.is_none() {
                self.next_run_at = Some(now);
            }
            self.enabled = enabled;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutopilotPatch {
    pub enabled: Option<bool>,
    pub interval_minutes: Option<u64>,
    pub type_rotation: Option<Vec<SessionType>>,
}

/// Result of one `tick`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub triggered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    pub next_run_at: Option<DateTime<Utc>>,
}

impl TickOutcome {
    pub fn skipped(
        reason: SkipReason,
        remaining: Option<Duration>,
        next_run_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            triggered: false,
            reason: Some(reason),
            remaining_seconds: remaining.map(|d| d.num_seconds()),
            session_id: None,
            session_type: None,
            next_run_at,
        }
    }

    pub fn triggered(
        session_id: impl Into<String>,
        session_type: SessionType,
        next_run_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            triggered: true,
            reason: None,
            remaining_seconds: None,
            session_id: Some(session_id.into()),
            session_type: Some(session_type),
            next_run_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_at(now: DateTime<Utc>) -> AutopilotConfig {
        let mut cfg = AutopilotConfig::default();
        cfg.apply_patch(
            &AutopilotPatch {
                enabled: Some(true),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        cfg
    }

    #[test]
    fn disabled_by_default() {
        let cfg = AutopilotConfig::default();
        assert!(matches!(
            cfg.decide(Utc::now()),
            TickDecision::Skip {
                reason: SkipReason::Disabled,
                ..
            }
        ));
    }

    #[test]
    fn enabling_schedules_immediate_run() {
        let now = Utc::now();
        let cfg = enabled_at(now);
        assert_eq!(cfg.next_run_at, Some(now));
        assert_eq!(cfg.decide(now), TickDecision::Run(SessionType::Brainstorm));
    }

    #[test]
    fn not_yet_reports_remaining_time() {
        let now = Utc::now();
        let mut cfg = enabled_at(now);
        cfg.next_run_at = Some(now + Duration::minutes(5));
        match cfg.decide(now) {
            TickDecision::Skip {
                reason: SkipReason::NotYet,
                remaining: Some(remaining),
            } => assert_eq!(remaining.num_minutes(), 5),
            other => panic!("unexpected decision {other:?}"),
        }
    }

    #[test]
    fn advance_rotates_and_reschedules() {
        let now = Utc::now();
        let mut cfg = enabled_at(now);
        cfg.type_rotation = vec![SessionType::News, SessionType::Review];
        cfg.current_type_index = 1;
        cfg.acquire_lease("tok", now);
        cfg.advance(now);
        assert_eq!(cfg.current_type_index, 0);
        assert_eq!(cfg.sessions_run, 1);
        assert_eq!(cfg.last_run_at, Some(now));
        assert_eq!(
            cfg.next_run_at,
            Some(now + Duration::minutes(i64::from(DEFAULT_INTERVAL_MINUTES)))
        );
        assert!(cfg.lease.is_none());
    }

    #[test]
    fn live_lease_makes_tick_busy() {
        let now = Utc::now();
        let mut cfg = enabled_at(now);
        cfg.acquire_lease("other", now);
        assert!(matches!(
            cfg.decide(now + Duration::minutes(1)),
            TickDecision::Skip {
                reason: SkipReason::Busy,
                ..
            }
        ));
        // An expired lease is ignored
        assert!(matches!(
            cfg.decide(now + Duration::minutes(LEASE_MINUTES + 1)),
            TickDecision::Run(_)
        ));
    }

    #[test]
    fn patch_clamps_interval_and_rejects_empty_rotation() {
        let now = Utc::now();
        let mut cfg = AutopilotConfig::default();
        cfg.apply_patch(
            &AutopilotPatch {
                interval_minutes: Some(1),
                ..Default::default()
            },
            now,
        )
        .unwrap();
        assert_eq!(cfg.interval_minutes, MIN_INTERVAL_MINUTES);

        let err = cfg.apply_patch(
            &AutopilotPatch {
                type_rotation: Some(vec![]),
                ..Default::default()
            },
            now,
        );
        assert!(err.is_err());
    }

    #[test]
    fn skip_reason_wire_names() {
        let outcome = TickOutcome::skipped(SkipReason::NotYet, Some(Duration::seconds(90)), None);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["triggered"], false);
        assert_eq!(json["reason"], "not_yet");
        assert_eq!(json["remainingSeconds"], 90);
    }
}
