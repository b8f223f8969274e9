//! Per-tick pipeline: classify, advance the session, compose.

use chrono::{DateTime, Utc};

use crate::classify::classify;
use crate::compose::compose;
use crate::snapshot::PresenceSnapshot;
use crate::types::{ActivityPayload, PresentationState, SessionState};

/// Output of one translation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub state: PresentationState,
    pub payload: ActivityPayload,
    pub session: SessionState,
}

/// Translate one snapshot given the previous session. Pure.
pub fn translate(
    previous: SessionState,
    snapshot: &PresenceSnapshot,
    now: DateTime<Utc>,
) -> Translation {
    let classification = classify(previous, snapshot, now);
    let payload = compose(&classification.state, snapshot, &classification.session);
    Translation {
        state: classification.state,
        payload,
        session: classification.session,
    }
}

/// Owns the session between ticks. Snapshots must be fed serially.
#[derive(Debug, Clone, Default)]
pub struct PresenceEngine {
    session: SessionState,
}

impl PresenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Drop the session, e.g. when the game stops.
    pub fn reset(&mut self) {
        self.session = SessionState::default();
    }

    pub fn process(
        &mut self,
        snapshot: &PresenceSnapshot,
        now: DateTime<Utc>,
    ) -> ActivityPayload {
        let translation = translate(self.session, snapshot, now);
        tracing::debug!(
            state = ?translation.state,
            phase = ?translation.session.phase,
            details = %translation.payload.details,
            "translated presence"
        );
        self.session = translation.session;
        translation.payload
    }
}
