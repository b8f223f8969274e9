//! Snapshot classification and session timer transitions.
//!
//! Classification is a pure function of the snapshot and the previous
//! [`SessionState`]; the caller owns the state and feeds the returned value
//! into the next tick.

use chrono::{DateTime, Utc};

use crate::snapshot::{PresenceSnapshot, keys};
use crate::types::{MatchPhase, PresentationState, SessionState, Status};

/// Result of classifying one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: PresentationState,
    pub session: SessionState,
}

/// Phase transition for an in-activity status.
///
/// | previous        | squads left | base short      | range/training | other     |
/// |-----------------|-------------|-----------------|----------------|-----------|
/// | Idle            | SquadsLeft  | LegendSelection | Idle           | unchanged |
/// | LegendSelection | SquadsLeft  | LegendSelection | Idle           | unchanged |
/// | SquadsLeft      | SquadsLeft  | Epilogue        | Idle           | unchanged |
/// | Epilogue        | SquadsLeft  | Epilogue        | Idle           | unchanged |
///
/// The base code is seen at legend selection and again, repeatedly, once
/// the match is over. Leaving the match family returns to `Idle`.
pub fn next_phase(previous: MatchPhase, status: &Status) -> MatchPhase {
    match (status, previous) {
        (Status::SquadsLeft, _) => MatchPhase::SquadsLeft,
        (Status::MultiplayerShort, MatchPhase::Idle | MatchPhase::LegendSelection) => {
            MatchPhase::LegendSelection
        }
        (Status::MultiplayerShort, MatchPhase::SquadsLeft | MatchPhase::Epilogue) => {
            MatchPhase::Epilogue
        }
        (s, _) if !s.is_multiplayer() => MatchPhase::Idle,
        _ => previous,
    }
}

/// Advance the session for this tick.
///
/// An in-activity status starts the timer (if idle) and advances the phase.
/// Anything else resets the session.
pub fn advance_session(
    previous: SessionState,
    status: Option<&Status>,
    now: DateTime<Utc>,
) -> SessionState {
    match status {
        Some(status) if status.is_in_activity() => SessionState {
            started_at: previous.started_at.or(Some(now)),
            phase: next_phase(previous.phase, status),
        },
        _ => SessionState::default(),
    }
}

/// Pick the display template for a snapshot.
pub fn presentation_state(
    snapshot: &PresenceSnapshot,
    status: Option<&Status>,
) -> PresentationState {
    let Some(status) = status else {
        // No status: main menu until Steam reports a group id, which
        // happens while the match loads.
        let has_group_size = snapshot.contains(keys::GROUP_SIZE);
        return if has_group_size && snapshot.has_group() {
            PresentationState::Loading
        } else {
            PresentationState::MainMenu
        };
    };

    match status {
        Status::FiringRange => PresentationState::FiringRange,
        s if s.is_multiplayer() => PresentationState::MatchActive,
        other => PresentationState::UnknownStatus(other.as_token().to_owned()),
    }
}

/// Classify a snapshot against the previous session state.
pub fn classify(
    previous: SessionState,
    snapshot: &PresenceSnapshot,
    now: DateTime<Utc>,
) -> Classification {
    let status = snapshot.status();
    Classification {
        state: presentation_state(snapshot, status.as_ref()),
        session: advance_session(previous, status.as_ref(), now),
    }
}
