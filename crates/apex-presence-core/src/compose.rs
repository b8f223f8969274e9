//! Build the overlay activity for a classified snapshot.

use crate::normalize::normalize;
use crate::snapshot::{PresenceSnapshot, keys};
use crate::tables::{
    DEFAULT_ICON, FIRING_RANGE_ALONE_KEY, FIRING_RANGE_ICON, FIRING_RANGE_PARTY_KEY,
    LOADING_SCREEN_KEY, MAIN_MENU_KEY, PARTY_MAX, UNKNOWN_MAP_LABEL, UNKNOWN_MODE_LABEL,
    UNRECOGNIZED_STATUS_LABEL, lookup_icon, lookup_label, lookup_map_label,
};
use crate::types::{ActivityPayload, MatchPhase, PresentationState, SessionState};

const STATE_IN_PARTY: &str = "In the party";
const STATE_ALONE: &str = "In the party alone";
const STATE_NO_PARTY: &str = "Not joining any party";

/// Compose the payload for one tick. Never fails: every miss degrades to a
/// placeholder plus a warning.
pub fn compose(
    state: &PresentationState,
    snapshot: &PresenceSnapshot,
    session: &SessionState,
) -> ActivityPayload {
    let group_size = snapshot.group_size();

    let (details, icon) = match state {
        PresentationState::MainMenu => (sentinel(MAIN_MENU_KEY), DEFAULT_ICON),
        PresentationState::Loading => (sentinel(LOADING_SCREEN_KEY), DEFAULT_ICON),
        PresentationState::FiringRange => {
            let key = if group_size.is_some_and(|n| n > 1) {
                FIRING_RANGE_PARTY_KEY
            } else {
                FIRING_RANGE_ALONE_KEY
            };
            (sentinel(key), FIRING_RANGE_ICON)
        }
        PresentationState::MatchActive => match_details(snapshot, session.phase),
        PresentationState::UnknownStatus(raw) => {
            (unknown_status_details(raw, snapshot), DEFAULT_ICON)
        }
    };

    let (party_state, party_size, party_max) = match group_size {
        Some(size) => {
            let line = if size > 1 { STATE_IN_PARTY } else { STATE_ALONE };
            (line, Some(size), Some(PARTY_MAX))
        }
        None => (STATE_NO_PARTY, None, None),
    };

    ActivityPayload {
        details,
        state: party_state.to_owned(),
        start_timestamp: session.started_at,
        large_image_key: icon.to_owned(),
        instance: false,
        party_size,
        party_max,
    }
}

fn sentinel(key: &str) -> String {
    lookup_label(key).unwrap_or(UNRECOGNIZED_STATUS_LABEL).to_owned()
}

/// `"<mode>: <map>"` plus phase and score suffixes, with the map's icon.
fn match_details(snapshot: &PresenceSnapshot, phase: MatchPhase) -> (String, &'static str) {
    let mode = match snapshot.game_mode() {
        Some(raw) => lookup_label(raw).unwrap_or_else(|| {
            tracing::warn!("unknown game mode: {raw}");
            UNKNOWN_MODE_LABEL
        }),
        None => {
            tracing::warn!("match status without a game mode");
            UNKNOWN_MODE_LABEL
        }
    };

    let map_id = snapshot.level().map(normalize);
    let map = match (snapshot.level(), map_id.as_deref()) {
        (Some(raw), Some(id)) => lookup_map_label(id).unwrap_or_else(|| {
            tracing::warn!("unknown map: {raw} (normalized: {id})");
            UNKNOWN_MAP_LABEL
        }),
        _ => {
            tracing::warn!("match status without a level");
            UNKNOWN_MAP_LABEL
        }
    };

    let mut details = format!("{mode}: {map}");
    match phase {
        MatchPhase::SquadsLeft => {
            if let Some(squads) = snapshot.squads_left() {
                details.push_str(&format!(" ({squads} Squads Left)"));
            }
        }
        MatchPhase::LegendSelection => details.push_str(" (Legend Selection)"),
        MatchPhase::Idle | MatchPhase::Epilogue => details.push_str(" (Epilogue)"),
    }

    match snapshot.team_score() {
        Some((friendly, enemy)) => details.push_str(&format!(" ({friendly} - {enemy})")),
        None => {
            let friendly = snapshot.get(keys::FRIENDLY_SCORE);
            let enemy = snapshot.get(keys::ENEMY_SCORE);
            if friendly.is_some() || enemy.is_some() {
                tracing::warn!(
                    "incomplete team score (friendly={friendly:?}, enemy={enemy:?}); suffix omitted"
                );
            }
        }
    }

    let icon = map_id.as_deref().and_then(lookup_icon).unwrap_or(DEFAULT_ICON);
    (details, icon)
}

fn unknown_status_details(raw: &str, snapshot: &PresenceSnapshot) -> String {
    match lookup_label(raw) {
        Some(label) => label.to_owned(),
        None => {
            tracing::warn!(
                status = raw,
                snapshot = ?snapshot,
                "unrecognized status; report this snapshot so it can be curated"
            );
            UNRECOGNIZED_STATUS_LABEL.to_owned()
        }
    }
}
