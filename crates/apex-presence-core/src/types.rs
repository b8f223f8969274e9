use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Status ───────────────────────────────────────────────────────

pub const STATUS_FIRING_RANGE: &str = "#PL_FIRINGRANGE";
pub const STATUS_TRAINING: &str = "#PL_TRAINING";
pub const STATUS_MULTIPLAYER: &str = "#RICHPRESENCE_PLAYING_MULTIPLAYER";
pub const STATUS_MULTIPLAYER_SHORT: &str = "#RICHPRESENCE_PLAYING_MULTIPLAYER_SHORT";
pub const STATUS_MULTIPLAYER_SHORTPLUS: &str = "#RICHPRESENCE_PLAYING_MULTIPLAYER_SHORTPLUS";
pub const STATUS_SQUADS_LEFT: &str = "#RICHPRESENCE_PLAYING_MULTIPLAYER_SQUADSLEFT";
pub const STATUS_TEAM_SCORE: &str = "#RICHPRESENCE_PLAYING_MULTIPLAYER_TEAMSCORE";

/// The `status` presence token, resolved once at ingest.
///
/// Every token outside the known activity set is carried verbatim in
/// [`Status::Other`] so the composer can still try the label table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    FiringRange,
    Training,
    Multiplayer,
    /// Base multiplayer code; drives the legend-selection/epilogue phase.
    MultiplayerShort,
    MultiplayerShortPlus,
    SquadsLeft,
    TeamScore,
    Other(String),
}

impl Status {
    /// Resolve a raw status token. Matching is exact, as Steam emits it.
    pub fn parse(token: &str) -> Self {
        match token {
            STATUS_FIRING_RANGE => Self::FiringRange,
            STATUS_TRAINING => Self::Training,
            STATUS_MULTIPLAYER => Self::Multiplayer,
            STATUS_MULTIPLAYER_SHORT => Self::MultiplayerShort,
            STATUS_MULTIPLAYER_SHORTPLUS => Self::MultiplayerShortPlus,
            STATUS_SQUADS_LEFT => Self::SquadsLeft,
            STATUS_TEAM_SCORE => Self::TeamScore,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_token(&self) -> &str {
        match self {
            Self::FiringRange => STATUS_FIRING_RANGE,
            Self::Training => STATUS_TRAINING,
            Self::Multiplayer => STATUS_MULTIPLAYER,
            Self::MultiplayerShort => STATUS_MULTIPLAYER_SHORT,
            Self::MultiplayerShortPlus => STATUS_MULTIPLAYER_SHORTPLUS,
            Self::SquadsLeft => STATUS_SQUADS_LEFT,
            Self::TeamScore => STATUS_TEAM_SCORE,
            Self::Other(raw) => raw,
        }
    }

    /// Statuses that keep the session timer running.
    pub fn is_in_activity(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Statuses rendered as a match line (`<mode>: <map>`).
    pub fn is_multiplayer(&self) -> bool {
        matches!(
            self,
            Self::Multiplayer
                | Self::MultiplayerShort
                | Self::MultiplayerShortPlus
                | Self::SquadsLeft
                | Self::TeamScore
        )
    }
}

// ─── Match phase & session ────────────────────────────────────────

/// Sub-stage of a multiplayer match that the title suffix reflects.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// No match seen yet this session. Renders like `Epilogue`.
    #[default]
    Idle,
    LegendSelection,
    SquadsLeft,
    /// The match is over; sticky until the session resets.
    Epilogue,
}

/// Session timer state threaded through the classifier between ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// When the current in-activity stretch began. `None` when idle.
    pub started_at: Option<DateTime<Utc>>,
    pub phase: MatchPhase,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

// ─── Presentation ─────────────────────────────────────────────────

/// Which display template applies to the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationState {
    MainMenu,
    Loading,
    FiringRange,
    MatchActive,
    /// Any status outside the firing range and multiplayer family,
    /// carrying the raw token.
    UnknownStatus(String),
}

// ─── Output ───────────────────────────────────────────────────────

/// Activity handed to the overlay publisher.
///
/// `party_size` and `party_max` are either both set or both absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    pub details: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<DateTime<Utc>>,
    pub large_image_key: String,
    pub instance: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_max: Option<u32>,
}
