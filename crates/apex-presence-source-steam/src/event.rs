//! Steam client events as they arrive on the feed.

use apex_presence_core::{PresenceSnapshot, PresenceToken};
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Steam `EResult` for a rejected password.
pub const ERESULT_INVALID_PASSWORD: i32 = 5;

/// One line of the event feed, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SteamEvent {
    /// Login finished. `account_id` is the logged-in user's own account.
    LoggedOn {
        #[serde(default)]
        account_id: Option<u32>,
        #[serde(default)]
        vanity_url: Option<String>,
    },
    /// The account started or stopped playing an app. `playing_app` is 0
    /// when nothing is running.
    PlayingState {
        #[serde(default)]
        blocked: bool,
        playing_app: u32,
    },
    /// Persona update for a user, carrying their rich presence.
    User {
        account_id: u32,
        #[serde(default)]
        rich_presence: Vec<PresenceToken>,
    },
    Disconnected {
        eresult: i32,
        #[serde(default)]
        msg: Option<String>,
    },
    Error {
        eresult: i32,
    },
}

impl SteamEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoggedOn { .. } => "logged_on",
            Self::PlayingState { .. } => "playing_state",
            Self::User { .. } => "user",
            Self::Disconnected { .. } => "disconnected",
            Self::Error { .. } => "error",
        }
    }
}

/// Parse one feed line.
pub fn parse_line(line: &str) -> Result<SteamEvent, SourceError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Build the engine snapshot from a rich-presence list.
pub fn to_snapshot(rich_presence: Vec<PresenceToken>) -> PresenceSnapshot {
    PresenceSnapshot::from_tokens(rich_presence)
}
