//! Per-tick view of a user's rich presence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Status;

/// Presence keys the engine interprets. Everything else is ignored.
pub mod keys {
    pub const STATUS: &str = "status";
    pub const GROUP_SIZE: &str = "steam_player_group_size";
    pub const GROUP: &str = "steam_player_group";
    pub const GAME_MODE: &str = "gamemode";
    pub const LEVEL: &str = "level";
    pub const SQUADS_LEFT: &str = "squadsleft";
    pub const FRIENDLY_SCORE: &str = "friendlyscore";
    pub const ENEMY_SCORE: &str = "enemyscore";
}

/// One rich-presence key/value pair as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceToken {
    pub key: String,
    pub value: String,
}

impl PresenceToken {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Immutable snapshot keyed by lower-cased key.
///
/// Blank values are dropped on ingest, so a key present with an empty
/// value behaves as absent. When a key repeats, the first non-blank
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    tokens: BTreeMap<String, PresenceToken>,
}

impl PresenceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tokens(tokens: impl IntoIterator<Item = PresenceToken>) -> Self {
        let mut map = BTreeMap::new();
        for token in tokens {
            if token.value.trim().is_empty() {
                continue;
            }
            map.entry(token.key.to_ascii_lowercase()).or_insert(token);
        }
        Self { tokens: map }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_tokens(
            pairs
                .into_iter()
                .map(|(key, value)| PresenceToken::new(key, value)),
        )
    }

    /// Value for `key`, looked up case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens
            .get(&key.to_ascii_lowercase())
            .map(|token| token.value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &PresenceToken> {
        self.tokens.values()
    }

    pub fn status(&self) -> Option<Status> {
        self.get(keys::STATUS).map(Status::parse)
    }

    /// Party size. A non-numeric value is logged and treated as absent.
    pub fn group_size(&self) -> Option<u32> {
        let raw = self.get(keys::GROUP_SIZE)?;
        match raw.trim().parse::<u32>() {
            Ok(size) => Some(size),
            Err(_) => {
                tracing::warn!("ignoring non-numeric {}: {raw:?}", keys::GROUP_SIZE);
                None
            }
        }
    }

    pub fn has_group(&self) -> bool {
        self.contains(keys::GROUP)
    }

    pub fn game_mode(&self) -> Option<&str> {
        self.get(keys::GAME_MODE)
    }

    pub fn level(&self) -> Option<&str> {
        self.get(keys::LEVEL)
    }

    pub fn squads_left(&self) -> Option<&str> {
        self.get(keys::SQUADS_LEFT)
    }

    /// `(friendly, enemy)` only when both scores are reported.
    pub fn team_score(&self) -> Option<(&str, &str)> {
        Some((self.get(keys::FRIENDLY_SCORE)?, self.get(keys::ENEMY_SCORE)?))
    }
}

impl FromIterator<PresenceToken> for PresenceSnapshot {
    fn from_iter<I: IntoIterator<Item = PresenceToken>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}
