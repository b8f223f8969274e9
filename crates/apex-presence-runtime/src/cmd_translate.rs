//! `translate` command: one snapshot in, one activity payload out.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use apex_presence_core::{ActivityPayload, PresenceSnapshot, PresenceToken, SessionState, translate};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Accepted snapshot encodings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotInput {
    Map(BTreeMap<String, String>),
    List(Vec<PresenceToken>),
}

impl From<SnapshotInput> for PresenceSnapshot {
    fn from(input: SnapshotInput) -> Self {
        match input {
            SnapshotInput::Map(map) => PresenceSnapshot::from_pairs(map),
            SnapshotInput::List(tokens) => PresenceSnapshot::from_tokens(tokens),
        }
    }
}

pub fn parse_snapshot(raw: &str) -> anyhow::Result<PresenceSnapshot> {
    let input: SnapshotInput =
        serde_json::from_str(raw).context("snapshot must be a JSON object or key/value list")?;
    Ok(input.into())
}

/// Translate from a fresh session, as if this were the first snapshot seen.
pub fn translate_raw(raw: &str, now: DateTime<Utc>) -> anyhow::Result<ActivityPayload> {
    let snapshot = parse_snapshot(raw)?;
    Ok(translate(SessionState::new(), &snapshot, now).payload)
}

pub fn cmd_translate(file: Option<&Path>) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed reading stdin")?;
            buf
        }
    };
    let payload = translate_raw(&raw, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
