//! Conversion from the engine payload to Discord's activity object.

use apex_presence_core::ActivityPayload;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscordActivity {
    pub details: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
    pub assets: Assets,
    pub instance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<Party>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timestamps {
    /// Unix seconds.
    pub start: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assets {
    pub large_image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    /// `[current, max]`.
    pub size: [u32; 2],
}

impl From<&ActivityPayload> for DiscordActivity {
    fn from(payload: &ActivityPayload) -> Self {
        let party = match (payload.party_size, payload.party_max) {
            (Some(size), Some(max)) => Some(Party { size: [size, max] }),
            _ => None,
        };
        Self {
            details: payload.details.clone(),
            state: payload.state.clone(),
            timestamps: payload.start_timestamp.map(|ts| Timestamps {
                start: ts.timestamp(),
            }),
            assets: Assets {
                large_image: payload.large_image_key.clone(),
            },
            instance: payload.instance,
            party,
        }
    }
}
