//! apex-presence-core: presence translation engine.
//! Turns an Apex Legends rich-presence snapshot from Steam into the
//! activity shown on Discord. Pure: no IO, no async.

pub mod classify;
pub mod compose;
pub mod engine;
pub mod normalize;
pub mod snapshot;
pub mod tables;
pub mod types;

pub use engine::{PresenceEngine, Translation, translate};
pub use normalize::normalize;
pub use snapshot::{PresenceSnapshot, PresenceToken};
pub use types::{ActivityPayload, MatchPhase, PresentationState, SessionState, Status};
