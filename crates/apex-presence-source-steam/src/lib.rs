//! apex-presence-source-steam: Steam client event feed.
//! Parses the newline-delimited event stream written by the Steam session
//! helper and decides which events reach the presence engine.

pub mod error;
pub mod event;
pub mod source;

pub use error::SourceError;
pub use event::{SteamEvent, parse_line};
pub use source::{SourceAction, SourceConfig, SourceState};
