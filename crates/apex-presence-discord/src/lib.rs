//! apex-presence-discord: Discord RPC IO boundary.
//! Local IPC framing, the SET_ACTIVITY client, and the publisher trait the
//! bridge talks to. No presence logic.

pub mod activity;
pub mod client;
pub mod error;
pub mod frame;

pub use activity::DiscordActivity;
pub use client::{ActivityPublisher, IpcClient, IpcStream, candidate_paths};
pub use error::DiscordError;
pub use frame::{Frame, Opcode};
