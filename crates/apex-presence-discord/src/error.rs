//! Error types for the Discord IPC client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("discord ipc io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid discord ipc payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("discord did not answer within the ipc timeout")]
    Timeout,

    #[error("discord is not running (tried {tried} ipc paths)")]
    NotRunning { tried: usize },

    #[error("unknown ipc opcode {0}")]
    UnknownOpcode(u32),

    #[error("ipc frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("ipc handshake failed: {0}")]
    Handshake(String),

    #[error("discord closed the connection ({code}): {message}")]
    Closed { code: i64, message: String },

    #[error("discord rejected {cmd} ({code}): {message}")]
    Rejected {
        cmd: String,
        code: i64,
        message: String,
    },
}
