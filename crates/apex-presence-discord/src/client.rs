//! ActivityPublisher trait and IpcClient (sync Discord RPC over local IPC).

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use apex_presence_core::ActivityPayload;
use serde_json::{Value, json};

use crate::activity::DiscordActivity;
use crate::error::DiscordError;
use crate::frame::{Frame, Opcode, read_frame, write_frame};

const RPC_VERSION: u32 = 1;
const IPC_SLOTS: u32 = 10;
const CMD_SET_ACTIVITY: &str = "SET_ACTIVITY";
/// Socket read/write limit; a silent Discord surfaces as `Timeout`.
pub const IPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Sink for composed activities. Enables mock injection for testing.
pub trait ActivityPublisher {
    fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError>;
    fn clear(&mut self) -> Result<(), DiscordError>;
}

impl<T: ActivityPublisher + ?Sized> ActivityPublisher for &mut T {
    fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError> {
        (**self).publish(payload)
    }

    fn clear(&mut self) -> Result<(), DiscordError> {
        (**self).clear()
    }
}

impl<T: ActivityPublisher + ?Sized> ActivityPublisher for Box<T> {
    fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError> {
        (**self).publish(payload)
    }

    fn clear(&mut self) -> Result<(), DiscordError> {
        (**self).clear()
    }
}

/// IPC endpoints Discord may be listening on, in probe order.
///
/// `env` resolves environment variables; it is a parameter so tests do not
/// depend on the process environment.
pub fn candidate_paths(env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    if cfg!(windows) {
        return (0..IPC_SLOTS)
            .map(|i| PathBuf::from(format!(r"\\.\pipe\discord-ipc-{i}")))
            .collect();
    }

    let mut dirs: Vec<PathBuf> = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .filter_map(|var| env(var))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect();
    dirs.push(PathBuf::from("/tmp"));
    dirs.dedup();

    dirs.iter()
        .flat_map(|dir| (0..IPC_SLOTS).map(move |i| dir.join(format!("discord-ipc-{i}"))))
        .collect()
}

#[cfg(unix)]
pub type IpcStream = std::os::unix::net::UnixStream;
#[cfg(windows)]
pub type IpcStream = std::fs::File;

#[cfg(unix)]
fn open_stream(path: &Path) -> std::io::Result<IpcStream> {
    let stream = IpcStream::connect(path)?;
    stream.set_read_timeout(Some(IPC_TIMEOUT))?;
    stream.set_write_timeout(Some(IPC_TIMEOUT))?;
    Ok(stream)
}

// Named pipes opened as files have no timeout knob.
#[cfg(windows)]
fn open_stream(path: &Path) -> std::io::Result<IpcStream> {
    std::fs::OpenOptions::new().read(true).write(true).open(path)
}

/// Discord RPC client over any byte stream.
pub struct IpcClient<S> {
    stream: S,
    pid: u32,
    next_nonce: u64,
}

#[cfg(any(unix, windows))]
impl IpcClient<IpcStream> {
    /// Connect and handshake. An explicit `path` skips discovery.
    pub fn connect(client_id: &str, path: Option<&Path>) -> Result<Self, DiscordError> {
        let candidates = match path {
            Some(p) => vec![p.to_path_buf()],
            None => candidate_paths(|var| std::env::var(var).ok()),
        };

        for candidate in &candidates {
            match open_stream(candidate) {
                Ok(stream) => {
                    tracing::debug!("connected to discord ipc at {}", candidate.display());
                    let mut client = Self::new(stream, std::process::id());
                    client.handshake(client_id)?;
                    return Ok(client);
                }
                Err(e) => tracing::trace!("discord ipc {} unavailable: {e}", candidate.display()),
            }
        }

        Err(DiscordError::NotRunning {
            tried: candidates.len(),
        })
    }
}

impl<S: Read + Write> IpcClient<S> {
    pub fn new(stream: S, pid: u32) -> Self {
        Self {
            stream,
            pid,
            next_nonce: 1,
        }
    }

    /// Send the version handshake and wait for the READY dispatch.
    pub fn handshake(&mut self, client_id: &str) -> Result<Value, DiscordError> {
        write_frame(
            &mut self.stream,
            &Frame::new(
                Opcode::Handshake,
                json!({"v": RPC_VERSION, "client_id": client_id}),
            ),
        )
        .map_err(timeout_as_error)?;

        let reply = self.read_reply()?;
        match reply.body.get("evt").and_then(Value::as_str) {
            Some("READY") => {
                let user = reply.body["data"]["user"]["username"]
                    .as_str()
                    .unwrap_or("unknown");
                tracing::info!("discord rpc ready (user: {user})");
                Ok(reply.body)
            }
            other => Err(DiscordError::Handshake(format!(
                "expected READY, got {}",
                other.unwrap_or("no event")
            ))),
        }
    }

    /// Send a command and wait for the reply carrying the same nonce.
    pub fn request(&mut self, cmd: &str, args: Value) -> Result<Value, DiscordError> {
        let nonce = self.next_nonce.to_string();
        self.next_nonce += 1;

        write_frame(
            &mut self.stream,
            &Frame::new(
                Opcode::Frame,
                json!({"cmd": cmd, "args": args, "nonce": nonce}),
            ),
        )
        .map_err(timeout_as_error)?;

        loop {
            let reply = self.read_reply()?;
            if reply.body.get("nonce").and_then(Value::as_str) != Some(nonce.as_str()) {
                tracing::debug!("skipping unrelated discord frame: {}", reply.body);
                continue;
            }
            if reply.body.get("evt").and_then(Value::as_str) == Some("ERROR") {
                let (code, message) = error_fields(&reply.body["data"]);
                return Err(DiscordError::Rejected {
                    cmd: cmd.to_owned(),
                    code,
                    message,
                });
            }
            return Ok(reply.body);
        }
    }

    /// Next data frame; answers pings and surfaces close frames as errors.
    fn read_reply(&mut self) -> Result<Frame, DiscordError> {
        loop {
            let frame = read_frame(&mut self.stream).map_err(timeout_as_error)?;
            match frame.opcode {
                Opcode::Ping => {
                    write_frame(&mut self.stream, &Frame::new(Opcode::Pong, frame.body))
                        .map_err(timeout_as_error)?;
                }
                Opcode::Pong => {}
                Opcode::Close => {
                    let (code, message) = error_fields(&frame.body);
                    return Err(DiscordError::Closed { code, message });
                }
                Opcode::Frame | Opcode::Handshake => return Ok(frame),
            }
        }
    }
}

impl<S: Read + Write> ActivityPublisher for IpcClient<S> {
    fn publish(&mut self, payload: &ActivityPayload) -> Result<(), DiscordError> {
        let activity = DiscordActivity::from(payload);
        self.request(
            CMD_SET_ACTIVITY,
            json!({"pid": self.pid, "activity": activity}),
        )?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DiscordError> {
        self.request(CMD_SET_ACTIVITY, json!({"pid": self.pid}))?;
        Ok(())
    }
}

/// Socket timeouts report as `WouldBlock` on unix and `TimedOut` elsewhere.
fn timeout_as_error(err: DiscordError) -> DiscordError {
    match err {
        DiscordError::Io(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            DiscordError::Timeout
        }
        other => other,
    }
}

fn error_fields(data: &Value) -> (i64, String) {
    (
        data.get("code").and_then(Value::as_i64).unwrap_or(0),
        data.get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_owned(),
    )
}
