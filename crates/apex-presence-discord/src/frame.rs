//! IPC frame codec.
//!
//! Each frame is an 8-byte header (little-endian `u32` opcode, then
//! little-endian `u32` body length) followed by a JSON body.

use std::io::{Read, Write};

use serde_json::Value;

use crate::error::DiscordError;

pub const HEADER_LEN: usize = 8;
/// Upper bound on a body we are willing to read or write.
pub const MAX_BODY_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl TryFrom<u32> for Opcode {
    type Error = DiscordError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Handshake),
            1 => Ok(Self::Frame),
            2 => Ok(Self::Close),
            3 => Ok(Self::Ping),
            4 => Ok(Self::Pong),
            other => Err(DiscordError::UnknownOpcode(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub opcode: Opcode,
    pub body: Value,
}

impl Frame {
    pub fn new(opcode: Opcode, body: Value) -> Self {
        Self { opcode, body }
    }

    pub fn encode(&self) -> Result<Vec<u8>, DiscordError> {
        let body = serde_json::to_vec(&self.body)?;
        if body.len() > MAX_BODY_LEN {
            return Err(DiscordError::FrameTooLarge {
                len: body.len(),
                max: MAX_BODY_LEN,
            });
        }
        let len = u32::try_from(body.len()).map_err(|_| DiscordError::FrameTooLarge {
            len: body.len(),
            max: MAX_BODY_LEN,
        })?;

        let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
        buf.extend_from_slice(&(self.opcode as u32).to_le_bytes());
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }
}

pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), DiscordError> {
    writer.write_all(&frame.encode()?)?;
    writer.flush()?;
    Ok(())
}

pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame, DiscordError> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;

    let opcode = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if len > MAX_BODY_LEN {
        return Err(DiscordError::FrameTooLarge {
            len,
            max: MAX_BODY_LEN,
        });
    }
    let opcode = Opcode::try_from(opcode)?;

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)?
    };
    Ok(Frame { opcode, body })
}
