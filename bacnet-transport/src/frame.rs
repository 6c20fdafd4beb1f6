//! Length-prefixed frames for the TCP proxy connection

use bacnet_core::{BacnetError, BacnetResult};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Frame header length
pub const FRAME_HEADER_LENGTH: usize = 6;

/// Only supported frame version
pub const FRAME_VERSION: u16 = 0x0001;

/// Largest payload accepted from the proxy
pub const MAX_FRAME_PAYLOAD: usize = 16 * 1024 * 1024;

/// Frame header: version (u16, big-endian) followed by payload length (u32, big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    version: u16,
    length: u32,
}

impl FrameHeader {
    /// Header for a payload of `length` bytes
    pub fn new(length: u32) -> Self {
        Self {
            version: FRAME_VERSION,
            length,
        }
    }

    /// Encode header to bytes (big-endian)
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.version);
        buf.put_u32(self.length);
    }

    /// Decode header from bytes
    pub fn decode(mut data: &[u8]) -> BacnetResult<Self> {
        if data.len() < FRAME_HEADER_LENGTH {
            return Err(BacnetError::Transport(format!(
                "Frame header too short: expected {}, got {}",
                FRAME_HEADER_LENGTH,
                data.len()
            )));
        }
        let version = data.get_u16();
        if version != FRAME_VERSION {
            return Err(BacnetError::Transport(format!(
                "Frame version was {}, only version {} is supported",
                version, FRAME_VERSION
            )));
        }
        let length = data.get_u32();
        if length as usize > MAX_FRAME_PAYLOAD {
            return Err(BacnetError::Transport(format!(
                "Frame payload of {} bytes exceeds the {} byte limit",
                length, MAX_FRAME_PAYLOAD
            )));
        }
        Ok(Self { version, length })
    }

    /// Get payload length
    pub fn payload_length(&self) -> usize {
        self.length as usize
    }
}

/// Build a complete frame around a payload
pub fn encode_frame(payload: &[u8]) -> BacnetResult<Bytes> {
    if payload.len() > MAX_FRAME_PAYLOAD {
        return Err(BacnetError::Transport(format!(
            "Payload of {} bytes exceeds the {} byte frame limit",
            payload.len(),
            MAX_FRAME_PAYLOAD
        )));
    }
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LENGTH + payload.len());
    FrameHeader::new(payload.len() as u32).encode(&mut buf);
    buf.put_slice(payload);
    Ok(buf.freeze())
}
