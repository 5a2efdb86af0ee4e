//! Control-plane payloads: session handshake and status codes.
//!
//! Unlike the HLA payload unions, control payloads have fixed hand-packed
//! layouts: `NewSession` carries a single 4-byte protocol version and
//! `NewSessionStatus` a single 4-byte status code. Heartbeats and
//! termination frames carry no payload at all.

use bytes::Bytes;

use crate::errors::{ProtocolError, Result};

/// Protocol version carried in the `NewSession` handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Payload of a `NewSession` frame: the 4-byte protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSession {
    /// Session-protocol version the client speaks.
    pub protocol_version: u32,
}

impl Default for NewSession {
    fn default() -> Self {
        Self { protocol_version: PROTOCOL_VERSION }
    }
}

impl NewSession {
    /// Encode to the 4-byte payload.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        Bytes::copy_from_slice(&self.protocol_version.to_be_bytes())
    }

    /// Decode from a payload slice.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if fewer than 4 bytes are present
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let bytes = read_u32(payload)?;
        Ok(Self { protocol_version: bytes })
    }
}

/// Session status reported by the server in `NewSessionStatus`.
///
/// `Unset` exists only locally, before any reply has been parsed; it is
/// never a valid wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum SessionStatus {
    /// No status received yet (local pre-parse value).
    #[default]
    Unset = -1,
    /// Session established; the header carries the assigned session id.
    Success = 0,
    /// Server does not speak the requested protocol version.
    UnsupportedProtocolVersion = 1,
    /// Server cannot allocate another session.
    OutOfResources = 2,
    /// Server-side failure.
    InternalError = 99,
}

impl SessionStatus {
    /// Numeric status code.
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map a wire status code to the enum. `Unset` is not a wire value.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownSessionStatus` for codes outside the enum
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Self::Success),
            1 => Ok(Self::UnsupportedProtocolVersion),
            2 => Ok(Self::OutOfResources),
            99 => Ok(Self::InternalError),
            other => Err(ProtocolError::UnknownSessionStatus(other)),
        }
    }

    /// Encode to the 4-byte payload.
    #[must_use]
    pub fn encode(self) -> Bytes {
        Bytes::copy_from_slice(&self.code().to_be_bytes())
    }

    /// Decode from a payload slice.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortPayload` if fewer than 4 bytes are present
    /// - `ProtocolError::UnknownSessionStatus` for unrecognized codes
    pub fn decode(payload: &[u8]) -> Result<Self> {
        Self::from_code(read_u32(payload)? as i32)
    }
}

fn read_u32(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] = payload
        .get(..4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(ProtocolError::ShortPayload { expected: 4, actual: payload.len() })?;
    Ok(u32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_round_trip() {
        let payload = NewSession::default().encode();
        assert_eq!(payload.as_ref(), &[0, 0, 0, 1]);

        let decoded = NewSession::decode(&payload).expect("should decode");
        assert_eq!(decoded.protocol_version, PROTOCOL_VERSION);
    }

    #[test]
    fn session_status_round_trip() {
        for status in [
            SessionStatus::Success,
            SessionStatus::UnsupportedProtocolVersion,
            SessionStatus::OutOfResources,
            SessionStatus::InternalError,
        ] {
            let payload = status.encode();
            assert_eq!(SessionStatus::decode(&payload), Ok(status));
        }
    }

    #[test]
    fn unset_is_not_a_wire_value() {
        let payload = SessionStatus::Unset.encode();
        assert_eq!(
            SessionStatus::decode(&payload),
            Err(ProtocolError::UnknownSessionStatus(-1))
        );
    }

    #[test]
    fn short_status_payload_rejected() {
        assert_eq!(
            SessionStatus::decode(&[0, 0]),
            Err(ProtocolError::ShortPayload { expected: 4, actual: 2 })
        );
    }
}
