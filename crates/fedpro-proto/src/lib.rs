//! FedPro wire format.
//!
//! The Federate Protocol frames every message as a fixed 24-byte big-endian
//! header plus an opaque payload. Control frames (session handshake,
//! heartbeats, termination) carry fixed-layout payloads; HLA call and
//! callback frames carry a 4-byte field-number tag followed by the CBOR
//! body of one union variant.
//!
//! # Components
//!
//! - [`FrameHeader`] / [`Frame`]: framing layer with zero-copy header
//!   parsing
//! - [`MessageType`]: envelope discriminator
//! - [`control`]: handshake and status payloads
//! - [`payloads`]: the `CallRequest` / `CallResponse` /
//!   `CallbackRequest` / `CallbackResponse` unions and their tag constants
//! - [`handles`]: opaque HLA handle newtypes and value-map aliases

pub mod control;
pub mod errors;
mod frame;
pub mod handles;
mod header;
pub mod payloads;

pub use errors::{ProtocolError, Result};
pub use frame::Frame;
pub use header::FrameHeader;

/// Message-type discriminator carried in every frame header.
///
/// Numeric values are fixed by the protocol; unknown values on the wire are
/// rejected during header validation and tear the session down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageType {
    /// Placeholder for an uninitialized message.
    Unknown = 0,

    // Session management
    /// Client-initiated session handshake.
    NewSession = 1,
    /// Server reply to `NewSession` carrying status and session id.
    NewSessionStatus = 2,
    /// Keepalive probe.
    Heartbeat = 3,
    /// Keepalive acknowledgment.
    HeartbeatResponse = 4,
    /// Client-initiated graceful termination.
    TerminateSession = 6,
    /// Server acknowledgment that the session ended.
    SessionTerminated = 7,

    // Reconnection (enumerated; resume semantics are not implemented)
    /// Reserved: session resume request.
    ResumeRequest = 10,
    /// Reserved: session resume status.
    ResumeStatus = 11,

    // HLA calls and callbacks
    /// RTI-ambassador service request (federate → RTI).
    CallRequest = 20,
    /// RTI-ambassador service response (RTI → federate).
    CallResponse = 21,
    /// Federate-ambassador callback (RTI → federate).
    CallbackRequest = 22,
    /// Per-callback delivery outcome (federate → RTI).
    CallbackResponse = 23,

    /// Sentinel for locally constructed invalid messages.
    Invalid = 99,
}

impl MessageType {
    /// Numeric wire value.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Map a wire value to the enum. `None` for unrecognized values.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::NewSession),
            2 => Some(Self::NewSessionStatus),
            3 => Some(Self::Heartbeat),
            4 => Some(Self::HeartbeatResponse),
            6 => Some(Self::TerminateSession),
            7 => Some(Self::SessionTerminated),
            10 => Some(Self::ResumeRequest),
            11 => Some(Self::ResumeStatus),
            20 => Some(Self::CallRequest),
            21 => Some(Self::CallResponse),
            22 => Some(Self::CallbackRequest),
            23 => Some(Self::CallbackResponse),
            99 => Some(Self::Invalid),
            _ => None,
        }
    }
}
