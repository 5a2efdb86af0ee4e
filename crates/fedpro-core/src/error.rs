//! Error types for the FedPro session layer.
//!
//! Strongly-typed errors for the session state machine: handshake refusals,
//! heartbeat loss, and state violations. We avoid `std::io::Error` for
//! protocol logic to keep error handling recoverable and typed; transport
//! failures live in the client crate.

use std::time::Duration;

use thiserror::Error;

use crate::session::SessionState;

/// Errors that can occur during session state machine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Invalid state transition attempted.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when the error occurred.
        state: SessionState,
        /// Operation that was attempted.
        operation: &'static str,
    },

    /// Received a frame that is not valid for the current state.
    #[error("unexpected frame: received message type {message_type} in state {state:?}")]
    UnexpectedFrame {
        /// Current state when the frame was received.
        state: SessionState,
        /// Message-type discriminator of the unexpected frame.
        message_type: u32,
    },

    /// Server refused the handshake: protocol version not supported.
    #[error("server does not support session protocol version")]
    UnsupportedProtocolVersion,

    /// Server refused the handshake: no session capacity.
    #[error("server is out of session resources")]
    OutOfResources,

    /// Server reported an internal failure during the handshake.
    #[error("server reported an internal session error")]
    SessionInternal,

    /// Server granted the session but assigned the reserved id 0.
    #[error("server assigned the reserved session id 0")]
    InvalidSessionId,

    /// Peer terminated the session.
    #[error("session terminated by peer")]
    SessionTerminated,

    /// No inbound traffic arrived within the heartbeat timeout.
    #[error("heartbeat lost after {elapsed:?}")]
    HeartbeatLost {
        /// Time since the unanswered heartbeat was sent.
        elapsed: Duration,
    },

    /// The outbound sequence counter would wrap.
    #[error("outbound sequence number overflow")]
    SequenceOverflow,

    /// Framing or payload error from the wire layer.
    #[error("protocol error: {0}")]
    Protocol(#[from] fedpro_proto::ProtocolError),
}

impl SessionError {
    /// Returns true if this error ends the session.
    ///
    /// Everything except a local state-machine misuse is fatal: the peer is
    /// gone, refused us, or desynchronized beyond recovery. Fatal errors
    /// are always followed by teardown and a `connectionLost` callback at
    /// the engine layer.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidState { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_misuse_is_not_fatal() {
        let err = SessionError::InvalidState {
            state: SessionState::Connecting,
            operation: "next_frame",
        };
        assert!(!err.is_fatal());
    }

    #[test]
    fn peer_failures_are_fatal() {
        assert!(SessionError::UnsupportedProtocolVersion.is_fatal());
        assert!(SessionError::OutOfResources.is_fatal());
        assert!(SessionError::SessionTerminated.is_fatal());
        assert!(SessionError::HeartbeatLost { elapsed: Duration::from_secs(180) }.is_fatal());
        assert!(SessionError::SequenceOverflow.is_fatal());
    }
}
