//! Error types for FedPro wire-format handling.
//!
//! Framing errors are fatal to a session: a peer that produces a malformed
//! header or an unknown discriminator cannot be resynchronized, so callers
//! tear the connection down. Payload-level CBOR errors indicate a schema
//! mismatch between the peers.

use thiserror::Error;

/// Result alias for wire-format operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding FedPro frames and payloads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer too short to contain a frame header, or the header declares a
    /// total size below the 24-byte minimum.
    #[error("short frame: need {expected} bytes, have {actual}")]
    ShortFrame {
        /// Minimum byte count required.
        expected: usize,
        /// Bytes actually available (or declared).
        actual: usize,
    },

    /// Header declares more payload bytes than the buffer contains.
    #[error("truncated frame: payload of {expected} bytes, only {actual} present")]
    TruncatedFrame {
        /// Payload length declared by the header.
        expected: usize,
        /// Payload bytes actually present.
        actual: usize,
    },

    /// Header declares a total size above the sanity cap.
    #[error("message too large: {size} bytes exceeds maximum of {max}")]
    MessageTooLarge {
        /// Declared total size.
        size: usize,
        /// Maximum accepted size.
        max: usize,
    },

    /// The 4-byte message-type discriminator is not an enumerated value.
    #[error("unknown message type: {0}")]
    UnknownMessageType(u32),

    /// A payload union carried a field-number tag outside its schema.
    #[error("unknown {union} tag: {tag}")]
    UnknownTag {
        /// Union the tag was read for.
        union: &'static str,
        /// Offending tag value.
        tag: u32,
    },

    /// A control payload was shorter than its fixed encoding.
    #[error("short payload: need {expected} bytes, have {actual}")]
    ShortPayload {
        /// Byte count required by the fixed layout.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// A `NewSessionStatus` payload carried a status code outside the enum.
    #[error("unknown session status code: {0}")]
    UnknownSessionStatus(i32),

    /// CBOR serialization of a union body failed.
    #[error("CBOR encode error: {0}")]
    CborEncode(String),

    /// CBOR deserialization of a union body failed.
    #[error("CBOR decode error: {0}")]
    CborDecode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_values() {
        let err = ProtocolError::UnknownMessageType(42);
        assert_eq!(err.to_string(), "unknown message type: 42");

        let err = ProtocolError::ShortFrame { expected: 24, actual: 7 };
        assert_eq!(err.to_string(), "short frame: need 24 bytes, have 7");

        let err = ProtocolError::UnknownTag { union: "CallRequest", tag: 77 };
        assert_eq!(err.to_string(), "unknown CallRequest tag: 77");
    }
}
