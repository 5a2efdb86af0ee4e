//! Frame header implementation with zero-copy parsing.
//!
//! The `FrameHeader` is a fixed 24-byte structure serialized as raw binary
//! (Big Endian). The engine classifies inbound traffic on the header alone;
//! payload bytes are only interpreted once the message type is known.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    MessageType,
    errors::{ProtocolError, Result},
};

/// Fixed 24-byte frame header (Big Endian network byte order).
///
/// All multi-byte integers are stored in Big Endian format to match network
/// byte order. Fields are stored as raw byte arrays to avoid alignment
/// issues.
///
/// Wire layout:
///
/// | offset | width | field |
/// |--------|-------|------------------|
/// | 0      | 4     | `message_size` (total frame length, includes itself) |
/// | 4      | 4     | `sequence_num` |
/// | 8      | 8     | `session_id` |
/// | 16     | 4     | `last_received` |
/// | 20     | 4     | `message_type` |
///
/// # Invariants
///
/// - `message_size >= 24` and equals the exact frame length on the wire.
/// - `session_id` is the full 64-bit value assigned by the server; it is 0
///   only on the `NewSession` handshake frame.
///
/// # Security
///
/// The #[repr(C, packed)] layout with zerocopy traits ensures this struct
/// can be safely cast from untrusted network bytes - all 24-byte patterns
/// are valid, preventing undefined behavior. Semantic validation (size
/// bounds, known discriminator) happens in [`FrameHeader::from_bytes`].
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    message_size: [u8; 4],
    sequence_num: [u8; 4],
    session_id: [u8; 8],
    last_received: [u8; 4],
    pub(crate) message_type: [u8; 4],
}

impl FrameHeader {
    /// Size of the serialized header (24 bytes).
    pub const SIZE: usize = 24;

    /// Maximum total message size (16 MB sanity cap).
    pub const MAX_MESSAGE_SIZE: u32 = 16 * 1024 * 1024;

    /// Create a header-only frame header for the given message type.
    ///
    /// `message_size` starts at [`Self::SIZE`]; attaching a payload through
    /// `Frame::new` adjusts it.
    #[must_use]
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_size: (Self::SIZE as u32).to_be_bytes(),
            sequence_num: [0; 4],
            session_id: [0; 8],
            last_received: [0; 4],
            message_type: message_type.to_u32().to_be_bytes(),
        }
    }

    /// Parse a header from network bytes (zero-copy, safe).
    ///
    /// # Errors
    ///
    /// - `ProtocolError::ShortFrame` if the buffer holds fewer than 24
    ///   bytes, or the declared `message_size` is below 24
    /// - `ProtocolError::MessageTooLarge` if `message_size` exceeds the cap
    /// - `ProtocolError::UnknownMessageType` if the discriminator is not an
    ///   enumerated value
    ///
    /// # Security
    ///
    /// Cheapest checks run first (length, size field) so garbage input is
    /// rejected before any further work. The header bytes are referenced in
    /// place; nothing is copied.
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::ShortFrame {
                expected: Self::SIZE,
                actual: bytes.len(),
            })?
            .0;

        let message_size = u32::from_be_bytes(header.message_size);
        if (message_size as usize) < Self::SIZE {
            return Err(ProtocolError::ShortFrame {
                expected: Self::SIZE,
                actual: message_size as usize,
            });
        }

        if message_size > Self::MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: message_size as usize,
                max: Self::MAX_MESSAGE_SIZE as usize,
            });
        }

        let raw_type = u32::from_be_bytes(header.message_type);
        if MessageType::from_u32(raw_type).is_none() {
            return Err(ProtocolError::UnknownMessageType(raw_type));
        }

        Ok(header)
    }

    /// Serialize the header to its 24 wire bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let bytes = IntoBytes::as_bytes(self);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Total frame length in bytes, including this field.
    #[must_use]
    pub fn message_size(&self) -> u32 {
        u32::from_be_bytes(self.message_size)
    }

    /// Sender-assigned sequence number; 0 when unset.
    #[must_use]
    pub fn sequence_num(&self) -> u32 {
        u32::from_be_bytes(self.sequence_num)
    }

    /// Server-assigned session identifier; 0 before the handshake completes.
    #[must_use]
    pub fn session_id(&self) -> u64 {
        u64::from_be_bytes(self.session_id)
    }

    /// Highest peer sequence number the sender has processed.
    #[must_use]
    pub fn last_received(&self) -> u32 {
        u32::from_be_bytes(self.last_received)
    }

    /// Message-type discriminator as raw u32.
    #[must_use]
    pub fn message_type(&self) -> u32 {
        u32::from_be_bytes(self.message_type)
    }

    /// Message-type discriminator as enum. `None` if unrecognized.
    #[must_use]
    pub fn message_type_enum(&self) -> Option<MessageType> {
        MessageType::from_u32(self.message_type())
    }

    /// Payload length implied by `message_size` (0 for header-only frames).
    #[must_use]
    pub fn payload_size(&self) -> usize {
        (self.message_size() as usize).saturating_sub(Self::SIZE)
    }

    /// Set the total frame length.
    pub fn set_message_size(&mut self, size: u32) {
        self.message_size = size.to_be_bytes();
    }

    /// Assign the outbound sequence number.
    pub fn set_sequence_num(&mut self, sequence_num: u32) {
        self.sequence_num = sequence_num.to_be_bytes();
    }

    /// Stamp the session identifier.
    pub fn set_session_id(&mut self, session_id: u64) {
        self.session_id = session_id.to_be_bytes();
    }

    /// Record the highest processed peer sequence.
    pub fn set_last_received(&mut self, last_received: u32) {
        self.last_received = last_received.to_be_bytes();
    }
}

// Manual Debug implementation (can't derive due to packed repr)
impl std::fmt::Debug for FrameHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHeader")
            .field("message_size", &self.message_size())
            .field("sequence_num", &self.sequence_num())
            .field("session_id", &self.session_id())
            .field("last_received", &self.last_received())
            .field("message_type", &self.message_type_enum())
            .finish()
    }
}

// Manual PartialEq implementation (can't derive due to packed repr)
impl PartialEq for FrameHeader {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for FrameHeader {}
