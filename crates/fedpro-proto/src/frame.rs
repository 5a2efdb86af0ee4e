//! Frame type combining header and payload.
//!
//! A `Frame` is the transport-layer packet: a 24-byte raw binary header
//! (Big Endian) followed by a variable-length payload. Payload bytes are
//! opaque at this layer; the control and HLA payload modules interpret them
//! once the message type is known.

use bytes::{BufMut, Bytes};

use crate::{
    FrameHeader, MessageType,
    errors::{ProtocolError, Result},
};

/// Complete protocol frame (transport layer).
///
/// Layout on the wire:
/// `[FrameHeader: 24 bytes, raw binary] + [payload: variable bytes]`
///
/// Holds raw payload bytes, NOT a decoded union. The engine classifies
/// frames on the header alone and defers payload decoding to the codec for
/// the specific message type.
///
/// # Invariants
///
/// - Size Consistency: `header.message_size()` MUST equal
///   `FrameHeader::SIZE + payload.len()`. Enforced by [`Frame::new`] and
///   verified by [`Frame::decode`].
///
/// - Size Limit: the total size MUST NOT exceed
///   [`FrameHeader::MAX_MESSAGE_SIZE`] (16 MB). Violations are rejected
///   during encoding and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header (24 bytes).
    pub header: FrameHeader,

    /// Raw payload bytes (already encoded).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame with automatic `message_size` calculation.
    ///
    /// The header's size field is set to match the actual payload length,
    /// so a constructed frame can never desynchronize header and payload.
    #[must_use]
    pub fn new(message_type: MessageType, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let mut header = FrameHeader::new(message_type);

        // INVARIANT: payload length fits in u32 because Bytes is bounded by
        // isize::MAX and the protocol caps frames at 16 MB.
        header.set_message_size((FrameHeader::SIZE + payload.len()) as u32);

        Self { header, payload }
    }

    /// Create a frame from an already-populated header and payload.
    ///
    /// The header's `message_size` is overwritten to match the payload.
    #[must_use]
    pub fn with_header(mut header: FrameHeader, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        header.set_message_size((FrameHeader::SIZE + payload.len()) as u32);
        Self { header, payload }
    }

    /// Message-type discriminator of this frame. `None` if unrecognized.
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        self.header.message_type_enum()
    }

    /// Total encoded length in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        FrameHeader::SIZE + self.payload.len()
    }

    /// Encode the frame into a buffer.
    ///
    /// Writes `[header (24 bytes)] + [payload (variable)]`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MessageTooLarge` if the total size exceeds the
    ///   16 MB cap
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        debug_assert_eq!(self.encoded_len(), self.header.message_size() as usize);

        if self.encoded_len() > FrameHeader::MAX_MESSAGE_SIZE as usize {
            return Err(ProtocolError::MessageTooLarge {
                size: self.encoded_len(),
                max: FrameHeader::MAX_MESSAGE_SIZE as usize,
            });
        }

        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);

        Ok(())
    }

    /// Encode the frame to a freshly allocated byte vector.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode a frame from wire format.
    ///
    /// Returns a frame with raw payload bytes (does NOT decode the payload).
    ///
    /// # Errors
    ///
    /// - `ProtocolError` if header validation fails (short, oversized,
    ///   unknown discriminator)
    /// - `ProtocolError::TruncatedFrame` if fewer payload bytes are present
    ///   than the header claims
    ///
    /// # Security
    ///
    /// All validation happens before allocating memory for the payload, and
    /// exactly `message_size - 24` bytes are read; trailing data is ignored,
    /// preventing buffer over-read.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = FrameHeader::from_bytes(bytes)?;

        let total_size = header.message_size() as usize;
        debug_assert!(total_size >= FrameHeader::SIZE);

        if bytes.len() < total_size {
            return Err(ProtocolError::TruncatedFrame {
                expected: total_size - FrameHeader::SIZE,
                actual: bytes.len().saturating_sub(FrameHeader::SIZE),
            });
        }

        // INVARIANT: bytes.len() >= total_size was verified above, and
        // total_size >= FrameHeader::SIZE by header validation, so this
        // slice cannot go out of bounds.
        let payload = Bytes::copy_from_slice(
            bytes.get(FrameHeader::SIZE..total_size).unwrap_or_default(),
        );

        debug_assert_eq!(payload.len(), header.payload_size());

        Ok(Self { header: *header, payload })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    impl Arbitrary for Frame {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            (any::<FrameHeader>(), prop::collection::vec(any::<u8>(), 0..1024))
                .prop_map(|(header, payload)| Frame::with_header(header, payload))
                .boxed()
        }
    }

    proptest! {
        #[test]
        fn frame_round_trip(frame in any::<Frame>()) {
            let wire = frame.to_vec().expect("should encode");

            let parsed = Frame::decode(&wire).expect("should decode");
            prop_assert_eq!(frame.header, parsed.header);
            prop_assert_eq!(frame.payload, parsed.payload);
        }
    }

    #[test]
    fn frame_with_payload_sets_size() {
        let frame = Frame::new(MessageType::NewSession, vec![0, 0, 0, 1]);
        assert_eq!(frame.header.message_size(), 28);
        assert_eq!(frame.header.payload_size(), 4);

        let wire = frame.to_vec().expect("should encode");
        assert_eq!(wire.len(), 28);

        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(parsed.payload.as_ref(), &[0, 0, 0, 1]);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let frame = Frame::new(MessageType::Heartbeat, Bytes::new());
        let mut wire = frame.to_vec().expect("should encode");
        wire.extend_from_slice(&[0xFF; 8]);

        let parsed = Frame::decode(&wire).expect("should decode");
        assert_eq!(parsed.payload.len(), 0);
    }

    #[test]
    fn reject_truncated_frame() {
        let frame = Frame::new(MessageType::CallRequest, vec![1u8; 100]);
        let wire = frame.to_vec().expect("should encode");

        // Chop off half the payload
        let result = Frame::decode(&wire[..FrameHeader::SIZE + 50]);
        assert_eq!(result, Err(ProtocolError::TruncatedFrame { expected: 100, actual: 50 }));
    }
}
