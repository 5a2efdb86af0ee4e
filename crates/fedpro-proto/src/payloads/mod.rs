//! HLA payload unions carried inside call and callback envelopes.
//!
//! Each envelope payload is a 4-byte big-endian field-number tag followed by
//! the CBOR-encoded body of exactly one union variant. The tag identifies
//! which variant is populated; the numeric values live in [`tags`] as
//! compile-time constants so both peers (and the tests) agree on them
//! without any runtime schema object.
//!
//! Bodies use CBOR because it is self-describing, compact, and needs no
//! code generation; the session engine never inspects bodies, only the
//! dispatch layers do.
//!
//! # Invariants
//!
//! Each variant maps to exactly one tag (enforced by match exhaustiveness).
//! Round-trip encoding must produce an equal value.

pub mod calls;
pub mod callbacks;
pub mod tags;

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::{ProtocolError, Result};

/// Encode a tag prefix plus CBOR body.
pub(crate) fn encode_tagged<T: Serialize>(tag: u32, body: &T) -> Result<Bytes> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tag.to_be_bytes());
    ciborium::ser::into_writer(body, &mut buf)
        .map_err(|e| ProtocolError::CborEncode(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Encode a bare tag for body-less variants.
pub(crate) fn encode_tag_only(tag: u32) -> Bytes {
    Bytes::copy_from_slice(&tag.to_be_bytes())
}

/// Split an envelope payload into its tag and body bytes.
pub(crate) fn split_tag(payload: &[u8]) -> Result<(u32, &[u8])> {
    let tag_bytes: [u8; 4] = payload
        .get(..4)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(ProtocolError::ShortPayload { expected: 4, actual: payload.len() })?;
    Ok((u32::from_be_bytes(tag_bytes), payload.get(4..).unwrap_or_default()))
}

/// Decode a CBOR body.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    ciborium::de::from_reader(body).map_err(|e| ProtocolError::CborDecode(e.to_string()))
}
