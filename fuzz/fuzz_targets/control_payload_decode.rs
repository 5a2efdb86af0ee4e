//! Fuzz target for the fixed-layout control payloads
//!
//! NewSession and NewSessionStatus have hand-packed 4-byte payloads; the
//! decoders must reject short or unknown input without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fedpro_proto::control::{NewSession, SessionStatus};

fuzz_target!(|data: &[u8]| {
    if let Ok(new_session) = NewSession::decode(data) {
        assert_eq!(&new_session.encode()[..], &data[..4]);
    }

    if let Ok(status) = SessionStatus::decode(data) {
        assert_eq!(SessionStatus::decode(&status.encode()), Ok(status));
    }
});
