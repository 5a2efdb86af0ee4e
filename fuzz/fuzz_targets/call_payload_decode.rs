//! Fuzz target for the CallRequest/CallResponse payload unions
//!
//! Exercises the tag-prefix splitter and the CBOR body decoders with
//! arbitrary bytes. Decoding must reject malformed input with an error,
//! never panic, and a successfully decoded value must round-trip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fedpro_proto::payloads::calls::{CallRequest, CallResponse};

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = CallRequest::decode(data) {
        let reencoded = request.encode().expect("decoded request must re-encode");
        let reparsed = CallRequest::decode(&reencoded).expect("re-encoded request must decode");
        assert_eq!(request, reparsed);
    }

    if let Ok(response) = CallResponse::decode(data) {
        let reencoded = response.encode().expect("decoded response must re-encode");
        let reparsed = CallResponse::decode(&reencoded).expect("re-encoded response must decode");
        assert_eq!(response, reparsed);
    }
});
