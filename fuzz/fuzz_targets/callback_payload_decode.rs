//! Fuzz target for the CallbackRequest/CallbackResponse payload unions
//!
//! Same contract as the call-union fuzzer: arbitrary bytes must either
//! decode into a value that round-trips or be rejected with an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use fedpro_proto::payloads::callbacks::{CallbackRequest, CallbackResponse};

fuzz_target!(|data: &[u8]| {
    if let Ok(callback) = CallbackRequest::decode(data) {
        let reencoded = callback.encode().expect("decoded callback must re-encode");
        let reparsed =
            CallbackRequest::decode(&reencoded).expect("re-encoded callback must decode");
        assert_eq!(callback, reparsed);
    }

    if let Ok(response) = CallbackResponse::decode(data) {
        let reencoded = response.encode();
        assert_eq!(CallbackResponse::decode(&reencoded), Ok(response));
    }
});
