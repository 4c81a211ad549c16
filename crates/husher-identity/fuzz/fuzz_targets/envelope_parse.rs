//! Fuzz target for envelope and bundle deserialization.
//!
//! # Usage
//!
//! ```sh
//! cd crates/husher-identity
//! cargo +nightly fuzz run envelope_parse -- -max_len=4096
//! ```

#![no_main]

use husher_identity::{BinaryParams, Envelope, MultiRecipientBundle};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Envelope>(data);
    let _ = serde_json::from_slice::<BinaryParams>(data);
    let _ = serde_json::from_slice::<MultiRecipientBundle>(data);
});
