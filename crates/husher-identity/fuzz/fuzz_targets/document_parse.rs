//! Fuzz target for the identity document parser.
//!
//! Feeds arbitrary text to `IdentityDocument::from_json`. Must never panic;
//! anything that parses must serialize and parse again to the same value.
//!
//! # Usage
//!
//! ```sh
//! cd crates/husher-identity
//! cargo +nightly fuzz run document_parse -- -max_len=8192
//! ```

#![no_main]

use husher_identity::IdentityDocument;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = IdentityDocument::from_json(s) {
            let text = doc.to_json().expect("parsed document serializes");
            let again = IdentityDocument::from_json(&text).expect("serialized document parses");
            assert_eq!(again, doc);
        }
    }
});
