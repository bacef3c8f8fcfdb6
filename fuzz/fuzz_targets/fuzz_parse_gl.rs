//! Fuzz target for the GL String parser entry point
//!
//! Feeds arbitrary byte strings to the parser. Anything that parses must
//! serialize back to the same text.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 1000 {
            return;
        }

        if let Ok(node) = ferro_gl::parse_gl(input) {
            assert_eq!(node.to_string(), input);
        }
    }
});
