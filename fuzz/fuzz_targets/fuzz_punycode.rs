#![no_main]

use domain_ace::punycode;
use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(utf8) = str::from_utf8(data) else {
        return;
    };

    if let Some(encoded) = punycode::encode_str(utf8) {
        assert!(encoded.is_ascii());
        assert_eq!(
            punycode::decode_to_string(&encoded).as_deref(),
            Some(utf8),
            "Punycode roundtrip mismatch: input={:?}, encoded={:?}",
            utf8,
            encoded
        );
    }

    // Never panics on arbitrary input
    let _ = punycode::decode(utf8);
    let _ = punycode::decode_label(utf8);
});
