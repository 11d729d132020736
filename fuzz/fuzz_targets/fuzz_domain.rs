#![no_main]

use domain_ace::{AceConverter, AceOperation, AceOptions, LeadingDot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let converter = AceConverter::new();
    let convert = |domain: &[u8], operation| {
        converter.convert_utf8(
            domain,
            operation,
            LeadingDot::Allow,
            AceOptions::default().ignore_display_whitelist(true),
        )
    };

    let ascii_result = convert(data, AceOperation::ToAceOnly);
    let display_result = convert(data, AceOperation::NormalizeAce);

    // Both directions accept and reject the same inputs
    assert_eq!(
        ascii_result.is_ok(),
        display_result.is_ok(),
        "input={:?}",
        data
    );

    if let Ok(ref ascii) = ascii_result {
        assert!(ascii.is_ascii(), "non-ASCII ACE form for {:?}", data);

        // ACE form is a fixed point
        let again = convert(ascii.as_bytes(), AceOperation::ToAceOnly);
        assert_eq!(again.as_deref(), Ok(&**ascii), "input={:?}", data);

        // The display form maps back to the same ACE form
        if let Ok(ref shown) = display_result {
            let back = convert(shown.as_bytes(), AceOperation::ToAceOnly);
            assert_eq!(
                back.as_deref(),
                Ok(&**ascii),
                "input={:?}, shown={:?}",
                data,
                shown
            );
        }
    }
});
