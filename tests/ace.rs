// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use assert_matches::assert_matches;
use domain_ace::{
    domain_to_ascii, domain_to_unicode, AceConverter, AceOperation, AceOptions, DisplayPolicy,
    Error, LabelError, LeadingDot,
};
use std::borrow::Cow;
use std::sync::Arc;

fn str_fn<F: Fn(&str) -> Result<Cow<'_, str>, Error>>(f: F) -> F {
    f
}

fn str_dot_fn<F: Fn(&str, LeadingDot) -> Result<Cow<'_, str>, Error>>(f: F) -> F {
    f
}

fn to_ace(domain: &str) -> Result<String, Error> {
    AceConverter::new()
        .convert(
            domain,
            AceOperation::ToAceOnly,
            LeadingDot::Forbid,
            AceOptions::default(),
        )
        .map(Cow::into_owned)
}

fn to_display(domain: &str, options: AceOptions) -> Result<String, Error> {
    AceConverter::new()
        .convert(domain, AceOperation::NormalizeAce, LeadingDot::Forbid, options)
        .map(Cow::into_owned)
}

fn everywhere() -> AceOptions {
    AceOptions::default().ignore_display_whitelist(true)
}

#[test]
fn empty_input() {
    let converter = AceConverter::new();
    for operation in [AceOperation::ToAceOnly, AceOperation::NormalizeAce] {
        for leading_dot in [LeadingDot::Allow, LeadingDot::Forbid] {
            for transitional in [false, true] {
                let options = AceOptions::default().transitional_processing(transitional);
                assert_eq!(
                    converter.convert("", operation, leading_dot, options),
                    Ok(Cow::Borrowed(""))
                );
            }
        }
    }
}

#[test]
fn ascii_case_folding() {
    assert_eq!(to_ace("FLuke").unwrap(), "fluke");
    assert_eq!(to_ace("FLUKE").unwrap(), "fluke");
    assert_eq!(to_ace("Example.COM").unwrap(), "example.com");

    let converter = AceConverter::new();
    let fluke = converter.convert(
        "fluke",
        AceOperation::ToAceOnly,
        LeadingDot::Forbid,
        AceOptions::default(),
    );
    assert_matches!(fluke, Ok(Cow::Borrowed("fluke")));
}

#[test]
fn non_ascii_to_ace() {
    assert_eq!(to_ace("Alqualond\u{00EB}").unwrap(), "xn--alqualond-34a");
    assert_eq!(to_ace("B\u{00FC}cher.de").unwrap(), "xn--bcher-kva.de");
    assert_eq!(
        to_ace("\u{0644}\u{064A}\u{0647}\u{0645}\u{0627}\u{0628}\u{062A}\u{0643}\u{0644}\
                \u{0645}\u{0648}\u{0634}\u{0639}\u{0631}\u{0628}\u{064A}\u{061F}.com")
        .unwrap(),
        "xn--egbpdaj6bu4bxfgehfvwxn.com"
    );
}

#[test]
fn disallowed_code_points() {
    assert_eq!(to_ace("\u{1b}"), Err(Error::DisallowedAscii('\u{1b}')));
    assert_eq!(to_ace("exa mple.com"), Err(Error::DisallowedAscii(' ')));
    assert_eq!(
        to_ace("\u{E000}.com"),
        Err(Error::DisallowedCharacter('\u{E000}'))
    );
    // Maps to a space
    assert_eq!(
        to_ace("a\u{00A0}b.com"),
        Err(Error::DisallowedCharacter('\u{00A0}'))
    );
}

#[test]
fn invalid_ace_labels_are_rejected() {
    // U+00A0 in disguise
    assert_eq!(
        to_ace("xn--6a"),
        Err(Error::InvalidAceLabel(LabelError::Status('\u{00A0}')))
    );
    assert_eq!(
        to_display("xn--6a.com", AceOptions::default()),
        Err(Error::InvalidAceLabel(LabelError::Status('\u{00A0}')))
    );
    // e followed by a combining acute accent
    assert_eq!(
        to_ace("xn--e-xbb.com"),
        Err(Error::InvalidAceLabel(LabelError::NotNfc))
    );
    assert_eq!(
        to_ace("xn--ab---epa.com"),
        Err(Error::InvalidAceLabel(LabelError::HyphenPosition))
    );
    assert_eq!(
        to_ace("\u{0301}a.com"),
        Err(Error::InvalidAceLabel(LabelError::LeadingMark))
    );
    assert_eq!(to_ace("xn--"), Err(Error::InvalidAsciiLabel));
    assert_eq!(to_ace("xn--bcher-kv.de"), Err(Error::InvalidPunycode));
    assert_eq!(to_ace("xn---"), Err(Error::InvalidAsciiLabel));
}

#[test]
fn label_length() {
    let longest = format!("{}.com", "a".repeat(63));
    assert_eq!(to_ace(&longest).unwrap(), longest);
    let too_long = format!("{}.com", "a".repeat(64));
    assert_eq!(to_ace(&too_long), Err(Error::LabelTooLong));
    let encodes_too_long = format!("{}.com", "\u{00FC}".repeat(60));
    assert_eq!(to_ace(&encodes_too_long), Err(Error::LabelTooLong));
}

#[test]
fn domain_length() {
    let label = "a".repeat(63);
    let longest = format!("{0}.{0}.{0}.{1}", label, "a".repeat(61));
    let too_long = format!("{0}.{0}.{0}.{0}", label);
    let converter = AceConverter::new();
    let convert = str_fn(|domain: &str| {
        converter.convert(
            domain,
            AceOperation::ToAceOnly,
            LeadingDot::Forbid,
            AceOptions::default().verify_dns_length(true),
        )
    });
    assert_eq!(longest.len(), 253);
    assert!(convert(&longest).is_ok());
    assert!(convert(&format!("{}.", longest)).is_ok());
    assert_eq!(convert(&too_long), Err(Error::DomainTooLong));
    assert!(to_ace(&too_long).is_ok());
}

#[test]
fn empty_labels() {
    let converter = AceConverter::new();
    let convert = str_dot_fn(|domain: &str, leading_dot| {
        converter.convert(
            domain,
            AceOperation::ToAceOnly,
            leading_dot,
            AceOptions::default(),
        )
    });
    assert_eq!(
        convert(".example.com", LeadingDot::Allow).unwrap(),
        ".example.com"
    );
    assert_eq!(
        convert(".B\u{00FC}cher.de", LeadingDot::Allow).unwrap(),
        ".xn--bcher-kva.de"
    );
    assert_eq!(
        convert(".example.com", LeadingDot::Forbid),
        Err(Error::EmptyLabel)
    );
    assert_eq!(convert("example.com.", LeadingDot::Forbid).unwrap(), "example.com.");
    assert_eq!(convert("a..b", LeadingDot::Allow), Err(Error::EmptyLabel));
    assert_eq!(convert("\u{00AD}", LeadingDot::Forbid), Err(Error::EmptyDomain));
}

#[test]
fn mapping_before_encoding() {
    // Fullwidth letters and full stop
    assert_eq!(to_ace("\u{FF21}\u{FF22}\u{FF23}\u{FF0E}com").unwrap(), "abc.com");
    // Ideographic full stop
    assert_eq!(to_ace("b\u{00FC}cher\u{3002}de").unwrap(), "xn--bcher-kva.de");
    // Soft hyphen is ignored
    assert_eq!(to_ace("ex\u{00AD}ample.com").unwrap(), "example.com");
}

#[test]
fn ill_formed_utf8() {
    let converter = AceConverter::new();
    assert_eq!(
        converter.convert_utf8(
            b"ex\xFFample.com",
            AceOperation::ToAceOnly,
            LeadingDot::Forbid,
            AceOptions::default()
        ),
        Err(Error::DisallowedCharacter('\u{FFFD}'))
    );
    assert_eq!(
        converter
            .convert_utf8(
                "b\u{00FC}cher.de".as_bytes(),
                AceOperation::NormalizeAce,
                LeadingDot::Forbid,
                AceOptions::default()
            )
            .unwrap(),
        "b\u{00FC}cher.de"
    );
}

#[test]
fn display_whitelist() {
    let options = AceOptions::default();
    assert_eq!(to_display("xn--bcher-kva.de", options).unwrap(), "b\u{00FC}cher.de");
    assert_eq!(to_display("XN--BCHER-KVA.DE", options).unwrap(), "b\u{00FC}cher.de");
    assert_eq!(to_display("B\u{00FC}cher.de.", options).unwrap(), "b\u{00FC}cher.de.");
    assert_eq!(
        to_display("xn--e1afmkfd.xn--p1ai", options).unwrap(),
        "\u{043F}\u{0440}\u{0438}\u{043C}\u{0435}\u{0440}.\u{0440}\u{0444}"
    );
    assert_eq!(
        to_display("b\u{00FC}cher.example", options).unwrap(),
        "xn--bcher-kva.example"
    );
    assert_eq!(to_display("Alqualond\u{00EB}", options).unwrap(), "xn--alqualond-34a");
    assert_eq!(
        to_display("b\u{00FC}cher.example", everywhere()).unwrap(),
        "b\u{00FC}cher.example"
    );
    assert_eq!(
        to_display("Alqualond\u{00EB}", everywhere()).unwrap(),
        "alqualond\u{00EB}"
    );
    assert_eq!(to_display("Example.COM", options).unwrap(), "example.com");
}

#[test]
fn transitional_processing() {
    let transitional = AceOptions::default().transitional_processing(true);
    assert_eq!(to_ace("fa\u{00DF}.de").unwrap(), "xn--fa-hia.de");
    assert_eq!(to_display("fa\u{00DF}.de", AceOptions::default()).unwrap(), "fa\u{00DF}.de");
    assert_eq!(to_display("fa\u{00DF}.de", transitional).unwrap(), "fass.de");
    assert_eq!(to_display("\u{03C2}.gr", transitional).unwrap(), "\u{03C3}.gr");
    // Valid ACE, but not displayable under transitional rules
    assert_eq!(to_display("xn--fa-hia.de", transitional).unwrap(), "xn--fa-hia.de");
}

#[test]
fn joiners() {
    let options = AceOptions::default();
    assert_eq!(to_ace("a\u{200D}b.com").unwrap(), "xn--ab-m1t.com");
    assert_eq!(to_display("a\u{200D}b.com", options).unwrap(), "xn--ab-m1t.com");
    assert_eq!(to_display("a\u{200C}b.com", options).unwrap(), "xn--ab-j1t.com");
    assert_eq!(
        to_display("\u{0915}\u{094D}\u{200D}\u{0937}.com", options).unwrap(),
        "\u{0915}\u{094D}\u{200D}\u{0937}.com"
    );
    assert_eq!(
        to_display("\u{0628}\u{200C}\u{0628}.com", options).unwrap(),
        "\u{0628}\u{200C}\u{0628}.com"
    );
}

#[test]
fn bidi() {
    assert_eq!(
        to_display("abc.\u{0627}\u{0628}\u{062C}", everywhere()).unwrap(),
        "abc.\u{0627}\u{0628}\u{062C}"
    );
    assert_eq!(
        to_display("0a.\u{0627}\u{0628}\u{062C}", everywhere()).unwrap(),
        "0a.xn--mgbcm"
    );
    assert_eq!(to_ace("0a.\u{0627}\u{0628}\u{062C}").unwrap(), "0a.xn--mgbcm");
    // EN and AN mixed in a right-to-left label
    assert_eq!(
        to_display("\u{0627}\u{0661}1.com", AceOptions::default()).unwrap(),
        "xn--1-ymc8o.com"
    );
    assert_eq!(
        to_display("\u{05D0}\u{05D1}\u{05BC}\u{05D2}.co.il", AceOptions::default()).unwrap(),
        "\u{05D0}\u{05D1}\u{05BC}\u{05D2}.co.il"
    );
}

#[test]
fn ace_is_idempotent() {
    for domain in &[
        "B\u{00FC}cher.de",
        "Alqualond\u{00EB}",
        "a\u{200D}b.com",
        "0a.\u{0627}\u{0628}\u{062C}",
        "\u{FF21}\u{FF22}\u{FF23}\u{FF0E}com",
        "example.com.",
    ] {
        let once = to_ace(domain).unwrap();
        assert_eq!(to_ace(&once).unwrap(), once, "{}", domain);
    }
}

#[test]
fn display_form_maps_back_to_ace() {
    for domain in &[
        "xn--bcher-kva.de",
        "xn--ab-m1t.com",
        "xn--e1afmkfd.xn--p1ai",
        "abc.xn--mgbcm",
        "xn--bcher-kva.example",
    ] {
        let shown = to_display(domain, AceOptions::default()).unwrap();
        assert_eq!(to_ace(&shown).unwrap(), *domain);
    }
}

#[test]
fn convenience_functions() {
    assert_eq!(domain_to_ascii("B\u{00FC}cher.de").unwrap(), "xn--bcher-kva.de");
    assert_eq!(domain_to_ascii(".de"), Err(Error::EmptyLabel));
    let policy = Arc::new(DisplayPolicy::new());
    assert_eq!(
        domain_to_unicode("xn--bcher-kva.de", &policy).unwrap(),
        "b\u{00FC}cher.de"
    );
    assert_eq!(
        domain_to_unicode("xn--bcher-kva.example", &policy).unwrap(),
        "xn--bcher-kva.example"
    );
}
