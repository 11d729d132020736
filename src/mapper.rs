// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [mapping step](http://www.unicode.org/reports/tr46/#Processing) of
//! UTS #46, with the STD3 ASCII rules applied.

use crate::ace::AceOptions;
use crate::tables::{IdnaStatus, UnicodeData};
use crate::Error;
use std::borrow::Cow;
use utf8_iter::Utf8CharsEx;

/// A mapped domain name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped<'a> {
    pub text: Cow<'a, str>,
    /// No non-ASCII code point was seen, so NFC can be skipped.
    ///
    /// Non-ASCII input that maps to ASCII, such as fullwidth letters, still
    /// clears this flag.
    pub all_ascii: bool,
}

#[inline]
pub(crate) fn is_label_ascii(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-' | '_')
}

#[inline]
fn is_domain_ascii(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.')
}

/// Map `input`, given as UTF-8 bytes, through the UTS #46 mapping table.
///
/// Ill-formed UTF-8 decodes to U+FFFD, which is disallowed.
pub fn map_domain_name<'a>(
    data: &UnicodeData,
    input: &'a [u8],
    options: AceOptions,
) -> Result<Mapped<'a>, Error> {
    let fast_path_len = input
        .iter()
        .position(|&b| !is_domain_ascii(b))
        .unwrap_or(input.len());
    let (head, tail) = input.split_at(fast_path_len);
    // SAFETY: `head` is ASCII.
    let head = unsafe { std::str::from_utf8_unchecked(head) };
    if tail.is_empty() {
        return Ok(Mapped {
            text: Cow::Borrowed(head),
            all_ascii: true,
        });
    }

    let mut text = String::with_capacity(input.len());
    text.push_str(head);
    let mut all_ascii = true;
    for c in tail.chars() {
        if c.is_ascii() {
            let lower = c.to_ascii_lowercase();
            if lower != '.' && !is_label_ascii(lower) {
                return Err(Error::DisallowedAscii(c));
            }
            text.push(lower);
            continue;
        }
        all_ascii = false;
        match data.idna_status(c) {
            IdnaStatus::Ignored => {}
            IdnaStatus::Valid => text.push(c),
            IdnaStatus::Deviation if !options.transitional_processing => text.push(c),
            IdnaStatus::Mapped | IdnaStatus::Deviation => {
                for m in data.mapping(c, options.transitional_processing) {
                    if m.is_ascii() && m != '.' && !is_label_ascii(m) {
                        return Err(Error::DisallowedCharacter(c));
                    }
                    text.push(m);
                }
            }
            IdnaStatus::Disallowed => return Err(Error::DisallowedCharacter(c)),
        }
    }
    Ok(Mapped {
        text: Cow::Owned(text),
        all_ascii,
    })
}
