// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Normalization of the host part of URLs into its canonical
//! ASCII-Compatible Encoding (ACE), and back into Unicode when that is
//! safe to show to a user.
//!
//! The pipeline follows [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/):
//!
//! 1. [`mapper`]: case folding and the UTS #46 mapping table.
//! 2. NFC normalization.
//! 3. [`punycode`]: [RFC 3492](https://tools.ietf.org/html/rfc3492) encoding
//!    of every non-ASCII label behind the `xn--` prefix.
//! 4. [`validator`]: structural checks, the IDNA status of every code point,
//!    the CONTEXTJ rules of [RFC 5892](https://tools.ietf.org/html/rfc5892#appendix-A)
//!    and the Bidi rule of [RFC 5893](https://tools.ietf.org/html/rfc5893#section-2).
//! 5. [`policy`]: whether the top-level domain allows showing Unicode at all.
//!
//! [`AceConverter`] ties these together. Unicode is only ever returned when
//! every label of the domain decodes and validates; anything else collapses
//! to the ACE form, which is unambiguous ASCII.
//!
//! ```ignore
//! use domain_ace::{AceConverter, AceOperation, AceOptions, LeadingDot};
//!
//! let converter = AceConverter::new();
//! let host = converter.convert(
//!     "Bücher.DE",
//!     AceOperation::NormalizeAce,
//!     LeadingDot::Forbid,
//!     AceOptions::default(),
//! )?;
//! assert_eq!(host, "bücher.de");
//! ```

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

use std::borrow::Cow;
use std::sync::Arc;

pub mod ace;
pub mod mapper;
pub mod policy;
pub mod punycode;
pub mod tables;
pub mod validator;

pub use crate::ace::{AceConverter, AceOperation, AceOptions, LeadingDot};
pub use crate::policy::{DisplayPolicy, BUILTIN_WHITELIST};
pub use crate::validator::LabelError;

/// The longest label, in bytes of ACE form, that DNS can carry.
pub const MAX_LABEL_LENGTH: usize = 63;

/// The longest domain, in bytes of ACE form, without the root dot.
pub const MAX_DOMAIN_LENGTH: usize = 253;

/// The prefix that marks a Punycode-encoded label.
pub const ACE_PREFIX: &str = "xn--";

/// The reason a domain name or label was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Nothing was left of the domain after mapping and normalization.
    #[error("domain name is empty after mapping")]
    EmptyDomain,
    /// An empty label somewhere other than a permitted leading dot or the
    /// trailing root label.
    #[error("empty label in domain name")]
    EmptyLabel,
    #[error("label is longer than 63 characters")]
    LabelTooLong,
    #[error("domain name is longer than 253 characters")]
    DomainTooLong,
    /// An ASCII character outside letters, digits, `-`, `_` and `.`.
    #[error("disallowed ASCII character {0:?}")]
    DisallowedAscii(char),
    /// A code point that UTS #46 never allows in a domain name.
    #[error("disallowed character {0:?}")]
    DisallowedCharacter(char),
    #[error("punycode arithmetic overflow")]
    PunycodeOverflow,
    #[error("malformed punycode")]
    InvalidPunycode,
    /// An ACE label with a misplaced hyphen or a character outside `[a-z0-9_-]`.
    #[error("invalid ASCII label")]
    InvalidAsciiLabel,
    /// An `xn--` label that decodes to something that is not a valid label.
    #[error("invalid A-label: {0}")]
    InvalidAceLabel(#[from] LabelError),
}

/// A successful result that tells apart "nothing to do" from "converted".
///
/// An empty string is a legitimate output in a few places (an empty
/// domain, the root label), so it never doubles as a failure signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The input needs no conversion and is its own output.
    Unchanged,
    /// The converted value.
    Transformed(T),
}

impl<T> Outcome<T> {
    /// The converted value, or `unchanged` if there was nothing to convert.
    pub fn unwrap_or(self, unchanged: T) -> T {
        match self {
            Outcome::Unchanged => unchanged,
            Outcome::Transformed(value) => value,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Outcome::Unchanged)
    }
}

/// The ACE form of `domain`.
///
/// Leading dots are rejected and transitional processing is off.
pub fn domain_to_ascii(domain: &str) -> Result<Cow<'_, str>, Error> {
    AceConverter::new().convert(
        domain,
        AceOperation::ToAceOnly,
        LeadingDot::Forbid,
        AceOptions::default(),
    )
}

/// The form of `domain` suitable for showing to a user.
///
/// This is the Unicode form when the top-level domain is on the display
/// whitelist of `policy` and every label validates, and the ACE form
/// otherwise.
pub fn domain_to_unicode<'a>(
    domain: &'a str,
    policy: &Arc<DisplayPolicy>,
) -> Result<Cow<'a, str>, Error> {
    AceConverter::with_policy(Arc::clone(policy)).convert(
        domain,
        AceOperation::NormalizeAce,
        LeadingDot::Forbid,
        AceOptions::default(),
    )
}
