// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Conversion of whole domain names between Unicode and ACE.

use crate::mapper::{is_label_ascii, map_domain_name, Mapped};
use crate::policy::DisplayPolicy;
use crate::punycode;
use crate::tables::UnicodeData;
use crate::validator::DomainValidityChecker;
use crate::{Error, Outcome, ACE_PREFIX, MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH};
use std::borrow::Cow;
use std::sync::Arc;

/// What the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AceOperation {
    /// The ACE form, for the wire.
    ToAceOnly,
    /// The form to show a user: Unicode where that is safe, ACE otherwise.
    NormalizeAce,
}

/// Whether a domain may begin with a dot, as in cookie domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadingDot {
    Allow,
    Forbid,
}

/// Processing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct AceOptions {
    pub(crate) transitional_processing: bool,
    pub(crate) ignore_display_whitelist: bool,
    pub(crate) verify_dns_length: bool,
}

impl AceOptions {
    /// Whether to map the deviation characters (ß, ς, ZWJ and ZWNJ) the way
    /// IDNA 2003 did.
    #[inline]
    pub fn transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    /// Whether to show Unicode under any top-level domain, not just the ones
    /// on the display whitelist.
    #[inline]
    pub fn ignore_display_whitelist(mut self, value: bool) -> Self {
        self.ignore_display_whitelist = value;
        self
    }

    /// Whether to reject domains whose ACE form is longer than 253 bytes,
    /// not counting a trailing root dot.
    #[inline]
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }
}

/// Converts domain names to their ACE or display form.
///
/// Holds handles to Unicode data that are not `Sync`; give every thread its
/// own converter and share the [`DisplayPolicy`] between them.
#[derive(Debug)]
pub struct AceConverter {
    data: UnicodeData,
    policy: Arc<DisplayPolicy>,
}

impl Default for AceConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl AceConverter {
    /// A converter with its own policy using the built-in whitelist.
    pub fn new() -> Self {
        Self::with_policy(Arc::new(DisplayPolicy::new()))
    }

    pub fn with_policy(policy: Arc<DisplayPolicy>) -> Self {
        AceConverter {
            data: UnicodeData::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &Arc<DisplayPolicy> {
        &self.policy
    }

    /// Convert `domain`.
    ///
    /// Anything that cannot be a host name is an error. A valid name whose
    /// Unicode form is unsafe to show, because of its TLD or because a label
    /// fails the CONTEXTJ or Bidi rules, comes back in ACE form even for
    /// [`AceOperation::NormalizeAce`].
    pub fn convert<'a>(
        &self,
        domain: &'a str,
        operation: AceOperation,
        leading_dot: LeadingDot,
        options: AceOptions,
    ) -> Result<Cow<'a, str>, Error> {
        self.convert_utf8(domain.as_bytes(), operation, leading_dot, options)
    }

    /// Like [`convert`](Self::convert), for a host that has not been checked
    /// to be UTF-8 yet.
    pub fn convert_utf8<'a>(
        &self,
        domain: &'a [u8],
        operation: AceOperation,
        leading_dot: LeadingDot,
        options: AceOptions,
    ) -> Result<Cow<'a, str>, Error> {
        let result = self.process(domain, operation, leading_dot, options);
        if let Err(err) = &result {
            tracing::debug!(%err, "rejected domain name");
        }
        result
    }

    fn process<'a>(
        &self,
        domain: &'a [u8],
        operation: AceOperation,
        leading_dot: LeadingDot,
        options: AceOptions,
    ) -> Result<Cow<'a, str>, Error> {
        if domain.is_empty() {
            return Ok(Cow::Borrowed(""));
        }

        let Mapped { text, all_ascii } = map_domain_name(&self.data, domain, options)?;
        let ace = if all_ascii {
            text
        } else {
            let normalized = self.data.normalize(&text);
            if normalized.is_empty() {
                return Err(Error::EmptyDomain);
            }
            Cow::Owned(encode_labels(&normalized)?)
        };

        let uses_punycode = check_ascii_domain(&ace, leading_dot)?;
        if options.verify_dns_length {
            let without_root = ace.strip_suffix('.').unwrap_or(&ace);
            if without_root.len() > MAX_DOMAIN_LENGTH {
                return Err(Error::DomainTooLong);
            }
        }
        if !uses_punycode {
            return Ok(ace);
        }

        // Even the ACE form is only returned once every xn-- label is known
        // to decode to a valid label.
        let unicode = self.to_unicode_labels(&ace, options)?;
        if operation == AceOperation::ToAceOnly {
            return Ok(ace);
        }
        if !options.ignore_display_whitelist && !self.policy.is_display_eligible(&ace) {
            return Ok(ace);
        }
        match unicode {
            Some(unicode) => Ok(Cow::Owned(unicode)),
            None => {
                tracing::debug!(domain = %ace, "falling back to ACE for display");
                Ok(ace)
            }
        }
    }

    /// Decode and check every label of `ace`.
    ///
    /// Returns the Unicode form, or `None` if it is not fit for display.
    /// Labels that are not valid A-labels at all reject the domain.
    fn to_unicode_labels(&self, ace: &str, options: AceOptions) -> Result<Option<String>, Error> {
        let mut checker = DomainValidityChecker::new(&self.data);
        let mut unicode = String::with_capacity(ace.len());
        let mut displayable = true;
        let mut chars = Vec::new();
        for (i, label) in ace.split('.').enumerate() {
            if i > 0 {
                unicode.push('.');
            }
            match punycode::decode_label(label)? {
                Outcome::Transformed(decoded) => {
                    match punycode::encode_label(&decoded)? {
                        Outcome::Transformed(ref encoded) if encoded == label => {}
                        _ => return Err(Error::InvalidPunycode),
                    }
                    match checker.check_label(&decoded, options) {
                        Ok(()) => {}
                        Err(err) if err.is_local() => return Err(Error::InvalidAceLabel(err)),
                        Err(err) => {
                            tracing::debug!(label, %err, "label is not displayable");
                            displayable = false;
                        }
                    }
                    unicode.extend(decoded);
                }
                Outcome::Unchanged => {
                    chars.clear();
                    chars.extend(label.chars());
                    if let Err(err) = checker.check_label(&chars, options) {
                        tracing::debug!(label, %err, "label is not displayable");
                        displayable = false;
                    }
                    unicode.push_str(label);
                }
            }
        }
        Ok(if displayable { Some(unicode) } else { None })
    }
}

/// Punycode-encode the non-ASCII labels of a mapped and normalized domain.
fn encode_labels(domain: &str) -> Result<String, Error> {
    let mut ace = String::with_capacity(domain.len() + ACE_PREFIX.len());
    let mut chars = Vec::new();
    for (i, label) in domain.split('.').enumerate() {
        if i > 0 {
            ace.push('.');
        }
        chars.clear();
        chars.extend(label.chars());
        match punycode::encode_label(&chars)? {
            Outcome::Unchanged => ace.push_str(label),
            Outcome::Transformed(encoded) => ace.push_str(&encoded),
        }
    }
    Ok(ace)
}

/// Structural checks on an ACE domain. Returns whether any label carries
/// the `xn--` prefix.
fn check_ascii_domain(ace: &str, leading_dot: LeadingDot) -> Result<bool, Error> {
    let last = ace.split('.').count() - 1;
    let mut uses_punycode = false;
    for (i, label) in ace.split('.').enumerate() {
        if label.is_empty() {
            let leading = i == 0 && last > 0 && leading_dot == LeadingDot::Allow;
            let root = i > 0 && i == last;
            if leading || root {
                continue;
            }
            return Err(Error::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(Error::LabelTooLong);
        }
        if label.starts_with('-') || label.ends_with('-') || !label.chars().all(is_label_ascii) {
            return Err(Error::InvalidAsciiLabel);
        }
        uses_punycode |= label.starts_with(ACE_PREFIX);
    }
    Ok(uses_punycode)
}
