// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Which top-level domains may be shown in Unicode.
//!
//! A Unicode host is only shown to the user under a TLD whose registry is
//! known to police homograph registrations. Everywhere else the ACE form is
//! shown, so `xn--80ak6aa92e.com` never masquerades as `apple.com`.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Top-level domains whose registries enforce anti-homograph policies.
///
/// Sorted, for binary search.
pub const BUILTIN_WHITELIST: &[&str] = &[
    "ac",
    "ar",
    "asia",
    "at",
    "biz",
    "br",
    "cat",
    "ch",
    "cl",
    "cn",
    "com",
    "de",
    "dk",
    "er",
    "es",
    "fi",
    "gr",
    "hu",
    "il",
    "info",
    "io",
    "ir",
    "is",
    "jp",
    "kr",
    "li",
    "lt",
    "lu",
    "lv",
    "museum",
    "name",
    "net",
    "no",
    "nu",
    "nz",
    "org",
    "pl",
    "pr",
    "se",
    "sh",
    "tel",
    "th",
    "tm",
    "tw",
    "ua",
    "vn",
    "xn--fiqs8s", // China
    "xn--fiqz9s", // China
    "xn--fzc2c9e2c", // Sri Lanka
    "xn--j6w193g", // Hong Kong
    "xn--kprw13d", // Taiwan
    "xn--kpry57d", // Taiwan
    "xn--mgba3a4f16a", // Iran
    "xn--mgba3a4fra", // Iran
    "xn--mgbaam7a8h", // UAE
    "xn--mgbayh7gpa", // Jordan
    "xn--mgberp4a5d4ar", // Saudi Arabia
    "xn--ogbpf8fl", // Syria
    "xn--p1ai", // Russian Federation
    "xn--wgbh1c", // Egypt
    "xn--wgbl6a", // Qatar
    "xn--xkc2al3hye2a", // Sri Lanka
];

/// The set of TLDs under which Unicode hosts are displayed.
///
/// Holds an optional user list that replaces the built-in one. Install it
/// before sharing the policy with other threads: a concurrent
/// [`set_whitelist`](Self::set_whitelist) is memory-safe, but conversions
/// running at the same time may see either list.
#[derive(Debug, Default)]
pub struct DisplayPolicy {
    user_whitelist: ArcSwapOption<Vec<String>>,
}

impl DisplayPolicy {
    /// A policy using [`BUILTIN_WHITELIST`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the TLD of `ace_domain` allows displaying it in Unicode.
    ///
    /// `ace_domain` is expected in the lowercase ACE form the converter
    /// produces. A trailing root dot is ignored. A domain without a dot has
    /// no TLD and is never eligible.
    pub fn is_display_eligible(&self, ace_domain: &str) -> bool {
        let domain = ace_domain.strip_suffix('.').unwrap_or(ace_domain);
        let tld = match domain.rfind('.') {
            Some(dot) => &domain[dot + 1..],
            None => return false,
        };
        match &*self.user_whitelist.load() {
            Some(list) => list.iter().any(|entry| entry == tld),
            None => BUILTIN_WHITELIST.binary_search(&tld).is_ok(),
        }
    }

    /// The list currently in effect.
    pub fn whitelist(&self) -> Vec<String> {
        match &*self.user_whitelist.load() {
            Some(list) => list.to_vec(),
            None => BUILTIN_WHITELIST.iter().map(|&tld| tld.to_owned()).collect(),
        }
    }

    /// Replace the built-in list with `list`.
    ///
    /// Entries are compared against the ACE form of the TLD, so `рф` has to
    /// be given as `xn--p1ai`.
    pub fn set_whitelist<I, S>(&self, list: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = list.into_iter().map(Into::into).collect();
        tracing::trace!(entries = list.len(), "installing user IDN whitelist");
        self.user_whitelist.store(Some(Arc::new(list)));
    }

    /// Go back to the built-in list.
    pub fn clear_whitelist(&self) {
        tracing::trace!("restoring built-in IDN whitelist");
        self.user_whitelist.store(None);
    }
}
