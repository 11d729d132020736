// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [Validity criteria](http://www.unicode.org/reports/tr46/#Validity_Criteria)
//! for the labels of a domain name.

use crate::ace::AceOptions;
use crate::mapper::is_label_ascii;
use crate::tables::{BidiCategory, IdnaStatus, JoinKind, UnicodeData, ZWJ, ZWNJ};

/// Why a label is not a valid IDNA label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LabelError {
    #[error("label is not in Normalization Form C")]
    NotNfc,
    /// A leading or trailing hyphen, or hyphens in both the third and the
    /// fourth position.
    #[error("misplaced hyphen")]
    HyphenPosition,
    #[error("label contains a full stop")]
    ContainsDot,
    #[error("label begins with a combining mark")]
    LeadingMark,
    #[error("code point {0:?} is not valid in a label")]
    Status(char),
    /// A deviation character under transitional processing.
    #[error("deviation character {0:?} under transitional processing")]
    Deviation(char),
    #[error("joiner outside of the contexts RFC 5892 allows")]
    ContextJ,
    #[error("label violates the RFC 5893 Bidi rule")]
    Bidi,
}

impl LabelError {
    /// Whether the label is invalid on its own, regardless of its neighbours
    /// or of the processing mode.
    pub fn is_local(self) -> bool {
        !matches!(
            self,
            LabelError::Deviation(_) | LabelError::ContextJ | LabelError::Bidi
        )
    }
}

/// Checks the labels of one domain name, in order.
///
/// The Bidi rule applies to every label once any label of the domain is
/// right-to-left, so a violation in an early left-to-right label only
/// surfaces when a later label turns out to be right-to-left.
pub struct DomainValidityChecker<'d> {
    data: &'d UnicodeData,
    domain_is_bidi: bool,
    had_bidi_errors: bool,
}

impl<'d> DomainValidityChecker<'d> {
    pub fn new(data: &'d UnicodeData) -> Self {
        Self {
            data,
            domain_is_bidi: false,
            had_bidi_errors: false,
        }
    }

    pub fn check_label(&mut self, label: &[char], options: AceOptions) -> Result<(), LabelError> {
        let first = match label.first() {
            Some(&first) => first,
            None => return Ok(()),
        };

        if !self.data.is_nfc(label) {
            return Err(LabelError::NotNfc);
        }
        if label.len() >= 4 && label[2] == '-' && label[3] == '-' {
            return Err(LabelError::HyphenPosition);
        }
        if first == '-' || label.last() == Some(&'-') {
            return Err(LabelError::HyphenPosition);
        }
        if label.contains(&'.') {
            return Err(LabelError::ContainsDot);
        }
        if self.data.is_mark(first) {
            return Err(LabelError::LeadingMark);
        }

        let mut deviation = None;
        let mut has_joiners = false;
        for &c in label {
            if c.is_ascii() {
                if !is_label_ascii(c) {
                    return Err(LabelError::Status(c));
                }
                continue;
            }
            match self.data.idna_status(c) {
                IdnaStatus::Valid => {}
                IdnaStatus::Deviation => {
                    if options.transitional_processing && deviation.is_none() {
                        deviation = Some(c);
                    }
                    has_joiners |= c == ZWJ || c == ZWNJ;
                }
                _ => return Err(LabelError::Status(c)),
            }
        }

        if !self.domain_is_bidi && label.iter().any(|&c| self.data.bidi_category(c).is_rtl()) {
            self.domain_is_bidi = true;
            if self.had_bidi_errors {
                return Err(LabelError::Bidi);
            }
        }

        if has_joiners && !passes_context_j(self.data, label) {
            return Err(LabelError::ContextJ);
        }
        if let Some(c) = deviation {
            return Err(LabelError::Deviation(c));
        }

        if !passes_bidi(self.data, label) {
            self.had_bidi_errors = true;
            if self.domain_is_bidi {
                return Err(LabelError::Bidi);
            }
        }
        Ok(())
    }
}

/// Where a ZWNJ stands in the `(L|D) T* ZWNJ T* (R|D)` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinState {
    /// No left-joining context.
    Initial,
    /// After an L or D code point, possibly followed by transparent ones.
    LeftJoinable,
    /// After a ZWNJ justified by its left context, waiting for R or D.
    AwaitingRight,
}

/// The CONTEXTJ rules of [RFC 5892](https://tools.ietf.org/html/rfc5892#appendix-A.1).
fn passes_context_j(data: &UnicodeData, label: &[char]) -> bool {
    let mut state = JoinState::Initial;
    let mut previous_is_virama = false;
    for &c in label {
        state = match (c, state) {
            (_, JoinState::AwaitingRight) if c == ZWJ || c == ZWNJ => return false,
            (ZWJ, _) if !previous_is_virama => return false,
            (ZWJ, _) => JoinState::Initial,
            (ZWNJ, _) if previous_is_virama => JoinState::Initial,
            (ZWNJ, JoinState::LeftJoinable) => JoinState::AwaitingRight,
            (ZWNJ, _) => return false,
            (_, JoinState::AwaitingRight) => match data.join_kind(c) {
                JoinKind::Transparent => JoinState::AwaitingRight,
                JoinKind::Dual => JoinState::LeftJoinable,
                JoinKind::Right => JoinState::Initial,
                JoinKind::Left | JoinKind::Other => return false,
            },
            (_, state) => match data.join_kind(c) {
                JoinKind::Transparent => state,
                JoinKind::Left | JoinKind::Dual => JoinState::LeftJoinable,
                JoinKind::Right | JoinKind::Other => JoinState::Initial,
            },
        };
        previous_is_virama = data.is_virama(c);
    }
    state != JoinState::AwaitingRight
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

/// The Bidi rule of [RFC 5893](https://tools.ietf.org/html/rfc5893#section-2).
fn passes_bidi(data: &UnicodeData, label: &[char]) -> bool {
    use BidiCategory::*;

    let mut categories = label.iter().map(|&c| data.bidi_category(c));
    // Rule 1
    let direction = match categories.next() {
        Some(L) => Direction::LeftToRight,
        Some(R) | Some(AL) => Direction::RightToLeft,
        _ => return false,
    };
    let mut tail_ok = true;
    let (mut has_en, mut has_an) = (false, false);
    for category in categories {
        match direction {
            Direction::LeftToRight => {
                // Rule 5
                if !matches!(category, L | EN | ES | CS | ET | ON | BN | NSM) {
                    return false;
                }
                // Rule 6
                if category != NSM {
                    tail_ok = matches!(category, L | EN);
                }
            }
            Direction::RightToLeft => {
                // Rule 2
                if !matches!(category, R | AL | AN | EN | ES | CS | ET | ON | BN | NSM) {
                    return false;
                }
                // Rule 3
                if category != NSM {
                    tail_ok = matches!(category, R | AL | EN | AN);
                }
                has_en |= category == EN;
                has_an |= category == AN;
            }
        }
    }
    // Rule 4
    tail_ok && !(has_en && has_an)
}
