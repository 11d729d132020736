// Copyright 2016 The rust-url developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Unicode character data used by the mapper and the validator.
//!
//! Everything comes from the ICU4X data compiled into the binary. The
//! UTS #46 status of a code point is derived from the mapping itself, except
//! for the four deviation characters, which ICU4X leaves alone and which are
//! spelled out here.

use icu_normalizer::properties::CanonicalCombiningClassMap;
use icu_normalizer::uts46::Uts46Mapper;
use icu_normalizer::ComposingNormalizer;
use icu_properties::maps::{self, CodePointMapDataBorrowed};
use icu_properties::{
    BidiClass, CanonicalCombiningClass, GeneralCategory, GeneralCategoryGroup, JoiningType,
};
use smallvec::SmallVec;

pub(crate) const ZWNJ: char = '\u{200C}';
pub(crate) const ZWJ: char = '\u{200D}';

/// The status of a code point in the UTS #46 IDNA mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdnaStatus {
    Valid,
    Mapped,
    /// Valid under nontransitional processing, mapped under transitional.
    Deviation,
    Disallowed,
    Ignored,
}

/// The subset of Bidi_Class values that RFC 5893 distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BidiCategory {
    L,
    R,
    AL,
    EN,
    ES,
    ET,
    AN,
    CS,
    NSM,
    BN,
    ON,
    Other,
}

impl BidiCategory {
    /// R, AL and AN make a label, and with it the whole domain, bidi.
    pub(crate) fn is_rtl(self) -> bool {
        matches!(self, BidiCategory::R | BidiCategory::AL | BidiCategory::AN)
    }
}

/// Joining_Type values as the CONTEXTJ rule for ZWNJ reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinKind {
    Left,
    Right,
    Dual,
    Transparent,
    Other,
}

/// Handles to the Unicode data.
///
/// Construction is cheap, it only wires up references to baked data, but
/// some of the handles are not `Sync`: every thread builds its own.
pub struct UnicodeData {
    mapper: Uts46Mapper,
    nfc: ComposingNormalizer,
    ccc: CanonicalCombiningClassMap,
    general_category: CodePointMapDataBorrowed<'static, GeneralCategory>,
    bidi_class: CodePointMapDataBorrowed<'static, BidiClass>,
    joining_type: CodePointMapDataBorrowed<'static, JoiningType>,
}

impl Default for UnicodeData {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UnicodeData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnicodeData").finish_non_exhaustive()
    }
}

impl UnicodeData {
    pub fn new() -> Self {
        Self {
            mapper: Uts46Mapper::new(),
            nfc: ComposingNormalizer::new_nfc(),
            ccc: CanonicalCombiningClassMap::new(),
            general_category: maps::general_category(),
            bidi_class: maps::bidi_class(),
            joining_type: maps::joining_type(),
        }
    }

    /// The UTS #46 status of a non-ASCII code point.
    ///
    /// ASCII is handled by the callers with the STD3 rules.
    pub fn idna_status(&self, c: char) -> IdnaStatus {
        if deviation(c).is_some() {
            return IdnaStatus::Deviation;
        }
        let mut mapped = self.mapper.map_normalize(std::iter::once(c));
        match (mapped.next(), mapped.next()) {
            (None, _) => IdnaStatus::Ignored,
            (Some('\u{FFFD}'), None) => IdnaStatus::Disallowed,
            (Some(m), None) if m == c => IdnaStatus::Valid,
            _ => IdnaStatus::Mapped,
        }
    }

    /// The replacement of `c` under the mapping table.
    ///
    /// Deviations map only under transitional processing, and disallowed
    /// code points come back as U+FFFD.
    pub fn mapping(&self, c: char, transitional: bool) -> SmallVec<[char; 4]> {
        if let Some(replacement) = deviation(c) {
            return if transitional {
                replacement.chars().collect()
            } else {
                SmallVec::from_elem(c, 1)
            };
        }
        self.mapper.map_normalize(std::iter::once(c)).collect()
    }

    pub fn normalize(&self, text: &str) -> String {
        self.nfc.normalize(text)
    }

    pub fn is_nfc(&self, label: &[char]) -> bool {
        self.nfc.normalize_iter(label.iter().copied()).eq(label.iter().copied())
    }

    pub(crate) fn is_mark(&self, c: char) -> bool {
        GeneralCategoryGroup::Mark.contains(self.general_category.get(c))
    }

    pub(crate) fn is_virama(&self, c: char) -> bool {
        self.ccc.get(c) == CanonicalCombiningClass::Virama
    }

    pub(crate) fn bidi_category(&self, c: char) -> BidiCategory {
        match self.bidi_class.get(c) {
            BidiClass::LeftToRight => BidiCategory::L,
            BidiClass::RightToLeft => BidiCategory::R,
            BidiClass::ArabicLetter => BidiCategory::AL,
            BidiClass::EuropeanNumber => BidiCategory::EN,
            BidiClass::EuropeanSeparator => BidiCategory::ES,
            BidiClass::EuropeanTerminator => BidiCategory::ET,
            BidiClass::ArabicNumber => BidiCategory::AN,
            BidiClass::CommonSeparator => BidiCategory::CS,
            BidiClass::NonspacingMark => BidiCategory::NSM,
            BidiClass::BoundaryNeutral => BidiCategory::BN,
            BidiClass::OtherNeutral => BidiCategory::ON,
            _ => BidiCategory::Other,
        }
    }

    pub(crate) fn join_kind(&self, c: char) -> JoinKind {
        match self.joining_type.get(c) {
            JoiningType::LeftJoining => JoinKind::Left,
            JoiningType::RightJoining => JoinKind::Right,
            JoiningType::DualJoining => JoinKind::Dual,
            JoiningType::Transparent => JoinKind::Transparent,
            _ => JoinKind::Other,
        }
    }
}

/// The transitional replacement of a deviation character.
fn deviation(c: char) -> Option<&'static str> {
    match c {
        '\u{00DF}' => Some("ss"),
        '\u{03C2}' => Some("\u{03C3}"),
        ZWNJ | ZWJ => Some(""),
        _ => None,
    }
}
