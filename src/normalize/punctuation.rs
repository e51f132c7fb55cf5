/*! Punctuation stripping

A char is considered punctuation if it is either ASCII punctuation (``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``)
or belongs to one of the Unicode punctuation categories (`Pc`, `Pd`, `Ps`, `Pe`, `Pi`, `Pf`, `Po`).

Non-ASCII symbols (`€`, `°`...) are kept.
!*/
use std::collections::BTreeSet;

use unic_ucd::GeneralCategory;

#[derive(Debug, Clone, Default)]
pub struct PunctuationFilter {
    preserved: BTreeSet<char>,
}

impl PunctuationFilter {
    pub fn new(preserved: BTreeSet<char>) -> Self {
        Self { preserved }
    }

    #[inline]
    fn is_punctuation(c: char) -> bool {
        c.is_ascii_punctuation() || GeneralCategory::of(c).is_punctuation()
    }

    /// `true` if `c` has to be removed.
    #[inline]
    pub fn detect(&self, c: char) -> bool {
        Self::is_punctuation(c) && !self.preserved.contains(&c)
    }

    pub fn strip(&self, text: &str) -> String {
        text.chars().filter(|c| !self.detect(*c)).collect()
    }
}
