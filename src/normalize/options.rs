//! Normalizer configuration.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Toggles for each normalization stage.
///
/// Every stage is enabled by default and no punctuation is preserved,
/// which is the configuration used to clean the full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerOptions {
    pub strip_urls: bool,
    pub strip_mentions: bool,
    pub strip_hashtags: bool,
    pub strip_emoji: bool,
    pub lowercase: bool,
    /// Punctuation characters that survive punctuation stripping.
    pub preserved_punctuation: BTreeSet<char>,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            strip_urls: true,
            strip_mentions: true,
            strip_hashtags: true,
            strip_emoji: true,
            lowercase: true,
            preserved_punctuation: BTreeSet::new(),
        }
    }
}

impl NormalizerOptions {
    pub fn strip_urls(mut self, v: bool) -> Self {
        self.strip_urls = v;
        self
    }

    pub fn strip_mentions(mut self, v: bool) -> Self {
        self.strip_mentions = v;
        self
    }

    pub fn strip_hashtags(mut self, v: bool) -> Self {
        self.strip_hashtags = v;
        self
    }

    pub fn strip_emoji(mut self, v: bool) -> Self {
        self.strip_emoji = v;
        self
    }

    pub fn lowercase(mut self, v: bool) -> Self {
        self.lowercase = v;
        self
    }

    /// Keep every char of `chars` during punctuation stripping.
    ///
    /// Preserving `@` or `#` can make normalization non idempotent: stripping emoji may glue a marker
    /// back to a word, which the next pass then removes as a mention or hashtag.
    pub fn preserve(mut self, chars: &str) -> Self {
        self.preserved_punctuation.extend(chars.chars());
        self
    }
}
