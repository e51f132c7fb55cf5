//! Text normalizer.
use std::panic::{self, AssertUnwindSafe};

use itertools::Itertools;
use log::error;
use rayon::prelude::*;

use super::patterns::{EMOJI, HASHTAG, MENTION, URL};
use super::{NormalizerOptions, PunctuationFilter};

/// Stateless (per call) text normalizer.
///
/// `normalize` never fails: missing text yields an empty string,
/// and any fault during the rewriting of one text is logged and degrades to an empty string for that text only.
#[derive(Debug, Clone)]
pub struct Normalizer {
    options: NormalizerOptions,
    punctuation: PunctuationFilter,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerOptions::default())
    }
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        let punctuation = PunctuationFilter::new(options.preserved_punctuation.clone());
        Self {
            options,
            punctuation,
        }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalize a (possibly missing) text.
    pub fn normalize(&self, text: Option<&str>) -> String {
        let text = match text {
            Some(t) => t,
            None => return String::new(),
        };

        match panic::catch_unwind(AssertUnwindSafe(|| self.rewrite(text))) {
            Ok(normalized) => normalized,
            Err(_) => {
                error!("could not normalize text ({} bytes), using empty text", text.len());
                String::new()
            }
        }
    }

    /// Normalize a batch of texts concurrently.
    /// Output order is input order.
    pub fn normalize_all(&self, texts: &[Option<&str>]) -> Vec<String> {
        texts.par_iter().map(|t| self.normalize(*t)).collect()
    }

    fn rewrite(&self, text: &str) -> String {
        let mut text = text.to_string();

        if self.options.strip_urls {
            text = URL.replace_all(&text, "").into_owned();
        }
        if self.options.strip_mentions {
            text = MENTION.replace_all(&text, "").into_owned();
        }
        if self.options.strip_hashtags {
            text = HASHTAG.replace_all(&text, "").into_owned();
        }
        if self.options.strip_emoji {
            text = EMOJI.replace_all(&text, "").into_owned();
        }

        let text = self.punctuation.strip(&text);
        let text = text.split_whitespace().join(" ");

        if self.options.lowercase {
            text.to_lowercase()
        } else {
            text
        }
    }
}
