//! Token patterns used by the normalizer.
//!
//! Compiled once per process.
use lazy_static::lazy_static;
use regex::Regex;

// emoji building blocks: pictographs, flag halves, skin tones, VS16 and keycap
const EMOJI_CLASS: &str =
    r"[\p{Extended_Pictographic}\p{Regional_Indicator}\p{Emoji_Modifier}\x{FE0F}\x{20E3}]";

lazy_static! {
    /// `scheme://` or `www.` prefixed tokens, up to the next whitespace.
    pub static ref URL: Regex =
        Regex::new(r"(?i)(?:\b[a-z][a-z0-9+.\-]*://|\bwww\.)\S+").unwrap();
    pub static ref MENTION: Regex = Regex::new(r"@\w+").unwrap();
    pub static ref HASHTAG: Regex = Regex::new(r"#\w+").unwrap();
    /// Emoji sequences, including ZWJ-joined ones (families, professions...)
    /// and dangling joiners around them.
    pub static ref EMOJI: Regex = Regex::new(&format!(
        r"\x{{200D}}?{EMOJI_CLASS}(?:\x{{200D}}?{EMOJI_CLASS})*\x{{200D}}?"
    ))
    .unwrap();
}
