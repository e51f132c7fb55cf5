//! Emotion labels.
use std::fmt;

use serde::{Deserialize, Serialize};

/// Emotion tags produced by the supported models.
pub const EMOTIONS: [&str; 8] = [
    "anger", "disgust", "fear", "joy", "love", "neutral", "sadness", "surprise",
];

const UNKNOWN: &str = "unknown";
const ERROR: &str = "error";

/// Label of a record.
///
/// [Label::Unknown] and [Label::Error] are sentinels: no classification took place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Emotion(String),
    /// Input was not usable text.
    Unknown,
    /// Backend invocation failed.
    Error,
}

impl Label {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Label::Unknown | Label::Error)
    }

    /// `true` if the label is one of [EMOTIONS].
    pub fn is_known(&self) -> bool {
        match self {
            Label::Emotion(e) => EMOTIONS.contains(&e.as_str()),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Label::Emotion(e) => e,
            Label::Unknown => UNKNOWN,
            Label::Error => ERROR,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        match s {
            UNKNOWN => Label::Unknown,
            ERROR => Label::Error,
            other => Label::Emotion(other.to_string()),
        }
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        match s.as_str() {
            UNKNOWN => Label::Unknown,
            ERROR => Label::Error,
            _ => Label::Emotion(s),
        }
    }
}

impl From<Label> for String {
    fn from(l: Label) -> Self {
        match l {
            Label::Emotion(e) => e,
            sentinel => sentinel.as_str().to_string(),
        }
    }
}
