//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Csv(csv::Error),
    Serde(serde_json::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Http(reqwest::Error),
    FastText(String),
    Backend(String),
    InvalidDevice(String),
    /// A configured field is absent from the input header.
    MissingColumn(String),
    /// A chunk could not be read, labeled or persisted.
    ChunkFailed {
        ordinal: usize,
        source: Box<Error>,
    },
    /// Ordinals in `1..=max` that have no artifact.
    MissingChunks(Vec<usize>),
    /// No chunk artifact at all in the provided directory.
    NoChunks(PathBuf),
    SchemaMismatch {
        ordinal: usize,
    },
    ArtifactExists(PathBuf),
    Custom(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Csv(e) => write!(f, "csv error: {e}"),
            Error::Serde(e) => write!(f, "serialization error: {e}"),
            Error::Glob(e) => write!(f, "glob error: {e}"),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {e}"),
            Error::Http(e) => write!(f, "http error: {e}"),
            Error::FastText(e) => write!(f, "fasttext error: {e}"),
            Error::Backend(e) => write!(f, "backend error: {e}"),
            Error::InvalidDevice(d) => write!(f, "invalid device selector: {d:?}"),
            Error::MissingColumn(c) => write!(f, "column {c:?} not found in input header"),
            Error::ChunkFailed { ordinal, source } => {
                write!(f, "chunk {ordinal} failed: {source}")
            }
            Error::MissingChunks(gaps) => {
                write!(f, "incomplete batch, missing chunks: {gaps:?}")
            }
            Error::NoChunks(dir) => write!(f, "no chunk artifacts found in {dir:?}"),
            Error::SchemaMismatch { ordinal } => {
                write!(f, "chunk {ordinal} header differs from previous chunks")
            }
            Error::ArtifactExists(p) => write!(f, "artifact {p:?} already exists"),
            Error::Custom(s) => write!(f, "{s}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Serde(e) => Some(e),
            Error::Http(e) => Some(e),
            Error::ChunkFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Attach a chunk ordinal to an error, making it run-terminating.
    pub fn in_chunk(self, ordinal: usize) -> Error {
        Error::ChunkFailed {
            ordinal,
            source: Box::new(self),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn chunk_failure_keeps_cause() {
        let e = Error::Custom("disk full".to_string()).in_chunk(4);
        assert_eq!(e.to_string(), "chunk 4 failed: disk full");
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn incomplete_and_empty_are_distinct() {
        let missing = Error::MissingChunks(vec![2]).to_string();
        let none = Error::NoChunks("chunks".into()).to_string();
        assert!(missing.contains("[2]"));
        assert!(none.contains("no chunk artifacts"));
    }
}
