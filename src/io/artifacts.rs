/*! Chunk artifact storage

Each completed chunk is stored as `chunk_<ordinal>.csv` at the root of the store directory.

Artifacts are first written as `chunk_<ordinal>.csv.partial` then renamed,
so an interrupted write never leaves a file that could be mistaken for a completed chunk.
Artifacts are write-once: persisting an ordinal that already has an artifact is an error.
!*/
use std::{
    collections::BTreeSet,
    fs::File,
    path::{Path, PathBuf},
};

use csv::StringRecord;
use log::{debug, warn};

use crate::error::Error;

const PREFIX: &str = "chunk_";
const EXTENSION: &str = "csv";
const PARTIAL_SUFFIX: &str = ".partial";

#[derive(Debug, Clone)]
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    /// Open a store, creating its directory if needed.
    pub fn new(dir: &Path) -> Result<Self, Error> {
        if !dir.exists() {
            warn!("Chunk directory {:?} does not exist. Creating", dir);
            std::fs::create_dir_all(dir)?;
        }
        if !dir.is_dir() {
            return Err(Error::Custom(format!(
                "Chunk store has to be a directory: {dir:?}"
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, ordinal: usize) -> PathBuf {
        self.dir.join(format!("{PREFIX}{ordinal}.{EXTENSION}"))
    }

    fn partial_path(&self, ordinal: usize) -> PathBuf {
        self.dir
            .join(format!("{PREFIX}{ordinal}.{EXTENSION}{PARTIAL_SUFFIX}"))
    }

    /// Extract the ordinal from an artifact path.
    ///
    /// Only canonical names are accepted (`chunk_7.csv`, not `chunk_07.csv` nor `chunk_0.csv`).
    pub fn ordinal_of(path: &Path) -> Option<usize> {
        let name = path.file_name()?.to_str()?;
        let digits = name
            .strip_prefix(PREFIX)?
            .strip_suffix(EXTENSION)?
            .strip_suffix('.')?;
        let ordinal: usize = digits.parse().ok()?;
        (ordinal >= 1 && ordinal.to_string() == digits).then_some(ordinal)
    }

    fn glob(&self, suffix: &str) -> Result<glob::Paths, Error> {
        let dir = self
            .dir
            .to_str()
            .ok_or_else(|| Error::Custom(format!("invalid chunk directory: {:?}", self.dir)))?;
        let pattern = format!("{}/{PREFIX}*.{EXTENSION}{suffix}", glob::Pattern::escape(dir));
        Ok(glob::glob(&pattern)?)
    }

    /// Remove the leftovers of interrupted writes.
    ///
    /// Only the runner that owns the store may call this: a concurrent reader would delete
    /// the artifact being written.
    pub fn remove_partials(&self) -> Result<usize, Error> {
        let mut removed = 0;
        for partial in self.glob(PARTIAL_SUFFIX)? {
            let partial = partial?;
            debug!("removing interrupted write {:?}", partial);
            std::fs::remove_file(&partial)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// List completed ordinals. Does not modify the store.
    pub fn completed(&self) -> Result<BTreeSet<usize>, Error> {
        let mut completed = BTreeSet::new();
        for path in self.glob("")? {
            let path = path?;
            if !path.is_file() {
                warn!("ignoring {:?}: not a file", path);
                continue;
            }
            match Self::ordinal_of(&path) {
                Some(ordinal) => {
                    completed.insert(ordinal);
                }
                None => warn!("ignoring {:?}: not a chunk artifact name", path),
            }
        }
        Ok(completed)
    }

    pub fn contains(&self, ordinal: usize) -> bool {
        self.artifact_path(ordinal).is_file()
    }

    /// Write the artifact of `ordinal`.
    ///
    /// # Errors
    /// [Error::ArtifactExists] if the artifact is already there, or any IO/CSV error.
    /// On error, no artifact is visible for `ordinal`.
    pub fn persist<'a, I>(
        &self,
        ordinal: usize,
        header: &StringRecord,
        rows: I,
    ) -> Result<PathBuf, Error>
    where
        I: IntoIterator<Item = &'a StringRecord>,
    {
        let path = self.artifact_path(ordinal);
        if path.exists() {
            return Err(Error::ArtifactExists(path));
        }

        let partial = self.partial_path(ordinal);
        let written = Self::write_rows(&partial, header, rows);
        if let Err(e) = written {
            // best effort: a stale partial file is removed at next run anyway
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }

        std::fs::rename(&partial, &path)?;
        Ok(path)
    }

    fn write_rows<'a, I>(path: &Path, header: &StringRecord, rows: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a StringRecord>,
    {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(row)?;
        }
        let file: File = writer
            .into_inner()
            .map_err(|e| Error::Io(std::io::Error::new(e.error().kind(), e.to_string())))?;
        file.sync_all()?;
        Ok(())
    }

    /// Open the artifact of `ordinal` for reading.
    pub fn open(&self, ordinal: usize) -> Result<csv::Reader<File>, Error> {
        Ok(csv::Reader::from_path(self.artifact_path(ordinal))?)
    }
}
