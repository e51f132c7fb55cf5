/*! Final artifact assembly

Chunk artifacts are concatenated in ascending ordinal order into a single CSV file, without any deduplication
or schema change. Every artifact must share the same header.

Assembly refuses to run on an incomplete batch (any missing ordinal in `1..=max`), unless explicitly allowed to.
The final file is written next to its destination then renamed, and can be followed by a `sha384sum -c` compatible
checksum file.
!*/
use std::{
    collections::BTreeSet,
    ffi::OsString,
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use csv::ByteRecord;
use log::{debug, info, warn};
use sha2::{Digest, Sha384};

use crate::error::Error;
use crate::io::{open_writer, ChunkStore};

/// Ordinals of `1..=max(ordinals)` that are not in `ordinals`.
pub fn gaps(ordinals: &BTreeSet<usize>) -> Vec<usize> {
    match ordinals.iter().next_back() {
        Some(max) => (1..=*max).filter(|o| !ordinals.contains(o)).collect(),
        None => Vec::new(),
    }
}

/// Result of an assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub path: PathBuf,
    /// Ordinals that have been concatenated, in order.
    pub ordinals: Vec<usize>,
    /// Ordinals that were missing and skipped (partial assembly only).
    pub missing: Vec<usize>,
    pub rows: usize,
    pub checksum: Option<PathBuf>,
}

pub struct ResultAssembler<'a> {
    store: &'a ChunkStore,
    allow_partial: bool,
    checksum: bool,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(store: &'a ChunkStore) -> Self {
        Self {
            store,
            allow_partial: false,
            checksum: false,
        }
    }

    /// Skip missing chunks instead of failing.
    pub fn allow_partial(mut self, allow_partial: bool) -> Self {
        self.allow_partial = allow_partial;
        self
    }

    /// Write a `<dst>.sha384` file along the final artifact.
    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Assemble every artifact present in the store.
    ///
    /// The store is only read: writes in progress are left alone.
    pub fn assemble_all(&self, dst: &Path) -> Result<Assembled, Error> {
        let completed = self.store.completed()?;
        let ordinals: Vec<usize> = completed.into_iter().collect();
        self.assemble(&ordinals, dst)
    }

    /// Concatenate the artifacts of `1..=max(ordinals)` into `dst`.
    ///
    /// # Errors
    /// - [Error::NoChunks] if `ordinals` is empty,
    /// - [Error::MissingChunks] if an ordinal of the range has no artifact and partial assembly is not allowed,
    /// - [Error::SchemaMismatch] if an artifact header differs from the first one.
    pub fn assemble(&self, ordinals: &[usize], dst: &Path) -> Result<Assembled, Error> {
        let max = match ordinals.iter().max() {
            Some(max) => *max,
            None => return Err(Error::NoChunks(self.store.dir().to_path_buf())),
        };

        let (present, missing): (Vec<usize>, Vec<usize>) =
            (1..=max).partition(|o| self.store.contains(*o));

        if !missing.is_empty() {
            if !self.allow_partial {
                return Err(Error::MissingChunks(missing));
            }
            warn!("assembling a partial batch, missing chunks: {:?}", missing);
        }
        if present.is_empty() {
            return Err(Error::NoChunks(self.store.dir().to_path_buf()));
        }

        let partial = partial_path(dst);
        let rows = match self.concatenate(&present, &partial) {
            Ok(rows) => rows,
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };
        std::fs::rename(&partial, dst)?;
        info!(
            "assembled {} chunk(s), {} rows into {:?}",
            present.len(),
            rows,
            dst
        );

        let checksum = if self.checksum {
            Some(write_checksum(dst)?)
        } else {
            None
        };

        Ok(Assembled {
            path: dst.to_path_buf(),
            ordinals: present,
            missing,
            rows,
            checksum,
        })
    }

    fn concatenate(&self, ordinals: &[usize], dst: &Path) -> Result<usize, Error> {
        let mut writer = open_writer(dst)?;
        let mut header: Option<ByteRecord> = None;
        let mut rows = 0;
        let mut record = ByteRecord::new();

        for ordinal in ordinals {
            let mut reader = self.store.open(*ordinal)?;
            let chunk_header = reader.byte_headers()?.clone();
            match &header {
                Some(h) if h != &chunk_header => {
                    return Err(Error::SchemaMismatch { ordinal: *ordinal })
                }
                Some(_) => (),
                None => {
                    writer.write_byte_record(&chunk_header)?;
                    header = Some(chunk_header);
                }
            }

            debug!("[chunk {}] appending", ordinal);
            while reader.read_byte_record(&mut record)? {
                writer.write_byte_record(&record)?;
                rows += 1;
            }
        }

        writer.flush()?;
        Ok(rows)
    }
}

fn partial_path(dst: &Path) -> PathBuf {
    let mut name: OsString = dst.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

/// Write `<path>.sha384`, containing `<hash>  <filename>`.
fn write_checksum(path: &Path) -> Result<PathBuf, Error> {
    let mut hasher = Sha384::new();
    let mut f = File::open(path)?;
    io::copy(&mut f, &mut hasher)?;
    let hash = format!("{:x}", hasher.finalize());

    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .ok_or_else(|| Error::Custom(format!("invalid final artifact path: {:?}", path)))?;

    let mut checksum_path = path.as_os_str().to_owned();
    checksum_path.push(".sha384");
    let checksum_path = PathBuf::from(checksum_path);

    debug!("writing hash to: {:?}", checksum_path);
    let mut checksum_file = File::create(&checksum_path)?;
    writeln!(&mut checksum_file, "{}  {}", hash, filename)?;
    Ok(checksum_path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use csv::StringRecord;

    use super::*;

    fn store_with(dir: &Path, ordinals: &[usize]) -> ChunkStore {
        let store = ChunkStore::new(dir).unwrap();
        let header = StringRecord::from(vec!["id", "predicted_emotion"]);
        for o in ordinals {
            let rows = vec![StringRecord::from(vec![o.to_string(), "joy".to_string()])];
            store.persist(*o, &header, &rows).unwrap();
        }
        store
    }

    #[test]
    fn gaps_in_range() {
        let set: BTreeSet<usize> = [1, 2, 5].into_iter().collect();
        assert_eq!(gaps(&set), vec![3, 4]);
        assert!(gaps(&BTreeSet::new()).is_empty());
    }

    #[test]
    fn partial_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir.path().join("chunks"), &[1, 3]);
        let dst = dir.path().join("final.csv");

        let res = ResultAssembler::new(&store).assemble(&[1, 2, 3], &dst);
        assert!(matches!(res, Err(Error::MissingChunks(ref m)) if m == &vec![2]));
        assert!(!dst.exists());

        let assembled = ResultAssembler::new(&store)
            .allow_partial(true)
            .assemble(&[1, 2, 3], &dst)
            .unwrap();
        assert_eq!(assembled.ordinals, vec![1, 3]);
        assert_eq!(assembled.missing, vec![2]);
        assert_eq!(
            std::fs::read_to_string(&dst).unwrap(),
            "id,predicted_emotion\n1,joy\n3,joy\n"
        );
    }

    #[test]
    fn nothing_to_assemble() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir.path().join("chunks"), &[]);
        let res = ResultAssembler::new(&store).assemble_all(&dir.path().join("final.csv"));
        assert!(matches!(res, Err(Error::NoChunks(_))));
    }

    #[test]
    fn schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir.path().join("chunks"), &[1]);
        let other = StringRecord::from(vec!["id", "label"]);
        store
            .persist(2, &other, &[StringRecord::from(vec!["2", "joy"])])
            .unwrap();

        let res = ResultAssembler::new(&store).assemble_all(&dir.path().join("final.csv"));
        assert!(matches!(res, Err(Error::SchemaMismatch { ordinal: 2 })));
    }

    #[test]
    fn assembly_leaves_inflight_write() {
        let dir = tempfile::tempdir().unwrap();
        let chunks = dir.path().join("chunks");
        let store = store_with(&chunks, &[1]);
        let partial = chunks.join("chunk_2.csv.partial");
        std::fs::write(&partial, "id,predicted_emotion\n").unwrap();

        let assembled = ResultAssembler::new(&store)
            .assemble_all(&dir.path().join("final.csv"))
            .unwrap();
        assert_eq!(assembled.ordinals, vec![1]);
        assert!(partial.exists());
    }

    #[test]
    fn checksum_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(&dir.path().join("chunks"), &[1, 2]);
        let dst = dir.path().join("final.csv");

        let assembled = ResultAssembler::new(&store)
            .checksum(true)
            .assemble_all(&dst)
            .unwrap();
        assert_eq!(assembled.rows, 2);

        let checksum_path = assembled.checksum.unwrap();
        assert_eq!(checksum_path, dir.path().join("final.csv.sha384"));
        let content = std::fs::read_to_string(checksum_path).unwrap();
        let (hash, name) = content.trim_end().split_once("  ").unwrap();
        assert_eq!(hash.len(), 96);
        assert_eq!(name, "final.csv");
    }
}
