/*! Checkpointed batch runner

Walks a chunked input stream, labels the chunks that have no artifact yet and persists each of them
as soon as it is done.

```text
Scanning -> (Processing(n) | Skipping(n))* -> Assembling -> Done
                  |
                  +-> Aborted(n)
```

- *Scanning* lists the artifacts already on disk. Artifact presence is the only progress record:
  there is no separate ledger that could drift from what is on disk.
- Chunks with an artifact are skipped, the others are processed then persisted, strictly one at a time and in order.
- A chunk-level failure stops the run, leaving previous artifacts untouched. Re-running the batch resumes from
  the failed chunk.
- If a final destination is set, the artifacts are assembled once the stream is exhausted.

Concurrent runs on the same chunk directory are not supported.
!*/
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::Serialize;

use crate::error::Error;
use crate::io::{Chunk, ChunkStore, Schema};

use super::assemble::{gaps, ResultAssembler};
use super::chunk::ChunkProcessor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Scanning,
    Processing(usize),
    Skipping(usize),
    Assembling,
    Done,
    Aborted(usize),
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of chunks in the input stream.
    pub chunks: usize,
    pub processed: Vec<usize>,
    pub skipped: Vec<usize>,
    /// Labeled records (processed chunks only).
    pub records: usize,
    pub unknown: usize,
    pub errors: usize,
    pub assembled: Option<PathBuf>,
}

/// Chunk directory progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: Vec<usize>,
    /// Ordinals below the highest completed one that have no artifact.
    pub missing: Vec<usize>,
}

/// Scan a chunk directory without processing nor modifying anything.
///
/// Safe to call while a run is writing to the same directory.
pub fn progress(store: &ChunkStore) -> Result<Progress, Error> {
    let completed = store.completed()?;
    Ok(Progress {
        missing: gaps(&completed),
        completed: completed.into_iter().collect(),
    })
}

pub struct BatchRunner<'a> {
    store: ChunkStore,
    processor: ChunkProcessor<'a>,
    output: Option<PathBuf>,
    checksum: bool,
    state: RunState,
}

impl<'a> BatchRunner<'a> {
    pub fn new(store: ChunkStore, processor: ChunkProcessor<'a>) -> Self {
        Self {
            store,
            processor,
            output: None,
            checksum: false,
            state: RunState::Scanning,
        }
    }

    /// Assemble the chunks into `dst` at the end of the run.
    pub fn output(mut self, dst: &Path) -> Self {
        self.output = Some(dst.to_path_buf());
        self
    }

    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Run over `chunks`, whose records follow `schema`.
    ///
    /// # Errors
    /// - Any error while scanning the chunk directory,
    /// - [Error::ChunkFailed] if a chunk could not be read, labeled or persisted,
    /// - Any assembly error.
    pub fn run<I>(&mut self, chunks: I, schema: &Schema) -> Result<RunSummary, Error>
    where
        I: IntoIterator<Item = Chunk>,
    {
        self.state = RunState::Scanning;
        let removed = self.store.remove_partials()?;
        if removed > 0 {
            warn!("removed {} interrupted write(s)", removed);
        }
        let completed = self.store.completed()?;
        info!(
            "{} completed chunk(s) found in {:?}",
            completed.len(),
            self.store.dir()
        );

        let mut summary = RunSummary::default();
        for chunk in chunks {
            let ordinal = chunk.ordinal;
            summary.chunks = ordinal;

            if completed.contains(&ordinal) {
                self.state = RunState::Skipping(ordinal);
                info!("[chunk {}] already done, skipping", ordinal);
                summary.skipped.push(ordinal);
                continue;
            }

            self.state = RunState::Processing(ordinal);
            match self.process(chunk, schema) {
                Ok((records, unknown, errors)) => {
                    summary.processed.push(ordinal);
                    summary.records += records;
                    summary.unknown += unknown;
                    summary.errors += errors;
                }
                Err(e) => {
                    error!("[chunk {}] failed: {}", ordinal, e);
                    self.state = RunState::Aborted(ordinal);
                    return Err(e.in_chunk(ordinal));
                }
            }
        }

        let beyond: Vec<&usize> = completed.range(summary.chunks + 1..).collect();
        if !beyond.is_empty() {
            warn!(
                "artifacts beyond the end of the input (was chunk size changed?): {:?}",
                beyond
            );
        }

        if let Some(dst) = &self.output {
            if summary.chunks == 0 {
                warn!("empty input, nothing to assemble");
            } else {
                self.state = RunState::Assembling;
                let ordinals: Vec<usize> = (1..=summary.chunks).collect();
                let assembled = ResultAssembler::new(&self.store)
                    .checksum(self.checksum)
                    .assemble(&ordinals, dst)?;
                summary.assembled = Some(assembled.path);
            }
        }

        self.state = RunState::Done;
        info!(
            "done: {} chunk(s) processed, {} skipped",
            summary.processed.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Label then persist a chunk, returning record and sentinel counts.
    fn process(&self, chunk: Chunk, schema: &Schema) -> Result<(usize, usize, usize), Error> {
        let ordinal = chunk.ordinal;
        let records = chunk.records?;
        info!("[chunk {}] processing {} records", ordinal, records.len());

        let labeled = self.processor.process(&records, schema)?;
        let path = self
            .store
            .persist(ordinal, labeled.schema.headers(), &labeled.rows)?;

        let (unknown, errors) = labeled.sentinels();
        info!(
            "[chunk {}] saved to {:?} ({} unknown, {} error)",
            ordinal, path, unknown, errors
        );
        Ok((records.len(), unknown, errors))
    }
}

#[cfg(test)]
mod tests {
    use csv::StringRecord;

    use super::*;
    use crate::io::ChunkReader;
    use crate::labels::{LabelBackend, Model};

    struct JoyModel;

    impl Model for JoyModel {
        fn infer(&self, _text: &str) -> Result<String, Error> {
            Ok("joy".to_string())
        }

        fn name(&self) -> &str {
            "joy"
        }
    }

    const DATA: &str = "comment_id,clean_text\n1,a\n2,b\n3,c\n4,\n5,e\n";

    fn reader(data: &'static str) -> ChunkReader<&'static [u8]> {
        ChunkReader::new(csv::Reader::from_reader(data.as_bytes()), 2).unwrap()
    }

    #[test]
    fn full_run() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LabelBackend::new(Box::new(JoyModel));
        let store = ChunkStore::new(&dir.path().join("chunks")).unwrap();
        let dst = dir.path().join("final.csv");
        let mut runner =
            BatchRunner::new(store, ChunkProcessor::new(&backend, "clean_text")).output(&dst);

        let chunks = reader(DATA);
        let schema = chunks.schema().clone();
        let summary = runner.run(chunks, &schema).unwrap();

        assert_eq!(runner.state(), RunState::Done);
        assert_eq!(summary.chunks, 3);
        assert_eq!(summary.processed, vec![1, 2, 3]);
        assert_eq!(summary.records, 5);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.assembled, Some(dst.clone()));
        assert_eq!(
            std::fs::read_to_string(&dst).unwrap(),
            "comment_id,clean_text,predicted_emotion\n1,a,joy\n2,b,joy\n3,c,joy\n4,,unknown\n5,e,joy\n"
        );
    }

    #[test]
    fn rerun_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LabelBackend::new(Box::new(JoyModel));
        let store = ChunkStore::new(dir.path()).unwrap();

        let mut runner = BatchRunner::new(store.clone(), ChunkProcessor::new(&backend, "clean_text"));
        let chunks = reader(DATA);
        let schema = chunks.schema().clone();
        runner.run(chunks, &schema).unwrap();

        let mut runner = BatchRunner::new(store, ChunkProcessor::new(&backend, "clean_text"));
        let summary = runner.run(reader(DATA), &schema).unwrap();
        assert!(summary.processed.is_empty());
        assert_eq!(summary.skipped, vec![1, 2, 3]);
        assert_eq!(runner.state(), RunState::Done);
    }

    #[test]
    fn broken_chunk_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LabelBackend::new(Box::new(JoyModel));
        let store = ChunkStore::new(dir.path()).unwrap();
        let mut runner = BatchRunner::new(store.clone(), ChunkProcessor::new(&backend, "clean_text"));

        // third row has a missing field
        let chunks = reader("comment_id,clean_text\n1,a\n2,b\n3\n4,d\n5,e\n");
        let schema = chunks.schema().clone();
        let res = runner.run(chunks, &schema);

        assert!(matches!(res, Err(Error::ChunkFailed { ordinal: 2, .. })));
        assert_eq!(runner.state(), RunState::Aborted(2));
        let done: Vec<usize> = store.completed().unwrap().into_iter().collect();
        assert_eq!(done, vec![1]);
    }

    #[test]
    fn progress_reports_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkStore::new(dir.path()).unwrap();
        let header = StringRecord::from(vec!["id"]);
        let rows: Vec<StringRecord> = Vec::new();
        store.persist(1, &header, &rows).unwrap();
        store.persist(4, &header, &rows).unwrap();

        let p = progress(&store).unwrap();
        assert_eq!(p.completed, vec![1, 4]);
        assert_eq!(p.missing, vec![2, 3]);
    }

    #[test]
    fn progress_leaves_inflight_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkStore::new(dir.path()).unwrap();
        store
            .persist(1, &StringRecord::from(vec!["id"]), &Vec::<StringRecord>::new())
            .unwrap();
        let partial = dir.path().join("chunk_2.csv.partial");
        std::fs::write(&partial, "id\n").unwrap();

        let p = progress(&store).unwrap();
        assert_eq!(p.completed, vec![1]);
        assert!(p.missing.is_empty());
        assert!(partial.exists());
    }
}
