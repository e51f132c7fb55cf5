//! End-to-end emotion labeling of a CSV dataset.
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Error;
use crate::io::{ChunkReader, ChunkStore};
use crate::labels::{BackendBuilder, LabelBackend};
use crate::normalize::{Normalizer, NormalizerOptions};

use super::batch::{BatchRunner, RunSummary};
use super::chunk::{ChunkProcessor, DEFAULT_LABEL_FIELD, DEFAULT_NORMALIZED_FIELD};
use super::pipeline::Pipeline;

pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Labels `src` chunk by chunk into `chunk_dir`, then optionally assembles the result into `dst`.
///
/// The backend is built once, when the pipeline is run, and shared by every chunk.
pub struct EmotionLabeling {
    src: PathBuf,
    chunk_dir: PathBuf,
    dst: Option<PathBuf>,
    backend: BackendBuilder,
    chunk_size: usize,
    id_field: String,
    text_field: String,
    normalized_field: String,
    label_field: String,
    normalizer: Option<NormalizerOptions>,
    checksum: bool,
}

impl EmotionLabeling {
    pub fn new(src: PathBuf, chunk_dir: PathBuf, backend: BackendBuilder) -> Self {
        Self {
            src,
            chunk_dir,
            dst: None,
            backend,
            chunk_size: DEFAULT_CHUNK_SIZE,
            id_field: "comment_id".to_string(),
            text_field: DEFAULT_NORMALIZED_FIELD.to_string(),
            normalized_field: DEFAULT_NORMALIZED_FIELD.to_string(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
            normalizer: None,
            checksum: false,
        }
    }

    pub fn dst(mut self, dst: Option<PathBuf>) -> Self {
        self.dst = dst;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn id_field(mut self, field: &str) -> Self {
        self.id_field = field.to_string();
        self
    }

    pub fn text_field(mut self, field: &str) -> Self {
        self.text_field = field.to_string();
        self
    }

    pub fn normalized_field(mut self, field: &str) -> Self {
        self.normalized_field = field.to_string();
        self
    }

    pub fn label_field(mut self, field: &str) -> Self {
        self.label_field = field.to_string();
        self
    }

    /// Normalize the text field before labeling.
    /// Leave unset if the input has already been cleaned.
    pub fn normalize(mut self, options: Option<NormalizerOptions>) -> Self {
        self.normalizer = options;
        self
    }

    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    /// Run with an already built backend.
    pub fn run_with(&self, backend: &LabelBackend) -> Result<RunSummary, Error> {
        let chunks = ChunkReader::from_path(&self.src, self.chunk_size)?;
        let schema = chunks.schema().clone();
        schema.index_of(&self.id_field)?;
        schema.index_of(&self.text_field)?;

        let mut processor = ChunkProcessor::new(backend, &self.text_field)
            .normalized_field(&self.normalized_field)
            .label_field(&self.label_field);
        if let Some(options) = &self.normalizer {
            processor = processor.normalizer(Normalizer::new(options.clone()));
        }

        let store = ChunkStore::new(&self.chunk_dir)?;
        let mut runner = BatchRunner::new(store, processor).checksum(self.checksum);
        if let Some(dst) = &self.dst {
            runner = runner.output(dst);
        }

        info!(
            "labeling {:?} with {} ({} records per chunk)",
            self.src,
            backend.model_name(),
            self.chunk_size
        );
        runner.run(chunks, &schema)
    }
}

impl Pipeline<RunSummary> for EmotionLabeling {
    fn run(&self) -> Result<RunSummary, Error> {
        let backend = self.backend.build()?;
        self.run_with(&backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{BackendKind, Label, Model};

    struct LengthModel;

    impl Model for LengthModel {
        fn infer(&self, text: &str) -> Result<String, Error> {
            Ok(if text.len() > 5 { "joy" } else { "sadness" }.to_string())
        }

        fn name(&self) -> &str {
            "length"
        }
    }

    fn write_input(dir: &Path) -> PathBuf {
        let src = dir.join("raw.csv");
        std::fs::write(
            &src,
            "comment_id,self_text,subreddit\n\
             a1,@bob So happy today!!! http://x.y,r1\n\
             a2,,r2\n\
             a3,meh 😐,r1\n",
        )
        .unwrap();
        src
    }

    #[test]
    fn normalize_and_label() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_input(dir.path());
        let dst = dir.path().join("labeled.csv");

        let summary = EmotionLabeling::new(
            src,
            dir.path().join("chunks"),
            BackendBuilder::new(BackendKind::Classifier),
        )
        .text_field("self_text")
        .normalize(Some(NormalizerOptions::default()))
        .chunk_size(2)
        .dst(Some(dst.clone()))
        .run_with(&LabelBackend::new(Box::new(LengthModel)))
        .unwrap();

        assert_eq!(summary.processed, vec![1, 2]);
        assert_eq!(summary.unknown, 1);

        let mut r = csv::Reader::from_path(&dst).unwrap();
        assert_eq!(
            r.headers().unwrap(),
            &csv::StringRecord::from(vec![
                "comment_id",
                "self_text",
                "subreddit",
                "clean_text",
                "predicted_emotion"
            ])
        );
        let rows: Vec<csv::StringRecord> = r.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][3], "so happy today");
        assert_eq!(&rows[0][4], "joy");
        assert_eq!(&rows[1][4], Label::Unknown.as_str());
        assert_eq!(&rows[2][3], "meh");
        assert_eq!(&rows[2][4], "sadness");
    }

    #[test]
    fn missing_id_field() {
        let dir = tempfile::tempdir().unwrap();
        let src = write_input(dir.path());
        let res = EmotionLabeling::new(
            src,
            dir.path().join("chunks"),
            BackendBuilder::new(BackendKind::Classifier),
        )
        .id_field("id")
        .text_field("self_text")
        .run_with(&LabelBackend::new(Box::new(LengthModel)));
        assert!(matches!(res, Err(Error::MissingColumn(c)) if c == "id"));
        assert!(!dir.path().join("chunks").exists());
    }
}
