// Interrupt a labeling run on a given chunk, then re-run it:
// chunks persisted before the failure must be kept as is, and the run must complete from the failed chunk.
use std::path::{Path, PathBuf};

use emolabel::error::Error;
use emolabel::io::ChunkStore;
use emolabel::labels::{BackendBuilder, BackendKind, LabelBackend, Model};
use emolabel::pipelines::EmotionLabeling;

/// Always answers the same label.
struct ConstantModel(&'static str);

impl Model for ConstantModel {
    fn infer(&self, _text: &str) -> Result<String, Error> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        self.0
    }
}

fn backend(label: &'static str) -> LabelBackend {
    LabelBackend::new(Box::new(ConstantModel(label)))
}

fn write_input(path: &Path, broken_row: Option<usize>) {
    let mut content = String::from("comment_id,clean_text,subreddit\n");
    for i in 1..=7 {
        if Some(i) == broken_row {
            // missing a field
            content.push_str(&format!("{i},text {i}\n"));
        } else {
            content.push_str(&format!("{i},text {i},r/{i}\n"));
        }
    }
    std::fs::write(path, content).unwrap();
}

fn labeling(src: &Path, chunks: &Path, dst: Option<PathBuf>) -> EmotionLabeling {
    EmotionLabeling::new(
        src.to_path_buf(),
        chunks.to_path_buf(),
        BackendBuilder::new(BackendKind::Generative),
    )
    .chunk_size(2)
    .dst(dst)
}

fn completed(chunks: &Path) -> Vec<usize> {
    ChunkStore::new(chunks)
        .unwrap()
        .completed()
        .unwrap()
        .into_iter()
        .collect()
}

#[test_log::test]
fn resume_after_broken_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.csv");
    let chunks = dir.path().join("chunks");
    let dst = dir.path().join("labeled.csv");

    // row 5 is in chunk 3
    write_input(&src, Some(5));
    let res = labeling(&src, &chunks, Some(dst.clone())).run_with(&backend("joy"));
    assert!(matches!(res, Err(Error::ChunkFailed { ordinal: 3, .. })));
    assert_eq!(completed(&chunks), vec![1, 2]);
    assert!(!dst.exists());

    let store = ChunkStore::new(&chunks).unwrap();
    let first = std::fs::read(store.artifact_path(1)).unwrap();
    let second = std::fs::read(store.artifact_path(2)).unwrap();

    // a different model makes any recomputation visible
    write_input(&src, None);
    let summary = labeling(&src, &chunks, Some(dst.clone()))
        .run_with(&backend("anger"))
        .unwrap();

    assert_eq!(summary.skipped, vec![1, 2]);
    assert_eq!(summary.processed, vec![3, 4]);
    assert_eq!(completed(&chunks), vec![1, 2, 3, 4]);
    assert_eq!(std::fs::read(store.artifact_path(1)).unwrap(), first);
    assert_eq!(std::fs::read(store.artifact_path(2)).unwrap(), second);

    let labels: Vec<String> = csv::Reader::from_path(&dst)
        .unwrap()
        .records()
        .map(|r| r.unwrap()[3].to_string())
        .collect();
    assert_eq!(
        labels,
        vec!["joy", "joy", "joy", "joy", "anger", "anger", "anger"]
    );
}

#[test_log::test]
fn resume_after_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.csv");
    let chunks = dir.path().join("chunks");
    write_input(&src, None);

    // chunk 2 cannot be written
    std::fs::create_dir_all(chunks.join("chunk_2.csv")).unwrap();
    let res = labeling(&src, &chunks, None).run_with(&backend("joy"));
    assert!(matches!(res, Err(Error::ChunkFailed { ordinal: 2, .. })));
    assert_eq!(completed(&chunks), vec![1]);

    let store = ChunkStore::new(&chunks).unwrap();
    let first = std::fs::read(store.artifact_path(1)).unwrap();

    std::fs::remove_dir(chunks.join("chunk_2.csv")).unwrap();
    let summary = labeling(&src, &chunks, None)
        .run_with(&backend("joy"))
        .unwrap();
    assert_eq!(summary.processed, vec![2, 3, 4]);
    assert_eq!(summary.assembled, None);
    assert_eq!(std::fs::read(store.artifact_path(1)).unwrap(), first);
}

#[test_log::test]
fn completed_run_is_reentrant() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.csv");
    let chunks = dir.path().join("chunks");
    let dst = dir.path().join("labeled.csv");
    write_input(&src, None);

    labeling(&src, &chunks, Some(dst.clone()))
        .run_with(&backend("joy"))
        .unwrap();
    let first = std::fs::read(&dst).unwrap();

    let summary = labeling(&src, &chunks, Some(dst.clone()))
        .run_with(&backend("fear"))
        .unwrap();
    assert!(summary.processed.is_empty());
    assert_eq!(summary.skipped, vec![1, 2, 3, 4]);
    assert_eq!(std::fs::read(&dst).unwrap(), first);
}

#[test_log::test]
fn interrupted_write_is_not_a_completed_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("input.csv");
    let chunks = dir.path().join("chunks");
    write_input(&src, None);

    std::fs::create_dir_all(&chunks).unwrap();
    std::fs::write(chunks.join("chunk_1.csv.partial"), "comment_id\n1\n").unwrap();

    let summary = labeling(&src, &chunks, None)
        .run_with(&backend("joy"))
        .unwrap();
    assert_eq!(summary.processed, vec![1, 2, 3, 4]);
    assert!(!chunks.join("chunk_1.csv.partial").exists());
}
