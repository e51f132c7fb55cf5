//! Pipelines.
//!
//! Labeling is split in three stages, each one usable on its own:
//!
//! - [ChunkProcessor] labels one in-memory chunk,
//! - [BatchRunner] walks the input chunk by chunk, skipping the chunks that already have an artifact,
//! - [ResultAssembler] concatenates chunk artifacts into the final file.
//!
//! [EmotionLabeling] wires them together behind the light [Pipeline] trait.
mod assemble;
mod batch;
mod chunk;
mod labeling;
#[allow(clippy::module_inception)]
pub mod pipeline;

pub use assemble::{gaps, Assembled, ResultAssembler};
pub use batch::{progress, BatchRunner, Progress, RunState, RunSummary};
pub use chunk::{ChunkProcessor, LabeledChunk, DEFAULT_LABEL_FIELD, DEFAULT_NORMALIZED_FIELD};
pub use labeling::{EmotionLabeling, DEFAULT_CHUNK_SIZE};
pub use pipeline::Pipeline;
