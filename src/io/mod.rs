/*!
# IO utilities

Tabular record reading and chunk artifact storage.

- [Schema]/[Record] are thin wrappers over CSV rows, keeping every column untouched.
- [ChunkReader] walks an input stream and cuts it into fixed-size, 1-based [Chunk]s.
- [ChunkStore] persists one CSV artifact per chunk ordinal (`chunk_<ordinal>.csv`) in a flat directory.
  The presence of an artifact is the only record of a chunk being done.
!*/
mod artifacts;
mod reader;
mod record;

pub use artifacts::ChunkStore;
pub use reader::{open_reader, open_writer, Chunk, ChunkReader};
pub use record::{Record, Schema};
