/*! Dataset processing

Preparation steps that run before labeling:

- [clean] normalizes the text column of a raw dataset,
- [sample] draws a seeded random sample, to try backends on a small subset first.
!*/
pub mod clean;
pub mod sample;

pub use clean::{clean, CleanFields};
pub use sample::{sample, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
