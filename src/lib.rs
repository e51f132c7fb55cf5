/*! # Emolabel

Emotion labeling of social media comments.

Raw comments are normalized ([normalize]), then labeled by a swappable model ([labels]),
chunk by chunk, with completed chunks persisted on disk so that an interrupted run can be resumed ([pipelines]).

```no_run
use std::path::PathBuf;

use emolabel::labels::{BackendBuilder, BackendKind};
use emolabel::pipelines::{EmotionLabeling, Pipeline};

let mut backend = BackendBuilder::new(BackendKind::Generative);
backend.model("t5-base-finetuned-emotion");

let summary = EmotionLabeling::new(
    PathBuf::from("reddit_clean.csv"),
    PathBuf::from("chunks"),
    backend,
)
.dst(Some(PathBuf::from("reddit_labeled.csv")))
.run()?;
println!("{} records labeled", summary.records);
# Ok::<(), emolabel::error::Error>(())
```
!*/
pub mod error;
pub mod io;
pub mod labels;
pub mod normalize;
pub mod pipelines;
pub mod processing;
