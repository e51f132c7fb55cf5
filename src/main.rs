//! # Emolabel
//!
//! Emotion labeling of social media comments.
//!
//! ## Getting started
//!
//! ```sh
//! emolabel 0.1.0
//! emotion labeling of social media comments.
//!
//! USAGE:
//!     emolabel <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     assemble    Concatenate chunk results into a single file
//!     clean       Normalize the text column of a raw dataset
//!     help        Prints this message or the help of the given subcommand(s)
//!     label       Label a dataset, chunk by chunk. Re-running resumes an interrupted run.
//!     sample      Draw a random sample of a dataset
//!     status      Show completed and missing chunks
//! ```
//!
//! A typical run cleans then labels a dataset:
//!
//! ```sh
//! emolabel clean reddit.csv reddit_clean.csv --columns comment_id,created_time,subreddit,score,post_title
//! RUST_LOG=info emolabel label reddit_clean.csv chunks/ reddit_labeled.csv --device cuda:0
//! ```
use structopt::StructOpt;

use emolabel::error::Error;
use emolabel::io::ChunkStore;
use emolabel::labels::BackendBuilder;
use emolabel::normalize::{Normalizer, NormalizerOptions};
use emolabel::pipelines::{self, EmotionLabeling, Pipeline, ResultAssembler};
use emolabel::processing::{self, CleanFields};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Emolabel::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Emolabel::Clean(c) => {
            let options = NormalizerOptions::from(&c.normalize);
            debug!("normalizer options: {}", serde_json::to_string(&options)?);
            let fields = CleanFields {
                text_field: c.text_field,
                output_field: c.output_field,
                columns: c.columns,
            };
            let n = processing::clean(&c.src, &c.dst, &fields, &Normalizer::new(options), c.bufsize)?;
            info!("{} records written to {:?}", n, c.dst);
        }

        cli::Emolabel::Sample(s) => {
            processing::sample(&s.src, &s.dst, s.size, s.seed)?;
        }

        cli::Emolabel::Label(l) => {
            let mut backend = BackendBuilder::new(l.backend);
            backend.device(l.device).strict(l.strict_labels);
            if let Some(model) = &l.model {
                backend.model(model);
            }
            if let Some(endpoint) = &l.endpoint {
                backend.endpoint(endpoint);
            }

            let normalize = if l.normalize {
                Some(NormalizerOptions::from(&l.normalize_args))
            } else {
                None
            };

            let p = EmotionLabeling::new(l.src, l.chunk_dir, backend)
                .dst(l.dst)
                .chunk_size(l.chunk_size)
                .id_field(&l.id_field)
                .text_field(&l.text_field)
                .label_field(&l.label_field)
                .normalize(normalize)
                .checksum(l.checksum);
            let summary = p.run()?;
            info!("summary\n{}", serde_json::to_string_pretty(&summary)?);
        }

        cli::Emolabel::Assemble(a) => {
            if !a.chunk_dir.is_dir() {
                return Err(Error::NoChunks(a.chunk_dir));
            }
            let store = ChunkStore::new(&a.chunk_dir)?;
            ResultAssembler::new(&store)
                .allow_partial(a.allow_partial)
                .checksum(a.checksum)
                .assemble_all(&a.dst)?;
        }

        cli::Emolabel::Status(s) => {
            if !s.chunk_dir.is_dir() {
                return Err(Error::NoChunks(s.chunk_dir));
            }
            let store = ChunkStore::new(&s.chunk_dir)?;
            let progress = pipelines::progress(&store)?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    };
    Ok(())
}
