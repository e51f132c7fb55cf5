//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use emolabel::labels::{BackendKind, Device};
use emolabel::normalize::NormalizerOptions;

#[derive(Debug, StructOpt)]
#[structopt(name = "emolabel", about = "emotion labeling of social media comments.")]
/// Holds every command that is callable by the `emolabel` command.
pub enum Emolabel {
    #[structopt(about = "Normalize the text column of a raw dataset")]
    Clean(Clean),
    #[structopt(about = "Draw a random sample of a dataset")]
    Sample(Sample),
    #[structopt(about = "Label a dataset, chunk by chunk. Re-running resumes an interrupted run.")]
    Label(Label),
    #[structopt(about = "Concatenate chunk results into a single file")]
    Assemble(Assemble),
    #[structopt(about = "Show completed and missing chunks")]
    Status(Status),
}

#[derive(Debug, StructOpt)]
/// Normalization toggles. Everything is stripped and lowercased by default.
pub struct NormalizeArgs {
    #[structopt(long = "keep-urls", help = "do not remove urls")]
    pub keep_urls: bool,
    #[structopt(long = "keep-mentions", help = "do not remove @mentions")]
    pub keep_mentions: bool,
    #[structopt(long = "keep-hashtags", help = "do not remove #hashtags")]
    pub keep_hashtags: bool,
    #[structopt(long = "keep-emoji", help = "do not remove emoji")]
    pub keep_emoji: bool,
    #[structopt(long = "no-lowercase", help = "keep original case")]
    pub no_lowercase: bool,
    #[structopt(
        long = "preserve",
        help = "punctuation characters to keep (e.g. \"?!'\")",
        default_value = ""
    )]
    pub preserve: String,
}

impl From<&NormalizeArgs> for NormalizerOptions {
    fn from(args: &NormalizeArgs) -> Self {
        NormalizerOptions::default()
            .strip_urls(!args.keep_urls)
            .strip_mentions(!args.keep_mentions)
            .strip_hashtags(!args.keep_hashtags)
            .strip_emoji(!args.keep_emoji)
            .lowercase(!args.no_lowercase)
            .preserve(&args.preserve)
    }
}

#[derive(Debug, StructOpt)]
pub struct Clean {
    #[structopt(parse(from_os_str), help = "raw dataset (csv, optionally gzipped)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "cleaned dataset location")]
    pub dst: PathBuf,
    #[structopt(long = "text-field", default_value = "self_text", help = "raw text column")]
    pub text_field: String,
    #[structopt(
        long = "output-field",
        default_value = "clean_text",
        help = "normalized text column"
    )]
    pub output_field: String,
    #[structopt(
        long = "columns",
        use_delimiter = true,
        help = "comma-separated output columns (e.g. comment_id,clean_text,created_time,subreddit,score,post_title). Keeps everything if unset."
    )]
    pub columns: Option<Vec<String>>,
    #[structopt(flatten)]
    pub normalize: NormalizeArgs,
    #[structopt(
        help = "number of records normalized at once.",
        long = "bufsize",
        default_value = "10000",
        short = "s"
    )]
    pub bufsize: usize,
}

#[derive(Debug, StructOpt)]
pub struct Sample {
    #[structopt(parse(from_os_str), help = "source dataset")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "sample location")]
    pub dst: PathBuf,
    #[structopt(short = "n", long = "size", default_value = "1000", help = "number of records")]
    pub size: usize,
    #[structopt(long = "seed", default_value = "42", help = "random seed")]
    pub seed: u64,
}

#[derive(Debug, StructOpt)]
/// Label command and parameters.
///
/// ```sh
/// emolabel label --backend generative --model t5-base-finetuned-emotion reddit_clean.csv chunks/ reddit_labeled.csv
/// ```
pub struct Label {
    #[structopt(parse(from_os_str), help = "dataset to label")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "chunk results directory")]
    pub chunk_dir: PathBuf,
    #[structopt(
        parse(from_os_str),
        help = "final labeled dataset. Chunks are not assembled if unset."
    )]
    pub dst: Option<PathBuf>,
    #[structopt(long = "chunk-size", default_value = "100000", help = "records per chunk")]
    pub chunk_size: usize,
    #[structopt(long = "id-field", default_value = "comment_id", help = "identifier column")]
    pub id_field: String,
    #[structopt(long = "text-field", default_value = "clean_text", help = "text column")]
    pub text_field: String,
    #[structopt(
        long = "label-field",
        default_value = "predicted_emotion",
        help = "label column"
    )]
    pub label_field: String,
    #[structopt(
        long = "normalize",
        help = "normalize the text column into clean_text before labeling"
    )]
    pub normalize: bool,
    #[structopt(flatten)]
    pub normalize_args: NormalizeArgs,
    #[structopt(
        long = "backend",
        default_value = "generative",
        help = "model family: classifier or generative"
    )]
    pub backend: BackendKind,
    #[structopt(
        long = "model",
        help = "model file (classifier) or served model name (generative)"
    )]
    pub model: Option<String>,
    #[structopt(
        long = "device",
        default_value = "cpu",
        help = "cpu, or accelerator index (0, cuda:0...)"
    )]
    pub device: Device,
    #[structopt(long = "endpoint", help = "generation server url")]
    pub endpoint: Option<String>,
    #[structopt(
        long = "strict-labels",
        help = "label out-of-vocabulary model outputs as error"
    )]
    pub strict_labels: bool,
    #[structopt(long = "checksum", help = "write a sha384 checksum of the final file")]
    pub checksum: bool,
}

#[derive(Debug, StructOpt)]
pub struct Assemble {
    #[structopt(parse(from_os_str), help = "chunk results directory")]
    pub chunk_dir: PathBuf,
    #[structopt(parse(from_os_str), help = "final labeled dataset")]
    pub dst: PathBuf,
    #[structopt(long = "allow-partial", help = "skip missing chunks instead of failing")]
    pub allow_partial: bool,
    #[structopt(long = "checksum", help = "write a sha384 checksum of the final file")]
    pub checksum: bool,
}

#[derive(Debug, StructOpt)]
pub struct Status {
    #[structopt(parse(from_os_str), help = "chunk results directory")]
    pub chunk_dir: PathBuf,
}
