/*! Text normalization

Rewrites free text into a canonical form before labeling.

Stages are applied in a fixed order, each one toggleable through [NormalizerOptions]:

1. urls (`scheme://...`, `www....`)
1. mentions (`@user`)
1. hashtags (`#topic`)
1. emoji
1. punctuation, except for a preserved set
1. whitespace collapsing and trimming
1. lowercasing

Token-level removals happen before punctuation stripping so that `http://x.com` or `@some_user`
are removed as a whole instead of leaving `httpxcom` or `someuser` behind.
!*/
mod normalizer;
mod options;
mod patterns;
mod punctuation;

pub use normalizer::Normalizer;
pub use options::NormalizerOptions;
pub use punctuation::PunctuationFilter;
