/*! Emotion labeling backends

Holds a [Model] trait for implementing other backends, and [LabelBackend] which wraps any [Model] and applies
the record-level policy shared by every backend:

- empty or missing text is labeled [Label::Unknown] without invoking the model,
- a failing model invocation is logged and labeled [Label::Error].

Two model families are available, selected by configuration (see [BackendBuilder]):

- [FastTextClassifier], a closed-label [fasttext](https://fasttext.cc) supervised classifier,
- [GenerativeClient], a text-to-text model served over HTTP and prompted with `emotion: <text>`.
!*/
mod backend;
mod device;
mod fasttext;
mod generative;
mod label;
mod model;

pub use backend::{BackendBuilder, BackendKind};
pub use device::Device;
pub use fasttext::{FastTextBuilder, FastTextClassifier};
pub use generative::{GenerativeBuilder, GenerativeClient};
pub use label::{Label, EMOTIONS};
pub use model::{LabelBackend, Model};
