/*! Model trait and label backend

All models should implement [Model] to be useable by [LabelBackend].
!*/
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, warn};

use crate::error::Error;
use crate::io::{Record, Schema};

use super::Label;

/// Raw model invocation.
///
/// Models are expensive to build (weights loading, connection checks) and are expected to be built once,
/// then used for every record.
pub trait Model {
    /// Returns the raw label predicted for a non-empty text.
    fn infer(&self, text: &str) -> Result<String, Error>;

    /// Model identifier, for logging.
    fn name(&self) -> &str;
}

/// Applies the record-level labeling policy over a [Model].
pub struct LabelBackend {
    model: Box<dyn Model>,
    strict: bool,
}

impl LabelBackend {
    pub fn new(model: Box<dyn Model>) -> Self {
        Self {
            model,
            strict: false,
        }
    }

    /// Map labels that are not in [super::EMOTIONS] to [Label::Error].
    ///
    /// Off by default: generative models may output anything, and that output is kept as is.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Label a single text. Never fails.
    pub fn predict(&self, text: Option<&str>) -> Label {
        let text = match text {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Label::Unknown,
        };

        let inferred = panic::catch_unwind(AssertUnwindSafe(|| self.model.infer(text)))
            .unwrap_or_else(|_| Err(Error::Backend("model invocation panicked".to_string())));

        match inferred {
            Ok(raw) => {
                // model output is never a sentinel, even if it reads like one
                let label = Label::Emotion(raw);
                if self.strict && !label.is_known() {
                    warn!("{}: out of vocabulary label {:?}", self.model.name(), label);
                    return Label::Error;
                }
                debug!("{:?} -> {}", text, label);
                label
            }
            Err(e) => {
                error!("{}: error predicting emotion: {}", self.model.name(), e);
                Label::Error
            }
        }
    }

    /// Label every record on `text_field`, independently and in order.
    ///
    /// # Errors
    /// Returns an error if `text_field` is not in the schema.
    pub fn label_column(
        &self,
        records: &[Record],
        schema: &Schema,
        text_field: &str,
    ) -> Result<Vec<Label>, Error> {
        let idx = schema.index_of(text_field)?;
        Ok(records.iter().map(|r| self.predict(r.get(idx))).collect())
    }
}
