//! Labeling of a single chunk.
use csv::StringRecord;

use crate::error::Error;
use crate::io::{Record, Schema};
use crate::labels::{Label, LabelBackend};
use crate::normalize::Normalizer;

pub const DEFAULT_NORMALIZED_FIELD: &str = "clean_text";
pub const DEFAULT_LABEL_FIELD: &str = "predicted_emotion";

/// Rows of a labeled chunk, ready to be persisted.
#[derive(Debug, Clone)]
pub struct LabeledChunk {
    pub schema: Schema,
    pub rows: Vec<StringRecord>,
    pub labels: Vec<Label>,
}

impl LabeledChunk {
    /// Number of [Label::Unknown] and [Label::Error] labels.
    pub fn sentinels(&self) -> (usize, usize) {
        self.labels.iter().fold((0, 0), |(unknown, errors), l| match l {
            Label::Unknown => (unknown + 1, errors),
            Label::Error => (unknown, errors + 1),
            Label::Emotion(_) => (unknown, errors),
        })
    }
}

/// Labels the records of a chunk, optionally normalizing their text first.
///
/// Processing only depends on the chunk and the backend:
/// nothing is kept from one chunk to the next.
pub struct ChunkProcessor<'a> {
    backend: &'a LabelBackend,
    normalizer: Option<Normalizer>,
    text_field: String,
    normalized_field: String,
    label_field: String,
}

impl<'a> ChunkProcessor<'a> {
    pub fn new(backend: &'a LabelBackend, text_field: &str) -> Self {
        Self {
            backend,
            normalizer: None,
            text_field: text_field.to_string(),
            normalized_field: DEFAULT_NORMALIZED_FIELD.to_string(),
            label_field: DEFAULT_LABEL_FIELD.to_string(),
        }
    }

    /// Normalize the text field into the normalized field before labeling.
    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    pub fn normalized_field(mut self, field: &str) -> Self {
        self.normalized_field = field.to_string();
        self
    }

    pub fn label_field(mut self, field: &str) -> Self {
        self.label_field = field.to_string();
        self
    }

    pub fn text_field(&self) -> &str {
        &self.text_field
    }

    /// Input schema plus the added columns.
    /// Columns that already exist are reused (and their values overwritten).
    pub fn output_schema(&self, input: &Schema) -> Schema {
        let mut schema = input.clone();
        if self.normalizer.is_some() {
            schema.ensure(&self.normalized_field);
        }
        schema.ensure(&self.label_field);
        schema
    }

    /// Label `records`, keeping their order and every other field.
    ///
    /// # Errors
    /// [Error::MissingColumn] if the text field is not in `schema`.
    /// Record-level failures are never errors, they end up as sentinel labels.
    pub fn process(&self, records: &[Record], schema: &Schema) -> Result<LabeledChunk, Error> {
        let out = self.output_schema(schema);
        let label_idx = out.index_of(&self.label_field)?;

        let (normalized, labels) = match &self.normalizer {
            Some(normalizer) => {
                let text_idx = schema.index_of(&self.text_field)?;
                let texts: Vec<Option<&str>> = records.iter().map(|r| r.get(text_idx)).collect();
                let normalized = normalizer.normalize_all(&texts);
                let labels = normalized
                    .iter()
                    .map(|t| self.backend.predict(Some(t)))
                    .collect();
                (Some(normalized), labels)
            }
            None => (
                None,
                self.backend
                    .label_column(records, schema, &self.text_field)?,
            ),
        };

        let rows = match &normalized {
            Some(normalized) => {
                let norm_idx = out.index_of(&self.normalized_field)?;
                records
                    .iter()
                    .zip(normalized.iter().zip(labels.iter()))
                    .map(|(r, (text, label))| {
                        r.to_row(
                            out.len(),
                            &[(norm_idx, text.as_str()), (label_idx, label.as_str())],
                        )
                    })
                    .collect()
            }
            None => records
                .iter()
                .zip(labels.iter())
                .map(|(r, label)| r.to_row(out.len(), &[(label_idx, label.as_str())]))
                .collect(),
        };

        Ok(LabeledChunk {
            schema: out,
            rows,
            labels,
        })
    }
}
