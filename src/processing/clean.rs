/*! Dataset cleaning

Normalizes the text column of a raw dataset into a new column, optionally keeping only a subset of columns.

Records are read and normalized `bufsize` at a time, so memory usage does not depend on the dataset size.
A value of a few thousands is a good compromise, since normalization of a buffer is done in parallel.
!*/
use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use crate::error::Error;
use crate::io::{open_reader, open_writer, Record, Schema};
use crate::normalize::Normalizer;

/// Columns used when cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanFields {
    /// Raw text column.
    pub text_field: String,
    /// Normalized text column, created if absent.
    pub output_field: String,
    /// Output columns, in order. The output field is always kept.
    /// `None` keeps every column.
    pub columns: Option<Vec<String>>,
}

impl Default for CleanFields {
    fn default() -> Self {
        Self {
            text_field: "self_text".to_string(),
            output_field: "clean_text".to_string(),
            columns: None,
        }
    }
}

/// Indices of the output columns in `schema`.
fn projection(schema: &Schema, fields: &CleanFields, output_idx: usize) -> Result<Vec<usize>, Error> {
    match &fields.columns {
        None => Ok((0..schema.len()).collect()),
        Some(columns) => {
            let mut indices = columns
                .iter()
                .map(|c| schema.index_of(c))
                .collect::<Result<Vec<usize>, Error>>()?;
            if !indices.contains(&output_idx) {
                indices.push(output_idx);
            }
            Ok(indices)
        }
    }
}

fn select(row: &StringRecord, indices: &[usize]) -> StringRecord {
    indices.iter().map(|i| row.get(*i).unwrap_or("")).collect()
}

/// Clean `src` into `dst`, returning the number of records written.
///
/// # Errors
/// Fails on missing columns, malformed rows and IO errors. Normalization itself never fails.
pub fn clean(
    src: &Path,
    dst: &Path,
    fields: &CleanFields,
    normalizer: &Normalizer,
    bufsize: usize,
) -> Result<usize, Error> {
    if bufsize == 0 {
        return Err(Error::Custom("buffer size must be positive".to_string()));
    }

    let mut reader = open_reader(src)?;
    let schema = Schema::new(reader.headers()?.clone());
    let text_idx = schema.index_of(&fields.text_field)?;

    let mut out_schema = schema.clone();
    let output_idx = out_schema.ensure(&fields.output_field);
    let indices = projection(&out_schema, fields, output_idx)?;
    debug!("output columns: {:?}", indices);

    let mut writer = open_writer(dst)?;
    writer.write_record(&select(out_schema.headers(), &indices))?;

    info!("cleaning {:?} into {:?}", src, dst);
    let mut buf: Vec<Record> = Vec::with_capacity(bufsize);
    let mut nb_records = 0;
    let mut flush = |buf: &mut Vec<Record>| -> Result<(), Error> {
        let texts: Vec<Option<&str>> = buf.iter().map(|r| r.get(text_idx)).collect();
        let normalized = normalizer.normalize_all(&texts);
        for (record, text) in buf.iter().zip(normalized.iter()) {
            let row = record.to_row(out_schema.len(), &[(output_idx, text.as_str())]);
            writer.write_record(&select(&row, &indices))?;
        }
        nb_records += buf.len();
        info!("{} records cleaned", nb_records);
        buf.clear();
        Ok(())
    };

    for row in reader.into_records() {
        buf.push(Record::new(row?));
        if buf.len() == bufsize {
            flush(&mut buf)?;
        }
    }

    // write last buffer
    if !buf.is_empty() {
        flush(&mut buf)?;
    }

    writer.flush()?;
    Ok(nb_records)
}
