//! Records and their schema.
use csv::StringRecord;

use crate::error::Error;

/// Column names of a tabular stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    headers: StringRecord,
}

impl Schema {
    pub fn new(headers: StringRecord) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn position(&self, field: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == field)
    }

    /// # Errors
    /// [Error::MissingColumn] if `field` is not a column.
    pub fn index_of(&self, field: &str) -> Result<usize, Error> {
        self.position(field)
            .ok_or_else(|| Error::MissingColumn(field.to_string()))
    }

    /// Index of `field`, appending it as a new column if it does not exist yet.
    pub fn ensure(&mut self, field: &str) -> usize {
        match self.position(field) {
            Some(idx) => idx,
            None => {
                self.headers.push_field(field);
                self.headers.len() - 1
            }
        }
    }
}

/// One input row. Fields are never inspected besides the text one, only carried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: StringRecord,
}

impl Record {
    pub fn new(fields: StringRecord) -> Self {
        Self { fields }
    }

    /// Field at `idx`. `None` means missing (short row), not empty.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx)
    }

    pub fn fields(&self) -> &StringRecord {
        &self.fields
    }

    /// Row of `width` fields with `values` set at their indices.
    ///
    /// Short rows are padded with empty fields.
    pub fn to_row(&self, width: usize, values: &[(usize, &str)]) -> StringRecord {
        let mut row: Vec<&str> = self.fields.iter().collect();
        if row.len() < width {
            row.resize(width, "");
        }
        for (idx, value) in values {
            row[*idx] = *value;
        }
        StringRecord::from(row)
    }
}
