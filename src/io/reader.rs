//! Chunked record reading.
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use csv::{ErrorKind, StringRecordsIntoIter};
use flate2::read::MultiGzDecoder;
use log::debug;

use crate::error::Error;

use super::{Record, Schema};

/// Open a CSV file, transparently decompressing `.gz` files.
pub fn open_reader(path: &Path) -> Result<csv::Reader<Box<dyn Read>>, Error> {
    let file = File::open(path)?;
    let inner: Box<dyn Read> = match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => {
            debug!("reading {:?} as gzip", path);
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        }
        _ => Box::new(BufReader::new(file)),
    };
    Ok(csv::ReaderBuilder::new().from_reader(inner))
}

/// Create a CSV writer, creating parent folders if needed.
pub fn open_writer(path: &Path) -> Result<csv::Writer<File>, Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(csv::Writer::from_path(path)?)
}

/// A bounded slice of the input stream.
///
/// Reading errors are kept in the chunk rather than interrupting the stream,
/// so that ordinals stay positional and a broken chunk only matters if it has to be processed.
#[derive(Debug)]
pub struct Chunk {
    pub ordinal: usize,
    pub records: Result<Vec<Record>, Error>,
}

/// Cuts a CSV stream into chunks of `chunk_size` rows. The first chunk has ordinal 1.
pub struct ChunkReader<R: Read> {
    rows: StringRecordsIntoIter<R>,
    schema: Schema,
    chunk_size: usize,
    next_ordinal: usize,
    exhausted: bool,
}

impl ChunkReader<Box<dyn Read>> {
    pub fn from_path(path: &Path, chunk_size: usize) -> Result<Self, Error> {
        Self::new(open_reader(path)?, chunk_size)
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn new(mut reader: csv::Reader<R>, chunk_size: usize) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::Custom("chunk size must be positive".to_string()));
        }
        let schema = Schema::new(reader.headers()?.clone());
        Ok(Self {
            rows: reader.into_records(),
            schema,
            chunk_size,
            next_ordinal: 1,
            exhausted: false,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.exhausted {
            return None;
        }

        let mut records = Vec::with_capacity(self.chunk_size.min(4096));
        let mut error = None;
        let mut nb_rows = 0;

        while nb_rows < self.chunk_size {
            match self.rows.next() {
                Some(Ok(row)) => records.push(Record::new(row)),
                Some(Err(e)) => {
                    // the underlying stream is broken: nothing more can be read
                    let fatal = matches!(e.kind(), ErrorKind::Io(_));
                    if error.is_none() {
                        error = Some(e);
                    }
                    if fatal {
                        self.exhausted = true;
                        break;
                    }
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
            nb_rows += 1;
        }

        if nb_rows == 0 && error.is_none() {
            return None;
        }

        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        Some(Chunk {
            ordinal,
            records: match error {
                Some(e) => Err(e.into()),
                None => Ok(records),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn csv_reader(data: &'static str) -> csv::Reader<&'static [u8]> {
        csv::ReaderBuilder::new().from_reader(data.as_bytes())
    }

    #[test]
    fn positional_chunks() {
        let data = "id,text\n1,a\n2,b\n3,c\n4,d\n5,e\n";
        let chunks: Vec<Chunk> = ChunkReader::new(csv_reader(data), 2).unwrap().collect();

        assert_eq!(chunks.len(), 3);
        let ordinals: Vec<usize> = chunks.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);

        let ids: Vec<Vec<String>> = chunks
            .into_iter()
            .map(|c| {
                c.records
                    .unwrap()
                    .iter()
                    .map(|r| r.get(0).unwrap().to_string())
                    .collect()
            })
            .collect();
        assert_eq!(ids, vec![vec!["1", "2"], vec!["3", "4"], vec!["5"]]);
    }

    #[test]
    fn exact_multiple() {
        let data = "id,text\n1,a\n2,b\n";
        let chunks: Vec<Chunk> = ChunkReader::new(csv_reader(data), 2).unwrap().collect();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn empty_input() {
        let data = "id,text\n";
        let mut reader = ChunkReader::new(csv_reader(data), 10).unwrap();
        assert_eq!(reader.schema().len(), 2);
        assert!(reader.next().is_none());
    }

    #[test]
    fn broken_row_stays_in_its_chunk() {
        let data = "id,text\n1,a\n2,b\n3\n4,d\n5,e\n";
        let chunks: Vec<Chunk> = ChunkReader::new(csv_reader(data), 2).unwrap().collect();
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].records.is_ok());
        assert!(chunks[1].records.is_err());
        assert_eq!(chunks[2].records.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn zero_chunk_size() {
        assert!(ChunkReader::new(csv_reader("id\n1\n"), 0).is_err());
    }

    #[test]
    fn gzip_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(b"id,text\n1,hello\n2,world\n").unwrap();
        enc.finish().unwrap();

        let chunks: Vec<Chunk> = ChunkReader::from_path(&path, 10).unwrap().collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].records.as_ref().unwrap()[1].get(1), Some("world"));
    }
}
