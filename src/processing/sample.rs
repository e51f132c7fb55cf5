/*! Sampling

Draws a fixed-size, seeded random sample of a dataset in a single pass (reservoir sampling),
so that the whole dataset never has to be loaded.
Sampled records are written back in their original order.
!*/
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::Error;
use crate::io::{open_reader, open_writer};

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

/// Sample `size` records of `src` into `dst`, returning the number of written records.
///
/// If `src` has less than `size` records, they are all written.
pub fn sample(src: &Path, dst: &Path, size: usize, seed: u64) -> Result<usize, Error> {
    let mut reader = open_reader(src)?;
    let header = reader.headers()?.clone();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut reservoir: Vec<(usize, StringRecord)> = Vec::with_capacity(size);
    let mut nb_records = 0;
    for (idx, row) in reader.into_records().enumerate() {
        let row = row?;
        nb_records += 1;
        if reservoir.len() < size {
            reservoir.push((idx, row));
        } else {
            let j = rng.gen_range(0..=idx);
            if j < size {
                reservoir[j] = (idx, row);
            }
        }
    }

    if nb_records < size {
        warn!(
            "{:?} has {} records, less than the requested {}",
            src, nb_records, size
        );
    }

    reservoir.sort_unstable_by_key(|(idx, _)| *idx);

    let mut writer = open_writer(dst)?;
    writer.write_record(&header)?;
    for (_, row) in &reservoir {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(
        "sampled {} out of {} records into {:?}",
        reservoir.len(),
        nb_records,
        dst
    );
    Ok(reservoir.len())
}
