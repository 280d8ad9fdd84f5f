//! Result matrix files.
//!
//! The binary layout is `V x V` little-endian records in row-major order, 12 bytes each:
//! `i32` distance, `u32` predecessor, `u32` recipe. Unreachable distances are written as
//! `i32::MAX`; a missing predecessor or recipe as `u32::MAX`.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use csv::Writer;
use log::info;

use crate::all_pairs::ResultMatrix;
use crate::graph::{Cost, DistanceRecord, INFINITY};

pub const RECORD_SIZE: usize = 12;
pub const UNREACHABLE_VALUE: i32 = i32::MAX;
pub const NONE_ID: u32 = u32::MAX;

fn encode(record: &DistanceRecord) -> Result<[u8; RECORD_SIZE]> {
    let value = if record.is_reachable() {
        match i32::try_from(record.value) {
            Ok(v) if v != UNREACHABLE_VALUE => v,
            _ => bail!("distance {} does not fit the result format", record.value),
        }
    } else {
        UNREACHABLE_VALUE
    };
    let mut out = [0u8; RECORD_SIZE];
    out[0..4].copy_from_slice(&value.to_le_bytes());
    out[4..8].copy_from_slice(&record.predecessor.unwrap_or(NONE_ID).to_le_bytes());
    out[8..12].copy_from_slice(&record.recipe.unwrap_or(NONE_ID).to_le_bytes());
    Ok(out)
}

fn decode(bytes: &[u8; RECORD_SIZE]) -> Result<DistanceRecord> {
    let word = |at: usize| [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
    let value = i32::from_le_bytes(word(0));
    let value: Cost = match value {
        UNREACHABLE_VALUE => INFINITY,
        v if v >= 0 => v as Cost,
        v => bail!("negative distance {}", v),
    };
    let optional = |raw: u32| (raw != NONE_ID).then_some(raw);
    Ok(DistanceRecord {
        value,
        predecessor: optional(u32::from_le_bytes(word(4))),
        recipe: optional(u32::from_le_bytes(word(8))),
    })
}

pub fn write_matrix_to<W: Write>(mut writer: W, matrix: &ResultMatrix) -> Result<()> {
    for record in matrix.records() {
        writer.write_all(&encode(record)?)?;
    }
    writer.flush()?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Writes the matrix to `path`. The file only appears once it is complete.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &ResultMatrix) -> Result<()> {
    let path = path.as_ref();
    let tmp = partial_path(path);
    let file = File::create(&tmp).with_context(|| format!("creating {}", tmp.display()))?;
    if let Err(e) = write_matrix_to(BufWriter::new(file), matrix) {
        let _ = fs::remove_file(&tmp);
        return Err(e.context(format!("writing {}", tmp.display())));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("moving {} to {}", tmp.display(), path.display())));
    }
    info!(
        "Wrote {} records to {}",
        matrix.records().len(),
        path.display()
    );
    Ok(())
}

pub fn read_matrix_from<R: Read>(mut reader: R) -> Result<ResultMatrix> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    ensure!(
        bytes.len() % RECORD_SIZE == 0,
        "length {} is not a whole number of records",
        bytes.len()
    );
    let count = bytes.len() / RECORD_SIZE;
    let vertex_count = (count as f64).sqrt().round() as usize;
    ensure!(
        vertex_count * vertex_count == count,
        "{} records do not form a square matrix",
        count
    );

    let mut records = Vec::with_capacity(count);
    for (i, chunk) in bytes.chunks_exact(RECORD_SIZE).enumerate() {
        let chunk: &[u8; RECORD_SIZE] = chunk.try_into()?;
        records.push(decode(chunk).with_context(|| format!("record {}", i))?);
    }
    ResultMatrix::from_records(vertex_count, records).context("building result matrix")
}

pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<ResultMatrix> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_matrix_from(BufReader::new(file)).with_context(|| format!("reading {}", path.display()))
}

/// Writes one `source,target,distance,predecessor,recipe` row per pair. Vertices are named by
/// `labels` when given, by index otherwise.
pub fn write_matrix_csv<P: AsRef<Path>>(
    path: P,
    matrix: &ResultMatrix,
    labels: Option<&[String]>,
    include_unreachable: bool,
) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = Writer::from_path(path).with_context(|| format!("creating CSV {}", path.display()))?;
    let name = |v: usize| match labels {
        Some(labels) => labels[v].clone(),
        None => v.to_string(),
    };

    wtr.write_record(["source", "target", "distance", "predecessor", "recipe"])?;
    let mut written = 0usize;
    for (source, row) in matrix.rows().enumerate() {
        for (target, record) in row.iter().enumerate() {
            if !record.is_reachable() && !include_unreachable {
                continue;
            }
            let distance = if record.is_reachable() {
                record.value.to_string()
            } else {
                String::from("inf")
            };
            let predecessor = record
                .predecessor
                .map(|p| name(p as usize))
                .unwrap_or_default();
            let recipe = record.recipe.map(|r| r.to_string()).unwrap_or_default();
            wtr.write_record([name(source), name(target), distance, predecessor, recipe])?;
            written += 1;
        }
    }
    wtr.flush()?;
    info!("Wrote {} pairs to {}", written, path.display());
    Ok(())
}
