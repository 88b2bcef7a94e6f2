/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::utils::SparseVec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

/// The largest quantized value.
const QUANTUM: f64 = u16::MAX as f64;

/// Errors raised while saving or loading vertex records.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    #[error("encoding error")]
    Codec(#[from] bincode::Error),
    #[error("expected {expected} vertex records, found {found}")]
    Length { expected: usize, found: usize },
}

/// How a [`VertexRecord`] is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Only the PPR vector is stored, as 16-bit fractions of its total
    /// mass. This is the format of precomputed indices.
    Quantized,
    /// All vectors are stored at full precision.
    Full,
}

/// The persistent state of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    /// The personalized PageRank vector of the node, indexed by the node
    /// whose mass it holds.
    pub ppr: SparseVec,
    /// The mass that reached the node at the end of the decomposition,
    /// indexed by source.
    pub flow: SparseVec,
    /// The mass skimmed at the node during the decomposition, indexed by
    /// source.
    pub residual: SparseVec,
}

#[derive(Serialize, Deserialize)]
struct QuantizedRecord {
    ppr: Vec<(usize, u16)>,
}

impl QuantizedRecord {
    fn new(ppr: &SparseVec) -> Self {
        let total = ppr.sum();
        let ppr = ppr
            .iter()
            .map(|(node, weight)| {
                let fraction = if total > 0.0 { weight / total } else { 0.0 };
                (node, (fraction * QUANTUM).round().clamp(0.0, QUANTUM) as u16)
            })
            .collect();
        Self { ppr }
    }

    fn into_record(self) -> VertexRecord {
        let total: u64 = self.ppr.iter().map(|&(_, q)| q as u64).sum();
        let ppr = self
            .ppr
            .into_iter()
            .map(|(node, q)| {
                let weight = if total == 0 {
                    0.0
                } else {
                    q as f64 / total as f64
                };
                (node, weight)
            })
            .collect();
        VertexRecord {
            ppr,
            ..Default::default()
        }
    }
}

impl VertexRecord {
    /// Writes the record using the given encoding.
    ///
    /// The [quantized](Encoding::Quantized) encoding stores only
    /// [`ppr`](Self::ppr), and its weights are normalized so that they sum to
    /// one.
    pub fn save<W: Write>(
        &self,
        writer: &mut W,
        encoding: Encoding,
    ) -> Result<(), PersistenceError> {
        match encoding {
            Encoding::Quantized => {
                bincode::serialize_into(writer, &QuantizedRecord::new(&self.ppr))?
            }
            Encoding::Full => bincode::serialize_into(writer, self)?,
        }
        Ok(())
    }

    /// Reads a record written by [`save`](Self::save) with the same encoding.
    pub fn load<R: Read>(reader: &mut R, encoding: Encoding) -> Result<Self, PersistenceError> {
        Ok(match encoding {
            Encoding::Quantized => {
                bincode::deserialize_from::<_, QuantizedRecord>(reader)?.into_record()
            }
            Encoding::Full => bincode::deserialize_from(reader)?,
        })
    }
}

/// Writes the number of records followed by the records.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[VertexRecord],
    encoding: Encoding,
) -> Result<(), PersistenceError> {
    bincode::serialize_into(&mut *writer, &(records.len() as u64))?;
    for record in records {
        record.save(&mut *writer, encoding)?;
    }
    Ok(())
}

/// Reads records written by [`write_records`].
///
/// If `expected` is not [`None`], the number of records must match it, and
/// it is checked before any record is read.
pub fn read_records<R: Read>(
    reader: &mut R,
    encoding: Encoding,
    expected: Option<usize>,
) -> Result<Vec<VertexRecord>, PersistenceError> {
    let found: u64 = bincode::deserialize_from(&mut *reader)?;
    let found = found as usize;
    if let Some(expected) = expected {
        if expected != found {
            return Err(PersistenceError::Length { expected, found });
        }
    }
    (0..found)
        .map(|_| VertexRecord::load(&mut *reader, encoding))
        .collect()
}

/// Stores records in a file.
pub fn save_records(
    path: impl AsRef<Path>,
    records: &[VertexRecord],
    encoding: Encoding,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records, encoding)
        .with_context(|| format!("Could not write vertex records to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Could not flush {}", path.display()))?;
    log::info!(
        "Saved {} vertex records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// Loads records from a file.
///
/// See [`read_records`] for the meaning of `expected`.
pub fn load_records(
    path: impl AsRef<Path>,
    encoding: Encoding,
    expected: Option<usize>,
) -> Result<Vec<VertexRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let records = read_records(&mut BufReader::new(file), encoding, expected)
        .with_context(|| format!("Could not read vertex records from {}", path.display()))?;
    log::info!(
        "Loaded {} vertex records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}
