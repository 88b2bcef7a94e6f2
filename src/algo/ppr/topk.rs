/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::VertexRecord;
use anyhow::{Context, Result};
use dsi_progress_logger::ProgressLog;
use std::{
    fmt::Write as _,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Writes, for each node with a nonempty PPR vector, the nodes with the
/// largest PPR.
///
/// Each line has the form `<node> <len> <node_1> ... <node_len>`, where
/// `len` is the minimum between `k` and the size of the PPR vector, and
/// nodes are sorted by decreasing PPR, breaking ties by increasing node.
#[derive(Debug, Clone, Copy)]
pub struct TopKWriter {
    k: usize,
}

impl TopKWriter {
    pub const DEFAULT_K: usize = 100;

    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Returns the line for `node`, without newline, or [`None`] if its PPR
    /// vector is empty.
    pub fn format_vertex(&self, node: usize, record: &VertexRecord) -> Option<String> {
        if record.ppr.is_empty() {
            return None;
        }
        let top = record.ppr.top_k(self.k);
        let mut line = format!("{} {}", node, top.len());
        for other in top {
            // Writing to a String cannot fail
            let _ = write!(line, " {}", other);
        }
        Some(line)
    }

    /// Writes the lines of all `records`, indexed by node.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        records: &[VertexRecord],
        pl: &mut impl ProgressLog,
    ) -> Result<()> {
        pl.item_name("node");
        pl.expected_updates(Some(records.len()));
        pl.start(format!("Writing the top {} entries of each vector", self.k));
        for (node, record) in records.iter().enumerate() {
            if let Some(line) = self.format_vertex(node, record) {
                writeln!(writer, "{}", line)?;
            }
            pl.light_update();
        }
        pl.done();
        Ok(())
    }

    /// Writes the lines of all `records` to a file.
    pub fn store(
        &self,
        path: impl AsRef<Path>,
        records: &[VertexRecord],
        pl: &mut impl ProgressLog,
    ) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("Could not create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer, records, pl)
            .with_context(|| format!("Could not write to {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Could not flush {}", path.display()))?;
        Ok(())
    }
}

impl Default for TopKWriter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_K)
    }
}
