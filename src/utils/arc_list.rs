/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use webgraph::graphs::vec_graph::VecGraph;

/// Errors raised while parsing a textual arc list.
#[derive(thiserror::Error, Debug)]
pub enum ArcListError {
    #[error("I/O error reading the arc list")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {token:?} is not a valid node")]
    InvalidNode { line: usize, token: String },
    #[error("line {line}: expected a source and a target node")]
    MissingNode { line: usize },
}

/// Parses an arc list in the SNAP format into a [`VecGraph`].
///
/// Each nonempty line not starting with `#` contains a source and a target
/// node separated by whitespace; further fields are ignored. Duplicate arcs
/// are collapsed, and the graph has as many nodes as the largest node
/// mentioned plus one.
///
/// # Examples
/// ```
/// # use webgraph_ppr::utils::parse_arc_list;
/// # use webgraph::traits::{RandomAccessLabeling, SequentialLabeling};
/// let graph = parse_arc_list("# comment\n0 1\n1 2\n0 1\n".as_bytes())?;
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_arc_list(reader: impl BufRead) -> Result<VecGraph, ArcListError> {
    let mut arcs = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let mut next_node = || -> Result<usize, ArcListError> {
            let token = tokens
                .next()
                .ok_or(ArcListError::MissingNode { line: index + 1 })?;
            token.parse().map_err(|_| ArcListError::InvalidNode {
                line: index + 1,
                token: token.to_owned(),
            })
        };
        let src = next_node()?;
        let dst = next_node()?;
        arcs.push((src, dst));
    }

    arcs.sort_unstable();
    arcs.dedup();
    Ok(VecGraph::from_arcs(arcs))
}

/// Loads an arc list in the SNAP format from a file.
///
/// See [`parse_arc_list`] for the format.
pub fn load_arc_list(path: impl AsRef<Path>) -> Result<VecGraph> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Could not open arc list {}", path.display()))?;
    parse_arc_list(BufReader::new(file))
        .with_context(|| format!("Could not parse arc list {}", path.display()))
}

#[cfg(test)]
mod test {
    use super::*;
    use webgraph::traits::{RandomAccessGraph, RandomAccessLabeling, SequentialLabeling};

    #[test]
    fn test_parse() -> Result<()> {
        let graph = parse_arc_list("0 2\n\n# skip\n2 1 extra\n0 1\n".as_bytes())?;
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_arcs(), 3);
        assert_eq!(
            graph.successors(0).into_iter().collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(graph.outdegree(1), 0);
        Ok(())
    }

    #[test]
    fn test_invalid_node() {
        let err = parse_arc_list("0 1\n1 x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ArcListError::InvalidNode { line: 2, .. }));
    }

    #[test]
    fn test_missing_node() {
        let err = parse_arc_list("3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ArcListError::MissingNode { line: 1 }));
    }
}
