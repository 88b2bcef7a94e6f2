/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result};
use std::{collections::HashSet, io::Read, path::Path};

/// Errors raised while parsing a source file.
#[derive(thiserror::Error, Debug)]
pub enum SourceSetError {
    #[error("I/O error reading the sources")]
    Io(#[from] std::io::Error),
    #[error("the source file is empty: expected the number of sources")]
    MissingCount,
    #[error("{token:?} is not a valid number of sources")]
    InvalidCount { token: String },
    #[error("source #{index}: {token:?} is not a valid node")]
    InvalidNode { index: usize, token: String },
    #[error("expected {expected} sources, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// The set of nodes from which mass is injected at the start of a
/// decomposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet(HashSet<usize>);

impl SourceSet {
    /// Returns `true` if `node` is a source.
    #[inline(always)]
    pub fn contains(&self, node: usize) -> bool {
        self.0.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the sources, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Parses a source set.
    ///
    /// The input is a sequence of whitespace-separated integers: the number
    /// *n* of sources, followed by the sources. Only the first
    /// min(*n*, `max_sources`) sources are read; anything after them is
    /// ignored.
    ///
    /// # Examples
    /// ```
    /// # use webgraph_ppr::algo::ppr::SourceSet;
    /// let sources = SourceSet::parse("3\n5 8 13\n".as_bytes(), 2)?;
    /// assert_eq!(sources.len(), 2);
    /// assert!(sources.contains(8) && !sources.contains(13));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(mut reader: impl Read, max_sources: usize) -> Result<Self, SourceSetError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        let token = tokens.next().ok_or(SourceSetError::MissingCount)?;
        let declared: usize = token.parse().map_err(|_| SourceSetError::InvalidCount {
            token: token.to_owned(),
        })?;
        let expected = declared.min(max_sources);

        let mut sources = HashSet::with_capacity(expected);
        for index in 0..expected {
            let token = tokens.next().ok_or(SourceSetError::Truncated {
                expected,
                found: index,
            })?;
            let node = token.parse().map_err(|_| SourceSetError::InvalidNode {
                index,
                token: token.to_owned(),
            })?;
            sources.insert(node);
        }
        Ok(Self(sources))
    }

    /// Loads a source set from a file.
    ///
    /// See [`parse`](Self::parse) for the format.
    pub fn load(path: impl AsRef<Path>, max_sources: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open source file {}", path.display()))?;
        Self::parse(std::io::BufReader::new(file), max_sources)
            .with_context(|| format!("Could not parse source file {}", path.display()))
    }
}

impl FromIterator<usize> for SourceSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
