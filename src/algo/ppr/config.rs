/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::SourceSet;

/// The probability that a random walk jumps back to its source.
pub const RESET_PROB: f64 = 0.15;

/// The parameters of a multi-source PPR computation.
///
/// A configuration is built once, before the computation starts, and it is
/// shared read-only by all nodes.
#[derive(Debug, Clone)]
pub struct PprConfig {
    /// Mass at or below this value is not propagated further, and residual
    /// and flow below it are not redistributed.
    pub threshold: f64,
    /// The number of push iterations. The decomposition runs one more
    /// superstep, in which the mass still in transit is accumulated as flow.
    pub niters: usize,
    /// Whether to skip multiplying flow by the precomputed index.
    pub no_index: bool,
    /// The nodes mass is injected from; if [`None`], every node is a source.
    pub sources: Option<SourceSet>,
}

impl PprConfig {
    pub const DEFAULT_THRESHOLD: f64 = 1E-4;
    pub const DEFAULT_NITERS: usize = 10;

    /// Sets the propagation threshold.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is negative or NaN.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        assert!(
            threshold >= 0.0,
            "The threshold must be nonnegative, got {threshold}"
        );
        self.threshold = threshold;
        self
    }

    /// Sets the number of push iterations.
    pub fn with_niters(mut self, niters: usize) -> Self {
        self.niters = niters;
        self
    }

    /// Sets whether to skip the index multiplication.
    pub fn with_no_index(mut self, no_index: bool) -> Self {
        self.no_index = no_index;
        self
    }

    /// Sets the sources.
    pub fn with_sources(mut self, sources: Option<SourceSet>) -> Self {
        self.sources = sources;
        self
    }

    /// Returns the number of supersteps of the decomposition.
    #[inline(always)]
    pub fn num_supersteps(&self) -> usize {
        self.niters + 1
    }

    /// Returns `true` if mass is injected at `node`.
    #[inline(always)]
    pub fn is_source(&self, node: usize) -> bool {
        self.sources
            .as_ref()
            .map_or(true, |sources| sources.contains(node))
    }
}

impl Default for PprConfig {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            niters: Self::DEFAULT_NITERS,
            no_index: false,
            sources: None,
        }
    }
}
