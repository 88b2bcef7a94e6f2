/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Approximate multi-source personalized PageRank.
//!
//! The computation has two phases:
//!
//! 1. a [decomposition](DecompositionProgram) pushes a unit of mass from each
//!    source along the graph for [`niters`](PprConfig::niters) iterations,
//!    leaving a [residual](VertexRecord::residual) at each node traversed and
//!    a [flow](VertexRecord::flow) at the nodes where the mass is at the end;
//! 2. a [collection](collect_results) combines the flow with the PPR vectors
//!    precomputed at each node (the *index*), adds the residual, and sends the
//!    result back to the sources, where the [`CollectProgram`] installs it as
//!    their new PPR vector.
//!
//! Mass at or below the [threshold](PprConfig::threshold) is dropped, and it
//! is not accounted for anywhere.
//!
//! # Examples
//! ```
//! # use webgraph::graphs::vec_graph::VecGraph;
//! # use webgraph_ppr::algo::ppr::*;
//! # use webgraph_ppr::threads;
//! # use dsi_progress_logger::no_logging;
//! let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0)]);
//! let config = PprConfig::default().with_no_index(true);
//! let mut records = vec![VertexRecord::default(); 3];
//! MultiSourcePpr::new(&graph, &config).run(&mut records, &threads![], no_logging![])?;
//! assert!(records.iter().all(|record| !record.ppr.is_empty()));
//! # Ok::<(), anyhow::Error>(())
//! ```

mod config;
pub use config::*;

mod sources;
pub use sources::*;

mod vertex_data;
pub use vertex_data::*;

mod decomposition;
pub use decomposition::DecompositionProgram;

mod collect;
pub use collect::{collect_results, CollectProgram};

mod topk;
pub use topk::TopKWriter;

use crate::engine::SynchronousEngine;
use anyhow::{ensure, Result};
use dsi_progress_logger::ProgressLog;
use std::time::{Duration, Instant};
use webgraph::traits::RandomAccessGraph;

/// Runs the two phases of a multi-source PPR computation on a graph.
pub struct MultiSourcePpr<'a, G: RandomAccessGraph> {
    graph: &'a G,
    config: &'a PprConfig,
    granularity: Option<usize>,
}

impl<'a, G: RandomAccessGraph + Sync> MultiSourcePpr<'a, G> {
    pub fn new(graph: &'a G, config: &'a PprConfig) -> Self {
        Self {
            graph,
            config,
            granularity: None,
        }
    }

    /// Sets the minimum number of nodes processed by a parallel task.
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = Some(granularity);
        self
    }

    fn engine<'b, P>(
        &'b self,
        records: &'b mut [VertexRecord],
        max_iterations: usize,
        threads: &'b rayon::ThreadPool,
    ) -> SynchronousEngine<'b, G, P>
    where
        P: crate::engine::VertexProgram<VertexData = VertexRecord, Config = PprConfig>,
    {
        let engine =
            SynchronousEngine::new(self.graph, records, self.config, max_iterations, threads);
        match self.granularity {
            Some(granularity) => engine.with_granularity(granularity),
            None => engine,
        }
    }

    /// Runs the decomposition, returning the time it took.
    ///
    /// # Arguments
    /// - `records`: the records of the nodes; flow and residual are
    ///   accumulated into them.
    /// - `threads`: the pool to run on.
    /// - `pl`: a progress logger.
    ///
    /// # Panics
    ///
    /// Panics if the number of records is not the number of nodes of the
    /// graph.
    pub fn decompose(
        &self,
        records: &mut [VertexRecord],
        threads: &rayon::ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Duration {
        let mut engine =
            self.engine::<DecompositionProgram>(records, self.config.num_supersteps(), threads);
        engine.start(pl);
        engine.elapsed()
    }

    /// Redistributes flow and residual to the sources and installs the
    /// results as their PPR vectors, returning the time it took.
    ///
    /// The residual of every node is empty afterwards.
    ///
    /// # Panics
    ///
    /// Panics if the number of records is not the number of nodes of the
    /// graph.
    pub fn collect(
        &self,
        records: &mut [VertexRecord],
        threads: &rayon::ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Duration {
        let mut engine = self.engine::<CollectProgram>(records, 1, threads);
        let start = Instant::now();
        engine.transform_vertices(collect_results);
        let transform = start.elapsed();
        engine.start(pl);
        transform + engine.elapsed()
    }

    /// Runs the decomposition followed by the collection.
    ///
    /// # Errors
    ///
    /// Fails if the number of records is not the number of nodes.
    pub fn run(
        &self,
        records: &mut [VertexRecord],
        threads: &rayon::ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Result<()> {
        let num_nodes = self.graph.num_nodes();
        ensure!(
            records.len() == num_nodes,
            "The number of vertex records ({}) does not match the number of nodes ({})",
            records.len(),
            num_nodes
        );

        if let Some(sources) = &self.config.sources {
            let missing = sources.iter().filter(|&node| node >= num_nodes).count();
            if missing > 0 {
                log::warn!(
                    "{} of {} sources are not nodes of the graph and will be ignored",
                    missing,
                    sources.len()
                );
            }
        }

        let start = Instant::now();
        let elapsed = self.decompose(records, threads, pl);
        log::info!(
            "Decomposition completed in {:.3} seconds",
            elapsed.as_secs_f64()
        );
        let elapsed = self.collect(records, threads, pl);
        log::info!(
            "Collection completed in {:.3} seconds",
            elapsed.as_secs_f64()
        );
        log::info!(
            "Computation completed in {:.3} seconds",
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }
}
