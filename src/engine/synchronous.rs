/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Context, Edge, EdgeDir, Vertex, VertexFunctorSet, VertexMut, VertexProgram};
use crate::utils::traits::Merge;
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};
use webgraph::traits::{RandomAccessGraph, RandomAccessLabeling};

/// Runs a [vertex program](VertexProgram) for a fixed number of supersteps.
///
/// Every node executes every superstep. Each superstep is made of two
/// parallel passes over the nodes:
///
/// 1. every node empties its slot in the [`VertexFunctorSet`] and runs
///    [`init`](VertexProgram::init);
/// 2. every node gathers, applies and scatters.
///
/// The end of each pass is a barrier, so all inboxes are drained before any
/// message of the same superstep is delivered.
///
/// The data of the nodes is borrowed for the lifetime of the engine, so that
/// several engines, each running a different program, can be run in sequence
/// on the same data.
///
/// # Examples
/// ```
/// # use webgraph::graphs::vec_graph::VecGraph;
/// # use webgraph_ppr::{engine::SynchronousEngine, threads};
/// # use webgraph_ppr::algo::ppr::{DecompositionProgram, PprConfig, VertexRecord};
/// # use dsi_progress_logger::no_logging;
/// let graph = VecGraph::from_arcs([(0, 1), (1, 0)]);
/// let mut data = vec![VertexRecord::default(); 2];
/// let config = PprConfig::default().with_threshold(0.0).with_niters(1);
/// let pool = threads![1];
/// let mut engine = SynchronousEngine::<_, DecompositionProgram>::new(
///     &graph, &mut data, &config, config.num_supersteps(), &pool,
/// );
/// engine.start(no_logging![]);
/// assert_eq!(engine.iteration(), 2);
/// drop(engine);
/// assert!((data[1].flow.get(0).unwrap() - 0.85).abs() < 1E-12);
/// ```
pub struct SynchronousEngine<'a, G: RandomAccessGraph, P: VertexProgram> {
    /// The graph the program runs on
    graph: &'a G,
    /// The persistent data of each node
    data: &'a mut [P::VertexData],
    /// The configuration shared by all nodes
    config: &'a P::Config,
    /// One program instance per node
    programs: Vec<P>,
    /// The pending messages
    messages: VertexFunctorSet<P::Message>,
    /// The number of supersteps to run
    max_iterations: usize,
    /// The number of supersteps completed so far
    iteration: usize,
    /// The minimum number of nodes per task
    granularity: usize,
    /// The pool the passes run on
    threads: &'a rayon::ThreadPool,
    /// The time spent in the last call to [`start`](Self::start)
    elapsed: Duration,
}

impl<'a, G: RandomAccessGraph + Sync, P: VertexProgram> SynchronousEngine<'a, G, P> {
    const DEFAULT_GRANULARITY: usize = 1024;

    /// Creates a new engine.
    ///
    /// # Arguments
    /// - `graph`: the graph to run the program on.
    /// - `data`: the persistent data of each node.
    /// - `config`: the configuration passed to the program.
    /// - `max_iterations`: the number of supersteps to run.
    /// - `threads`: the pool running the supersteps.
    ///
    /// # Panics
    ///
    /// Panics if the length of `data` is not the number of nodes of `graph`.
    pub fn new(
        graph: &'a G,
        data: &'a mut [P::VertexData],
        config: &'a P::Config,
        max_iterations: usize,
        threads: &'a rayon::ThreadPool,
    ) -> Self {
        let num_nodes = graph.num_nodes();
        assert_eq!(
            data.len(),
            num_nodes,
            "The number of vertex records ({}) does not match the number of nodes ({})",
            data.len(),
            num_nodes
        );
        let mut programs = Vec::with_capacity(num_nodes);
        programs.resize_with(num_nodes, P::default);
        Self {
            graph,
            data,
            config,
            programs,
            messages: VertexFunctorSet::new(num_nodes),
            max_iterations,
            iteration: 0,
            granularity: Self::DEFAULT_GRANULARITY,
            threads,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the minimum number of nodes processed by a parallel task.
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = granularity.max(1);
        self
    }

    /// Returns the number of supersteps completed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns the time spent in the last call to [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the program instances, indexed by node.
    pub fn programs(&self) -> &[P] {
        &self.programs
    }

    /// Returns the table of pending messages.
    pub fn messages(&self) -> &VertexFunctorSet<P::Message> {
        &self.messages
    }

    /// Applies `transform` to every node in parallel.
    ///
    /// The transform may [signal](Context::signal) messages: they will be
    /// received at the first superstep of the next call to
    /// [`start`](Self::start).
    pub fn transform_vertices<F>(&mut self, transform: F)
    where
        F: Fn(&Context<'_, P>, &mut VertexMut<'_, P::VertexData>) + Sync,
    {
        let Self {
            graph,
            data,
            config,
            messages,
            granularity,
            threads,
            max_iterations,
            ..
        } = self;
        let activated = AtomicUsize::new(0);
        let ctx = Context::new(0, *max_iterations, *config, messages, &activated);

        threads.install(|| {
            data.par_iter_mut()
                .enumerate()
                .with_min_len(*granularity)
                .for_each(|(id, data)| {
                    transform(
                        &ctx,
                        &mut VertexMut {
                            id,
                            num_out_edges: graph.outdegree(id),
                            data,
                        },
                    );
                });
        });

        log::debug!(
            "Transformation activated {} nodes",
            activated.load(Ordering::Relaxed)
        );
    }

    /// Runs all supersteps.
    ///
    /// # Arguments
    /// - `pl`: A progress logger that implements
    ///   [`dsi_progress_logger::ProgressLog`] may be passed to the method to
    ///   log the progress of the run. If
    ///   `Option::<dsi_progress_logger::ProgressLogger>::None` is passed,
    ///   logging code should be optimized away by the compiler.
    pub fn start(&mut self, pl: &mut impl ProgressLog) {
        let start = Instant::now();
        pl.item_name("superstep");
        pl.expected_updates(Some(self.max_iterations));
        pl.start(format!(
            "Running {} superstep(s) on {} nodes",
            self.max_iterations,
            self.graph.num_nodes()
        ));

        self.iteration = 0;
        while self.iteration < self.max_iterations {
            let activated = self.superstep();
            pl.info(format_args!(
                "Superstep {}: {} nodes activated for the next superstep",
                self.iteration, activated
            ));
            self.iteration += 1;
            pl.update();
        }

        pl.done();
        self.elapsed = start.elapsed();
    }

    /// Performs a superstep, returning the number of nodes that received a
    /// message for the next one.
    fn superstep(&mut self) -> usize {
        let Self {
            graph,
            data,
            config,
            programs,
            messages,
            max_iterations,
            iteration,
            granularity,
            threads,
            ..
        } = self;
        let graph = *graph;
        let activated = AtomicUsize::new(0);
        let ctx = Context::new(*iteration, *max_iterations, *config, messages, &activated);

        threads.install(|| {
            // Receive: no node may scatter before every inbox has been emptied
            programs
                .par_iter_mut()
                .zip(data.par_iter())
                .enumerate()
                .with_min_len(*granularity)
                .for_each(|(id, (program, data))| {
                    let message = ctx.messages.test_and_get(id).unwrap_or_default();
                    let vertex = Vertex {
                        id,
                        num_out_edges: graph.outdegree(id),
                        data,
                    };
                    program.init(&ctx, &vertex, message);
                });

            // Gather, apply and scatter
            programs
                .par_iter_mut()
                .zip(data.par_iter_mut())
                .enumerate()
                .with_min_len(*granularity)
                .for_each(|(id, (program, data))| {
                    let num_out_edges = graph.outdegree(id);

                    let vertex = Vertex {
                        id,
                        num_out_edges,
                        data: &*data,
                    };
                    let mut total = P::Gather::default();
                    if program.gather_edges(&ctx, &vertex) == EdgeDir::OutEdges {
                        for target in graph.successors(id) {
                            total.merge(program.gather(&ctx, &vertex, Edge { source: id, target }));
                        }
                    }

                    program.apply(
                        &ctx,
                        &mut VertexMut {
                            id,
                            num_out_edges,
                            data: &mut *data,
                        },
                        total,
                    );

                    let vertex = Vertex {
                        id,
                        num_out_edges,
                        data: &*data,
                    };
                    if program.scatter_edges(&ctx, &vertex) == EdgeDir::OutEdges {
                        for target in graph.successors(id) {
                            program.scatter(&ctx, &vertex, Edge { source: id, target });
                        }
                    }
                });
        });

        activated.load(Ordering::Relaxed)
    }
}
