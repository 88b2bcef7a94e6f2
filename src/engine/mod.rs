/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A bulk-synchronous engine running vertex programs in the
//! Gather-Apply-Scatter style.
//!
//! A [vertex program](VertexProgram) is instantiated once per node. At each
//! superstep every node, in order,
//!
//! 1. receives the combination of the messages sent to it during the previous
//!    superstep and passes it to [`init`](VertexProgram::init);
//! 2. [gathers](VertexProgram::gather) a value from the edges requested by
//!    [`gather_edges`](VertexProgram::gather_edges), merging the partial
//!    results;
//! 3. [applies](VertexProgram::apply) the gathered value to its data;
//! 4. [scatters](VertexProgram::scatter) along the edges requested by
//!    [`scatter_edges`](VertexProgram::scatter_edges), usually
//!    [signalling](Context::signal) messages to other nodes.
//!
//! Messages are combined in a [`VertexFunctorSet`]. Supersteps are separated
//! by a barrier, so a message signalled during a superstep is received at the
//! next one, and never earlier.

mod functor_set;
pub use functor_set::VertexFunctorSet;

mod synchronous;
pub use synchronous::SynchronousEngine;

use crate::utils::traits::{Merge, Message};
use std::sync::atomic::{AtomicUsize, Ordering};

/// The edges a vertex program wants to gather from or scatter along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDir {
    /// No edge.
    NoEdges,
    /// The outgoing edges of the node.
    OutEdges,
}

/// An edge of the graph, as seen by a vertex program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

/// Read-only view of a node during a superstep.
#[derive(Debug)]
pub struct Vertex<'a, D> {
    pub id: usize,
    pub num_out_edges: usize,
    pub data: &'a D,
}

/// Mutable view of a node, available during [`apply`](VertexProgram::apply)
/// and [transformations](SynchronousEngine::transform_vertices).
#[derive(Debug)]
pub struct VertexMut<'a, D> {
    pub id: usize,
    pub num_out_edges: usize,
    pub data: &'a mut D,
}

/// The context passed to every vertex-program invocation.
pub struct Context<'a, P: VertexProgram> {
    iteration: usize,
    num_iterations: usize,
    config: &'a P::Config,
    messages: &'a VertexFunctorSet<P::Message>,
    activated: &'a AtomicUsize,
}

impl<'a, P: VertexProgram> Context<'a, P> {
    pub(crate) fn new(
        iteration: usize,
        num_iterations: usize,
        config: &'a P::Config,
        messages: &'a VertexFunctorSet<P::Message>,
        activated: &'a AtomicUsize,
    ) -> Self {
        Self {
            iteration,
            num_iterations,
            config,
            messages,
            activated,
        }
    }

    /// Returns the current superstep, starting from zero.
    #[inline(always)]
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns the number of supersteps of the current run.
    #[inline(always)]
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }

    /// Returns `true` during the last superstep of the run.
    #[inline(always)]
    pub fn is_last_iteration(&self) -> bool {
        self.iteration + 1 == self.num_iterations
    }

    /// Returns the configuration shared by all nodes.
    #[inline(always)]
    pub fn config(&self) -> &'a P::Config {
        self.config
    }

    /// Sends `message` to `target`.
    ///
    /// The message is merged with the other messages sent to `target` and
    /// will be received at the next superstep.
    pub fn signal(&self, target: usize, message: P::Message) {
        if self.messages.add(target, message) {
            self.activated.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// A vertex program.
///
/// The engine keeps one instance per node for the whole run; instances are
/// created using [`Default`]. The state of a program is private to its node:
/// the only communication channel between nodes is
/// [`Context::signal`].
pub trait VertexProgram: Default + Send + Sync + Sized {
    /// The persistent data associated with each node.
    type VertexData: Send + Sync;
    /// The messages exchanged between nodes.
    type Message: Message;
    /// The value computed by the gather phase.
    type Gather: Merge + Default;
    /// The configuration shared by all nodes.
    type Config: Sync;

    /// Receives the message sent to this node during the previous superstep
    /// (the default message if none was sent, or at the first superstep).
    fn init(
        &mut self,
        ctx: &Context<'_, Self>,
        vertex: &Vertex<'_, Self::VertexData>,
        message: Self::Message,
    );

    /// Returns the edges to gather from.
    fn gather_edges(
        &self,
        ctx: &Context<'_, Self>,
        vertex: &Vertex<'_, Self::VertexData>,
    ) -> EdgeDir;

    /// Computes the contribution of a single edge to the gathered value.
    fn gather(
        &self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, Self::VertexData>,
        _edge: Edge,
    ) -> Self::Gather {
        Self::Gather::default()
    }

    /// Updates the node using the merge of all gathered values.
    fn apply(
        &mut self,
        ctx: &Context<'_, Self>,
        vertex: &mut VertexMut<'_, Self::VertexData>,
        total: Self::Gather,
    );

    /// Returns the edges to scatter along.
    fn scatter_edges(
        &self,
        ctx: &Context<'_, Self>,
        vertex: &Vertex<'_, Self::VertexData>,
    ) -> EdgeDir;

    /// Scatters along a single edge.
    fn scatter(
        &self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, Self::VertexData>,
        _edge: Edge,
    ) {
    }
}
