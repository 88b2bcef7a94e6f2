/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{PprConfig, VertexRecord, RESET_PROB};
use crate::engine::{Context, Edge, EdgeDir, Vertex, VertexMut, VertexProgram};
use crate::utils::SparseVec;
use serde::{Deserialize, Serialize};

/// Pushes mass from the sources along the graph.
///
/// At the first superstep every source holds a unit of its own mass. At each
/// following superstep a node receives the mass sent to it, skims a fraction
/// [`RESET_PROB`] of it into its [residual](VertexRecord::residual), and
/// splits the rest evenly among its successors; mass at or below the
/// [threshold](PprConfig::threshold) is dropped. A node without successors
/// keeps the whole remaining mass for itself, but has nowhere to send it.
///
/// At the last superstep the mass in transit is accumulated into the
/// [flow](VertexRecord::flow) of the node holding it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecompositionProgram {
    flow: SparseVec,
}

impl DecompositionProgram {
    /// Returns the mass held by the node in the current superstep.
    pub fn flow(&self) -> &SparseVec {
        &self.flow
    }
}

impl VertexProgram for DecompositionProgram {
    type VertexData = VertexRecord;
    type Message = SparseVec;
    type Gather = ();
    type Config = PprConfig;

    fn init(
        &mut self,
        ctx: &Context<'_, Self>,
        vertex: &Vertex<'_, VertexRecord>,
        message: SparseVec,
    ) {
        if ctx.iteration() == 0 {
            self.flow.clear();
            if ctx.config().is_source(vertex.id) {
                self.flow.insert(vertex.id, 1.0);
            }
        } else {
            self.flow = message;
        }
    }

    fn gather_edges(
        &self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, VertexRecord>,
    ) -> EdgeDir {
        EdgeDir::NoEdges
    }

    fn apply(
        &mut self,
        ctx: &Context<'_, Self>,
        vertex: &mut VertexMut<'_, VertexRecord>,
        _total: (),
    ) {
        if ctx.is_last_iteration() {
            vertex.data.flow.merge_into(&self.flow);
            self.flow.clear();
            return;
        }

        let threshold = ctx.config().threshold;
        let spread = if vertex.num_out_edges > 0 {
            1.0 / vertex.num_out_edges as f64
        } else {
            1.0
        };
        let factor = (1.0 - RESET_PROB) * spread;

        let mut next = SparseVec::new();
        for (source, weight) in self.flow.iter() {
            vertex.data.residual.add(source, RESET_PROB * weight);
            let pushed = factor * weight;
            if pushed > threshold {
                next.insert(source, pushed);
            }
        }
        self.flow = next;
    }

    fn scatter_edges(
        &self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, VertexRecord>,
    ) -> EdgeDir {
        if self.flow.is_empty() {
            EdgeDir::NoEdges
        } else {
            EdgeDir::OutEdges
        }
    }

    fn scatter(&self, ctx: &Context<'_, Self>, _vertex: &Vertex<'_, VertexRecord>, edge: Edge) {
        ctx.signal(edge.target, self.flow.clone());
    }
}
