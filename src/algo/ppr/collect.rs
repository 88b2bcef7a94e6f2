/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{PprConfig, VertexRecord};
use crate::engine::{Context, EdgeDir, Vertex, VertexMut, VertexProgram};
use crate::utils::SparseVec;

/// Installs the vectors redistributed by [`collect_results`] as the new PPR
/// vectors of the sources.
///
/// Runs for a single superstep. Nodes that receive nothing keep their
/// vector.
#[derive(Debug, Clone, Default)]
pub struct CollectProgram {
    ppr: SparseVec,
}

impl VertexProgram for CollectProgram {
    type VertexData = VertexRecord;
    type Message = SparseVec;
    type Gather = ();
    type Config = PprConfig;

    fn init(
        &mut self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, VertexRecord>,
        message: SparseVec,
    ) {
        self.ppr = message;
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
        _ctx: &Context<'_, Self>,
        vertex: &mut VertexMut<'_, VertexRecord>,
        _total: (),
    ) {
        if !self.ppr.is_empty() {
            vertex.data.ppr = std::mem::take(&mut self.ppr);
        }
    }

    fn scatter_edges(
        &self,
        _ctx: &Context<'_, Self>,
        _vertex: &Vertex<'_, VertexRecord>,
    ) -> EdgeDir {
        EdgeDir::NoEdges
    }
}

/// Sends the mass collected at a node back to the sources it came from.
///
/// For each source whose [flow](VertexRecord::flow) at the node is at least
/// the threshold, the PPR vector of the node, scaled by the flow, is sent to
/// the source; the residual of the same source, if any, is added to the
/// entry of the node and spent. This step is skipped if
/// [`no_index`](PprConfig::no_index) is set.
///
/// Then each remaining residual at least the threshold is sent to its
/// source as a single entry for the node, and the residual is cleared.
pub fn collect_results(
    ctx: &Context<'_, CollectProgram>,
    vertex: &mut VertexMut<'_, VertexRecord>,
) {
    let config = ctx.config();
    let id = vertex.id;
    let data = &mut *vertex.data;

    if !config.no_index {
        for (source, weight) in data.flow.iter() {
            if weight < config.threshold {
                continue;
            }
            let mut contribution = data.ppr.clone();
            contribution.scale(weight);
            if let Some(residual) = data.residual.remove(source) {
                contribution.add(id, residual);
            }
            ctx.signal(source, contribution);
        }
    }

    for (source, weight) in data.residual.iter() {
        if weight >= config.threshold {
            ctx.signal(source, [(id, weight)].into_iter().collect());
        }
    }
    data.residual.clear();
}
