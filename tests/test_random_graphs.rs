/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::prelude::*;
use webgraph::graphs::random::ErdosRenyi;
use webgraph::graphs::vec_graph::VecGraph;
use webgraph::traits::SequentialLabeling;
use webgraph_ppr::algo::ppr::*;
use webgraph_ppr::threads;

/// Checks that no source gains mass and that the collected vectors are
/// mass-bounded on Erdős–Rényi graphs.
fn check_er(n: usize, p: f64, threshold: f64, no_index: bool) -> Result<()> {
    let graph = VecGraph::from_lender(ErdosRenyi::new(n, p, 0).iter());
    let sources = (0..n).step_by(3).collect::<SourceSet>();
    let config = PprConfig::default()
        .with_threshold(threshold)
        .with_niters(8)
        .with_no_index(no_index)
        .with_sources(Some(sources.clone()));

    // Every node starts with itself as its PPR vector
    let mut records = (0..graph.num_nodes())
        .map(|node| VertexRecord {
            ppr: [(node, 1.0)].into_iter().collect(),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    let ppr = MultiSourcePpr::new(&graph, &config).with_granularity(4);
    ppr.decompose(&mut records, &threads![4], no_logging![]);
    for source in 0..graph.num_nodes() {
        let mass: f64 = records
            .iter()
            .map(|r| r.flow.get(source).unwrap_or(0.0) + r.residual.get(source).unwrap_or(0.0))
            .sum();
        if sources.contains(source) {
            assert!(mass <= 1.0 + 1E-9, "source {}: mass {}", source, mass);
        } else {
            assert_eq!(mass, 0.0);
        }
    }

    ppr.collect(&mut records, &threads![4], no_logging![]);
    for (node, record) in records.iter().enumerate() {
        assert!(record.residual.is_empty());
        if sources.contains(node) {
            assert!(record.ppr.sum() <= 1.0 + 1E-9);
        } else {
            assert_eq!(record.ppr.iter().collect::<Vec<_>>(), vec![(node, 1.0)]);
        }
    }
    Ok(())
}

#[test]
fn test_er_small() -> Result<()> {
    for d in 1..5 {
        check_er(30, d as f64 / 10.0, 0.0, false)?;
        check_er(30, d as f64 / 10.0, 1E-3, true)?;
    }
    Ok(())
}

#[cfg_attr(not(feature = "slow_tests"), ignore)]
#[test]
fn test_er_large() -> Result<()> {
    for d in [1, 5, 20] {
        check_er(2000, d as f64 / 1000.0, 1E-5, false)?;
    }
    Ok(())
}
