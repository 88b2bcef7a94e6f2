/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::prelude::*;
use webgraph::graphs::vec_graph::VecGraph;
use webgraph_ppr::algo::ppr::*;
use webgraph_ppr::engine::SynchronousEngine;
use webgraph_ppr::threads;
use webgraph_ppr::utils::SparseVec;

fn vector(entries: &[(usize, f64)]) -> SparseVec {
    entries.iter().copied().collect()
}

fn assert_close(actual: &SparseVec, expected: &[(usize, f64)]) {
    assert_eq!(actual.len(), expected.len(), "{:?}", actual);
    for (&(u, w), (v, z)) in expected.iter().zip(actual.iter()) {
        assert_eq!(u, v);
        assert!((w - z).abs() < 1E-12, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn test_flow_times_index() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1)]);
    let config = PprConfig::default()
        .with_threshold(0.0)
        .with_niters(1)
        .with_sources(Some([0].into_iter().collect()));
    let mut records = vec![
        VertexRecord {
            ppr: vector(&[(0, 1.0)]),
            ..Default::default()
        },
        VertexRecord {
            ppr: vector(&[(0, 0.5), (1, 0.5)]),
            ..Default::default()
        },
    ];

    MultiSourcePpr::new(&graph, &config).run(&mut records, &threads![2], no_logging![])?;

    // Residual 0.15 at the source, plus the index of node 1 scaled by 0.85
    assert_close(&records[0].ppr, &[(0, 0.575), (1, 0.425)]);
    // Node 1 received nothing and keeps its vector
    assert_close(&records[1].ppr, &[(0, 0.5), (1, 0.5)]);
    assert!(records.iter().all(|record| record.residual.is_empty()));
    Ok(())
}

#[test]
fn test_residual_is_spent_once() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 0)]);
    let config = PprConfig::default()
        .with_threshold(0.0)
        .with_niters(2)
        .with_sources(Some([0].into_iter().collect()));
    let mut records = vec![
        VertexRecord {
            ppr: vector(&[(0, 1.0)]),
            ..Default::default()
        },
        VertexRecord {
            ppr: vector(&[(1, 1.0)]),
            ..Default::default()
        },
    ];

    MultiSourcePpr::new(&graph, &config).run(&mut records, &threads![1], no_logging![])?;

    // Node 0 has flow 0.85² and residual 0.15 for itself, node 1 residual
    // 0.15 * 0.85
    assert_close(
        &records[0].ppr,
        &[(0, 0.85 * 0.85 + 0.15), (1, 0.15 * 0.85)],
    );
    assert!((records[0].ppr.sum() - 1.0).abs() < 1E-12);
    Ok(())
}

#[test]
fn test_no_index() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 0)]);
    let config = PprConfig::default()
        .with_threshold(0.0)
        .with_niters(2)
        .with_no_index(true)
        .with_sources(Some([0].into_iter().collect()));
    let mut records = vec![VertexRecord::default(); 2];

    MultiSourcePpr::new(&graph, &config).run(&mut records, &threads![1], no_logging![])?;

    // Only residual is redistributed
    assert_close(&records[0].ppr, &[(0, 0.15), (1, 0.15 * 0.85)]);
    assert!(records[1].ppr.is_empty());
    Ok(())
}

#[test]
fn test_collect_threshold() {
    let graph = VecGraph::empty(3);
    let config = PprConfig::default().with_threshold(1E-4);
    let mut records = vec![
        VertexRecord {
            residual: vector(&[(1, 0.5), (2, 1E-5)]),
            flow: vector(&[(2, 1E-5)]),
            ppr: vector(&[(0, 1.0)]),
        },
        VertexRecord::default(),
        VertexRecord::default(),
    ];

    let pool = threads![2];
    let mut engine =
        SynchronousEngine::<_, CollectProgram>::new(&graph, &mut records, &config, 1, &pool);
    engine.transform_vertices(collect_results);
    engine.start(no_logging![]);
    drop(engine);

    assert_close(&records[1].ppr, &[(0, 0.5)]);
    assert!(records[2].ppr.is_empty());
    assert!(records.iter().all(|record| record.residual.is_empty()));
    // Flow is left untouched
    assert_close(&records[0].flow, &[(2, 1E-5)]);
}

#[test]
fn test_mismatched_records() {
    let graph = VecGraph::empty(3);
    let config = PprConfig::default();
    let mut records = vec![VertexRecord::default(); 2];
    assert!(MultiSourcePpr::new(&graph, &config)
        .run(&mut records, &threads![1], no_logging![])
        .is_err());
}

#[test]
#[should_panic(expected = "does not match the number of nodes")]
fn test_collect_mismatched_records() {
    let graph = VecGraph::empty(3);
    let config = PprConfig::default();
    let mut records = vec![VertexRecord::default(); 4];
    MultiSourcePpr::new(&graph, &config).collect(&mut records, &threads![1], no_logging![]);
}
