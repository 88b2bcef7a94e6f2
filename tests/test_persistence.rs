/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use webgraph_ppr::algo::ppr::*;
use webgraph_ppr::utils::SparseVec;

fn random_vector(rng: &mut StdRng, len: usize) -> SparseVec {
    (0..len)
        .map(|_| (rng.random_range(0..1000), rng.random::<f64>()))
        .collect()
}

#[test]
fn test_quantized_round_trip() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0);
    for len in [1, 2, 10, 100] {
        let ppr = random_vector(&mut rng, len);
        let record = VertexRecord {
            ppr: ppr.clone(),
            ..Default::default()
        };
        let mut buffer = Vec::new();
        record.save(&mut buffer, Encoding::Quantized)?;
        let loaded = VertexRecord::load(&mut buffer.as_slice(), Encoding::Quantized)?;

        let total = ppr.sum();
        assert_eq!(loaded.ppr.len(), ppr.len());
        assert!((loaded.ppr.sum() - 1.0).abs() < 1E-12);
        // Rounding moves each value by at most half a quantum, and
        // renormalization by at most half a quantum per entry
        let tolerance = (1 + ppr.len()) as f64 / 65535.0;
        for ((u, w), (v, z)) in ppr.iter().zip(loaded.ppr.iter()) {
            assert_eq!(u, v);
            assert!((w / total - z).abs() <= tolerance);
        }
    }
    Ok(())
}

#[test]
fn test_quantized_normalized_vector() -> Result<()> {
    let record = VertexRecord {
        ppr: [(0, 0.5), (1, 0.25), (2, 0.125), (3, 0.125)]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let mut buffer = Vec::new();
    record.save(&mut buffer, Encoding::Quantized)?;
    let loaded = VertexRecord::load(&mut buffer.as_slice(), Encoding::Quantized)?;
    for ((_, w), (_, z)) in record.ppr.iter().zip(loaded.ppr.iter()) {
        assert!((w - z).abs() <= 1.0 / 65536.0);
    }
    Ok(())
}

#[test]
fn test_full_round_trip() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let record = VertexRecord {
        ppr: random_vector(&mut rng, 20),
        flow: random_vector(&mut rng, 5),
        residual: random_vector(&mut rng, 7),
    };
    let mut buffer = Vec::new();
    record.save(&mut buffer, Encoding::Full)?;
    assert_eq!(
        VertexRecord::load(&mut buffer.as_slice(), Encoding::Full)?,
        record
    );
    Ok(())
}

#[test]
fn test_record_file() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2);
    let records = (0..10)
        .map(|i| VertexRecord {
            ppr: random_vector(&mut rng, i),
            flow: random_vector(&mut rng, i / 2),
            residual: SparseVec::new(),
        })
        .collect::<Vec<_>>();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("records.ppr");

    save_records(&path, &records, Encoding::Full)?;
    assert_eq!(load_records(&path, Encoding::Full, Some(10))?, records);
    assert_eq!(load_records(&path, Encoding::Full, None)?, records);

    save_records(&path, &records, Encoding::Quantized)?;
    let loaded = load_records(&path, Encoding::Quantized, Some(10))?;
    for (record, loaded) in records.iter().zip(&loaded) {
        assert_eq!(record.ppr.len(), loaded.ppr.len());
        assert!(loaded.flow.is_empty());
    }
    Ok(())
}

#[test]
fn test_length_mismatch() -> Result<()> {
    let records = vec![VertexRecord::default(); 3];
    let mut buffer = Vec::new();
    write_records(&mut buffer, &records, Encoding::Quantized)?;
    assert!(matches!(
        read_records(&mut buffer.as_slice(), Encoding::Quantized, Some(4)),
        Err(PersistenceError::Length {
            expected: 4,
            found: 3
        })
    ));
    Ok(())
}

#[test]
fn test_missing_file() {
    assert!(load_records("/nonexistent/records.ppr", Encoding::Full, None).is_err());
}
