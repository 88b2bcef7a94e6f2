/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::utils::traits::{Merge, Message};
use kahan::KahanSum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse vector of nonnegative weights indexed by node.
///
/// The vector is used both as per-node state and as the payload of the
/// messages exchanged between nodes. Iteration happens in increasing node
/// order.
///
/// Entries are never removed implicitly: an entry whose weight becomes zero,
/// or negligible, stays in the vector until it is explicitly
/// [removed](SparseVec::remove) or the vector is [cleared](SparseVec::clear).
///
/// # Examples
/// ```
/// # use webgraph_ppr::utils::SparseVec;
/// let mut a: SparseVec = [(0, 0.5), (2, 0.25)].into_iter().collect();
/// let b: SparseVec = [(2, 0.25), (3, 1.0)].into_iter().collect();
/// a.merge_into(&b);
/// assert_eq!(a.get(2), Some(0.5));
/// assert_eq!(a.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVec(BTreeMap<usize, f64>);

impl SparseVec {
    /// Creates a new empty vector.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` if the vector has no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the weight associated with `node`, if any.
    #[inline(always)]
    pub fn get(&self, node: usize) -> Option<f64> {
        self.0.get(&node).copied()
    }

    /// Adds `weight` to the entry of `node`, creating it if necessary.
    #[inline(always)]
    pub fn add(&mut self, node: usize, weight: f64) {
        *self.0.entry(node).or_insert(0.0) += weight;
    }

    /// Sets the entry of `node` to `weight`.
    #[inline(always)]
    pub fn insert(&mut self, node: usize, weight: f64) {
        self.0.insert(node, weight);
    }

    /// Removes the entry of `node`, returning its weight.
    pub fn remove(&mut self, node: usize) -> Option<f64> {
        self.0.remove(&node)
    }

    /// Returns an iterator over the entries in increasing node order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(&node, &weight)| (node, weight))
    }

    /// Adds every entry of `other` to the matching entry of `self`.
    ///
    /// Missing entries are treated as zero, so this is the elementwise sum
    /// over the union of the keys.
    pub fn merge_into(&mut self, other: &SparseVec) {
        for (node, weight) in other.iter() {
            self.add(node, weight);
        }
    }

    /// Multiplies every weight by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.0.values_mut().for_each(|weight| *weight *= factor);
    }

    /// Returns the sum of the weights.
    pub fn sum(&self) -> f64 {
        let mut sum = KahanSum::new_with_value(0.0);
        for &weight in self.0.values() {
            sum += weight;
        }
        sum.sum()
    }

    /// Returns the nodes of the (at most) `k` largest entries, by decreasing
    /// weight.
    ///
    /// The sort is stable, so nodes with the same weight appear in increasing
    /// order.
    pub fn top_k(&self, k: usize) -> Vec<usize> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(k);
        entries.into_iter().map(|(node, _)| node).collect()
    }
}

impl FromIterator<(usize, f64)> for SparseVec {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        let mut vec = SparseVec::new();
        for (node, weight) in iter {
            vec.add(node, weight);
        }
        vec
    }
}

impl Merge for SparseVec {
    fn merge(&mut self, other: Self) {
        if self.is_empty() {
            *self = other;
        } else {
            self.merge_into(&other);
        }
    }
}

impl Message for SparseVec {
    /// The total mass carried by the message.
    fn priority(&self) -> f64 {
        self.sum()
    }
}
