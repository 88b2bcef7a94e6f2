/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::utils::traits::Message;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A table of per-node mailboxes.
///
/// Each node owns a slot guarded by its own lock, holding at most one pending
/// message. Messages delivered to a slot that already holds a message are
/// [merged](crate::utils::traits::Merge) into it, so a slot always contains
/// the combination of everything delivered since it was last emptied.
///
/// Operations on different nodes never contend. Since merging is commutative
/// and associative, any interleaving of concurrent deliveries to the same
/// node leaves the same pending message.
///
/// # Examples
/// ```
/// # use webgraph_ppr::engine::VertexFunctorSet;
/// # use webgraph_ppr::utils::SparseVec;
/// let set = VertexFunctorSet::<SparseVec>::new(2);
/// assert!(set.add(1, [(0, 0.5)].into_iter().collect()));
/// assert!(!set.add(1, [(0, 0.25)].into_iter().collect()));
/// assert_eq!(set.test_and_get(1).and_then(|m| m.get(0)), Some(0.75));
/// assert!(set.test_and_get(1).is_none());
/// ```
#[derive(Debug)]
pub struct VertexFunctorSet<M> {
    slots: Vec<Mutex<Option<M>>>,
}

impl<M: Message> VertexFunctorSet<M> {
    /// Creates a table with an empty slot for each of `num_nodes` nodes.
    pub fn new(num_nodes: usize) -> Self {
        let mut slots = Vec::with_capacity(num_nodes);
        slots.resize_with(num_nodes, || Mutex::new(None));
        Self { slots }
    }

    /// Grows the table to `num_nodes` slots.
    ///
    /// The table never shrinks: a smaller value leaves it unchanged.
    pub fn resize(&mut self, num_nodes: usize) {
        if num_nodes > self.slots.len() {
            self.slots.resize_with(num_nodes, || Mutex::new(None));
        }
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the table has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Locks the slot of `node`.
    ///
    /// A slot poisoned by a panicking merge is still usable: the guard is
    /// always released on unwinding, so the lock is never left held.
    #[inline(always)]
    fn lock(&self, node: usize) -> MutexGuard<'_, Option<M>> {
        assert!(
            node < self.slots.len(),
            "Node {} out of bounds (the table has {} slots)",
            node,
            self.slots.len()
        );
        self.slots[node]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers `message` to `node`.
    ///
    /// Returns `true` if the slot was empty, that is, if this is the first
    /// activation of `node` since its slot was last emptied; otherwise
    /// `message` is merged into the pending one and `false` is returned.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    pub fn add(&self, node: usize, message: M) -> bool {
        let mut slot = self.lock(node);
        match slot.as_mut() {
            Some(pending) => {
                pending.merge(message);
                false
            }
            None => {
                *slot = Some(message);
                true
            }
        }
    }

    /// Removes and returns the pending message of `node`, if any.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    pub fn test_and_get(&self, node: usize) -> Option<M> {
        self.lock(node).take()
    }

    /// Returns whether `node` has a pending message and its
    /// [priority](Message::priority), without consuming it.
    ///
    /// The priority of an empty slot is zero.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of bounds.
    pub fn priority(&self, node: usize) -> (bool, f64) {
        let slot = self.lock(node);
        match slot.as_ref() {
            Some(pending) => (true, pending.priority()),
            None => (false, 0.0),
        }
    }
}
