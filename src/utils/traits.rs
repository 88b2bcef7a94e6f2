/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// A value that can absorb another value of the same type.
///
/// Implementations must be commutative and associative, so that the result of
/// merging a set of values does not depend on the order in which they are
/// merged: this is what makes concurrent message delivery deterministic.
pub trait Merge {
    /// Merges `other` into `self`.
    fn merge(&mut self, other: Self);
}

impl Merge for () {
    #[inline(always)]
    fn merge(&mut self, _other: Self) {}
}

/// A message exchanged between vertices.
///
/// Messages addressed to the same vertex during a superstep are combined
/// using [`Merge`] before being delivered, and the [default
/// value](Default::default) is what a vertex receives when no message was
/// addressed to it.
pub trait Message: Merge + Default + Send {
    /// Returns a scheduling hint associated with this message.
    ///
    /// The value is never used for correctness.
    fn priority(&self) -> f64 {
        0.0
    }
}
