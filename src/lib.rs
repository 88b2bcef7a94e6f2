/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

pub mod algo;
pub mod engine;
pub mod utils;

/// Module exposing all traits in a single level.
pub mod traits {
    use super::*;
    pub use engine::VertexProgram;
    pub use utils::traits::*;
}

/// Use `use webgraph_ppr::prelude::*;` to import common utilities, modules and
/// all traits.
pub mod prelude {
    use super::*;
    pub use algo::ppr;
    pub use engine::{SynchronousEngine, VertexFunctorSet};
    pub use traits::*;
    pub use utils::{SparseVec, Threads};
}
