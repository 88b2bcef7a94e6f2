/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// The worker pool the engine runs supersteps on.
#[derive(Debug, Clone, Copy, Default)]
pub enum Threads {
    /// As many threads as rayon chooses by default.
    #[default]
    Default,
    /// A fixed number of threads.
    NumThreads(usize),
}

impl Threads {
    pub fn build(self) -> rayon::ThreadPool {
        match self {
            Self::Default => rayon::ThreadPoolBuilder::new()
                .build()
                .expect("Should be able to build default threadpool"),
            Self::NumThreads(num_threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .unwrap_or_else(|_| {
                    panic!(
                        "Should be able to build custom threadpool with {} threads",
                        num_threads
                    )
                }),
        }
    }
}

impl From<Option<usize>> for Threads {
    fn from(num_threads: Option<usize>) -> Self {
        match num_threads {
            Some(n) => Self::NumThreads(n),
            None => Self::Default,
        }
    }
}

/// Builds a [`rayon::ThreadPool`].
///
/// `threads![]` builds a pool with the default number of threads, and
/// `threads![n]` a pool with `n` threads.
///
/// # Examples
/// ```
/// # use webgraph_ppr::threads;
/// let pool = threads![2];
/// assert_eq!(pool.current_num_threads(), 2);
/// ```
#[macro_export]
macro_rules! threads {
    () => {
        $crate::utils::Threads::Default.build()
    };
    ($num_threads:expr) => {
        $crate::utils::Threads::NumThreads($num_threads).build()
    };
}
