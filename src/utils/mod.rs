mod sparse_vec;
pub use sparse_vec::SparseVec;

mod threadpool;
pub use threadpool::Threads;

mod arc_list;
pub use arc_list::{load_arc_list, parse_arc_list};

pub mod traits;
