//! Top-level facade crate for metaperf.
//!
//! Re-exports the collaborator contracts and the counter library so users can
//! depend on a single crate.

pub mod core {
    pub use metaperf_core::*;
}

pub mod counters {
    pub use metaperf_counters::*;
}
