//! metaperf core: collaborator contracts, region aggregation, and error types.
//!
//! This crate defines what the counter layer consumes: the allocator's
//! accounting queries (`MetaspaceStats`) and the performance-counter registry
//! (`PerfRegistry`). It carries no runtime or storage dependencies so an
//! embedding allocator can implement the traits without pulling in the rest.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `MetaperfError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod perf;
pub mod region;

/// Shared result type.
pub use error::{ErrorKind, MetaperfError, Result};
pub use perf::{counter_name, PerfRegistry, PerfUnit, PerfVariable};
pub use region::{MetadataType, MetaspaceStats, RegionScope, RegionSizes};
