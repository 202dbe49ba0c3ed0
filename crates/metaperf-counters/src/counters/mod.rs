//! Metaspace counter components.
//!
//! - `PerfCounterSet`: the four published values of one region.
//! - `RegionCounters`: a counter set plus the source it samples from.
//! - `MetaspaceCounters` / `CompressedClassSpaceCounters`: per-region
//!   lifecycle. A value of either type only exists after a successful
//!   initialization, so updating uninitialized counters cannot be expressed.

pub mod class_space;
pub mod metaspace;
pub mod perf_set;
pub mod source;

pub use class_space::CompressedClassSpaceCounters;
pub use metaspace::MetaspaceCounters;
pub use perf_set::PerfCounterSet;
pub use source::{RegionCounters, RegionSource};
