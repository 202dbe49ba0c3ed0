//! metaperf counters library entry.
//!
//! Publishes metaspace and compressed-class-space utilization into a
//! performance-counter registry: counter components, their owned lifecycle
//! context, a periodic sampler, the reference registry and accounting
//! source, and the config loader. Consumed by the binary (`main.rs`) and by
//! integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod accounting;
pub mod config;
pub mod context;
pub mod counters;
pub mod obs;
pub mod sampler;

pub use context::PerfCountersContext;
pub use counters::{CompressedClassSpaceCounters, MetaspaceCounters, PerfCounterSet};
