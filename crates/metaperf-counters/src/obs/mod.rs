//! In-process performance-counter registry.
//!
//! Reference `PerfRegistry` used by the binary and tests. Entries live in a
//! `DashMap` with a fixed slot budget, values are atomics, and the whole
//! registry can be rendered as sorted `name=value` lines.

pub mod registry;

pub use registry::PerfDataRegistry;
