//! Performance-counter registry contract.
//!
//! The counter layer never stores values itself. It asks a `PerfRegistry`
//! for named entries and keeps the returned `PerfVariable` handles:
//! - constants are written once at creation and never again;
//! - variables are shared handles whose `set_value` is visible to every
//!   registry reader immediately.

pub mod data;

use std::sync::Arc;

use crate::error::Result;

pub use data::{PerfUnit, PerfVariable};

/// Build a published counter name: `<namespace>.<name>`.
pub fn counter_name(ns: &str, name: &str) -> String {
    format!("{ns}.{name}")
}

/// Registry that owns published counter storage.
pub trait PerfRegistry: Send + Sync {
    /// Register an immutable value. Fails when the registry cannot allocate
    /// another entry or the name is taken.
    fn create_constant(&self, ns: &str, name: &str, unit: PerfUnit, value: u64) -> Result<()>;

    /// Register a mutable value and return its handle.
    fn create_variable(
        &self,
        ns: &str,
        name: &str,
        unit: PerfUnit,
        value: u64,
    ) -> Result<Arc<PerfVariable>>;
}
