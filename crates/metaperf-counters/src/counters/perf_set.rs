use std::sync::Arc;

use metaperf_core::error::Result;
use metaperf_core::perf::{PerfRegistry, PerfUnit, PerfVariable};
use metaperf_core::region::RegionSizes;

pub const MIN_CAPACITY: &str = "minCapacity";
pub const CAPACITY: &str = "capacity";
pub const MAX_CAPACITY: &str = "maxCapacity";
pub const USED: &str = "used";

/// Published values for one region: constant `minCapacity` plus the mutable
/// `capacity`, `maxCapacity` and `used`, all in bytes.
#[derive(Debug)]
pub struct PerfCounterSet {
    namespace: String,
    min_capacity: u64,
    capacity: Arc<PerfVariable>,
    max_capacity: Arc<PerfVariable>,
    used: Arc<PerfVariable>,
}

impl PerfCounterSet {
    /// Register the four counters under `namespace`.
    ///
    /// Entries created before a registry failure stay registered.
    pub fn create(
        registry: &dyn PerfRegistry,
        namespace: &str,
        min_capacity: u64,
        capacity: u64,
        max_capacity: u64,
        used: u64,
    ) -> Result<Self> {
        registry.create_constant(namespace, MIN_CAPACITY, PerfUnit::Bytes, min_capacity)?;
        let capacity = registry.create_variable(namespace, CAPACITY, PerfUnit::Bytes, capacity)?;
        let max_capacity =
            registry.create_variable(namespace, MAX_CAPACITY, PerfUnit::Bytes, max_capacity)?;
        let used = registry.create_variable(namespace, USED, PerfUnit::Bytes, used)?;

        Ok(Self {
            namespace: namespace.to_string(),
            min_capacity,
            capacity,
            max_capacity,
            used,
        })
    }

    /// Overwrite the mutable counters. Values are published as given.
    pub fn update(&self, capacity: u64, max_capacity: u64, used: u64) {
        self.capacity.set_value(capacity);
        self.max_capacity.set_value(max_capacity);
        self.used.set_value(used);
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn min_capacity(&self) -> u64 {
        self.min_capacity
    }

    /// Values currently published for the mutable counters.
    pub fn current(&self) -> RegionSizes {
        RegionSizes {
            capacity: self.capacity.get(),
            max_capacity: self.max_capacity.get(),
            used: self.used.get(),
        }
    }
}
