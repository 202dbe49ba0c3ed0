//! Owned lifecycle for both metaspace counter components.
//!
//! Replaces process-wide counter pointers with one context object that the
//! runtime's observability layer holds. Each component has a one-shot slot:
//! - the first initializer claims the slot with a compare-exchange, so
//!   concurrent initialization is safe and exactly one caller proceeds;
//! - a failed construction leaves the slot claimed but empty, and later
//!   updates report `NotInitialized` for that component only. The aggregate
//!   calls still drive the other component.
//!
//! Updates are expected from a single sampling thread. Concurrent updates are
//! memory-safe but may interleave their three-counter writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use metaperf_core::error::{MetaperfError, Result};
use metaperf_core::perf::PerfRegistry;
use metaperf_core::region::MetaspaceStats;

use crate::config::PerfFlags;
use crate::counters::{CompressedClassSpaceCounters, MetaspaceCounters};

struct InitOnce<T> {
    claimed: AtomicBool,
    cell: OnceLock<T>,
}

impl<T> InitOnce<T> {
    fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
            cell: OnceLock::new(),
        }
    }

    fn claim(&self, ns: &str) -> Result<()> {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| MetaperfError::AlreadyInitialized(ns.to_string()))
    }

    fn ready(&self, ns: &str) -> Result<&T> {
        self.cell
            .get()
            .ok_or_else(|| MetaperfError::NotInitialized(ns.to_string()))
    }
}

pub struct PerfCountersContext {
    flags: PerfFlags,
    stats: Arc<dyn MetaspaceStats>,
    registry: Arc<dyn PerfRegistry>,
    metaspace: InitOnce<MetaspaceCounters>,
    class_space: InitOnce<CompressedClassSpaceCounters>,
}

impl PerfCountersContext {
    pub fn new(
        flags: PerfFlags,
        stats: Arc<dyn MetaspaceStats>,
        registry: Arc<dyn PerfRegistry>,
    ) -> Self {
        Self {
            flags,
            stats,
            registry,
            metaspace: InitOnce::new(),
            class_space: InitOnce::new(),
        }
    }

    pub fn flags(&self) -> PerfFlags {
        self.flags
    }

    /// Initialize both components, metaspace first. Both are always
    /// attempted; the first error is returned.
    pub fn initialize_performance_counters(&self) -> Result<()> {
        let metaspace = self.initialize_metaspace_counters();
        let class_space = self.initialize_class_space_counters();
        metaspace.and(class_space)
    }

    /// Update both components. A component that is not ready does not keep
    /// the other from refreshing; the first error is returned.
    pub fn update_performance_counters(&self) -> Result<()> {
        let metaspace = self.update_metaspace_counters();
        let class_space = self.update_class_space_counters();
        metaspace.and(class_space)
    }

    /// True when at least one component has live counters to refresh.
    pub fn has_ready_counters(&self) -> bool {
        self.metaspace().is_some() || self.class_space().is_some()
    }

    pub fn initialize_metaspace_counters(&self) -> Result<()> {
        if !self.flags.use_perf_data {
            return Ok(());
        }
        self.metaspace.claim(MetaspaceCounters::NAMESPACE)?;
        let Some(counters) = MetaspaceCounters::initialize_performance_counters(
            &self.flags,
            Arc::clone(&self.stats),
            self.registry.as_ref(),
        )?
        else {
            return Ok(());
        };
        self.metaspace
            .cell
            .set(counters)
            .map_err(|_| MetaperfError::AlreadyInitialized(MetaspaceCounters::NAMESPACE.into()))
    }

    pub fn initialize_class_space_counters(&self) -> Result<()> {
        if !self.flags.use_perf_data {
            return Ok(());
        }
        self.class_space.claim(CompressedClassSpaceCounters::NAMESPACE)?;
        let Some(counters) = CompressedClassSpaceCounters::initialize_performance_counters(
            &self.flags,
            Arc::clone(&self.stats),
            self.registry.as_ref(),
        )?
        else {
            return Ok(());
        };
        self.class_space.cell.set(counters).map_err(|_| {
            MetaperfError::AlreadyInitialized(CompressedClassSpaceCounters::NAMESPACE.into())
        })
    }

    pub fn update_metaspace_counters(&self) -> Result<()> {
        if !self.flags.use_perf_data {
            return Ok(());
        }
        self.metaspace
            .ready(MetaspaceCounters::NAMESPACE)?
            .update_performance_counters();
        Ok(())
    }

    /// No-op unless perf data is on and compressed class pointers are in
    /// use; a zeroed class-space set is never rewritten.
    pub fn update_class_space_counters(&self) -> Result<()> {
        if !self.flags.use_perf_data || !self.flags.use_compressed_class_pointers {
            return Ok(());
        }
        self.class_space
            .ready(CompressedClassSpaceCounters::NAMESPACE)?
            .update_performance_counters();
        Ok(())
    }

    pub fn metaspace(&self) -> Option<&MetaspaceCounters> {
        self.metaspace.cell.get()
    }

    pub fn class_space(&self) -> Option<&CompressedClassSpaceCounters> {
        self.class_space.cell.get()
    }
}
