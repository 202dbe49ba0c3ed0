//! Bounded counter registry backed by `DashMap`.
//!
//! Slots are reserved with an atomic counter before the map is touched, so
//! the configured capacity holds under concurrent registration. A rejected
//! duplicate gives its slot back.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use metaperf_core::error::{MetaperfError, Result};
use metaperf_core::perf::{counter_name, PerfRegistry, PerfUnit, PerfVariable};

use crate::config::PerfDataSection;

enum PerfEntry {
    Constant { unit: PerfUnit, value: u64 },
    Variable(Arc<PerfVariable>),
}

impl PerfEntry {
    fn value(&self) -> u64 {
        match self {
            PerfEntry::Constant { value, .. } => *value,
            PerfEntry::Variable(v) => v.get(),
        }
    }

    fn unit(&self) -> PerfUnit {
        match self {
            PerfEntry::Constant { unit, .. } => *unit,
            PerfEntry::Variable(v) => v.unit(),
        }
    }
}

pub struct PerfDataRegistry {
    prefix: String,
    capacity: usize,
    used_slots: AtomicUsize,
    entries: DashMap<String, PerfEntry>,
}

impl PerfDataRegistry {
    /// Create a registry holding at most `capacity` entries. An empty prefix
    /// publishes names as `<ns>.<name>`.
    pub fn new(prefix: impl Into<String>, capacity: usize) -> Self {
        Self {
            prefix: prefix.into(),
            capacity,
            used_slots: AtomicUsize::new(0),
            entries: DashMap::new(),
        }
    }

    pub fn from_config(cfg: &PerfDataSection) -> Self {
        Self::new(cfg.prefix.clone(), cfg.max_entries)
    }

    /// Full published path for a counter.
    pub fn path(&self, ns: &str, name: &str) -> String {
        let base = counter_name(ns, name);
        if self.prefix.is_empty() {
            base
        } else {
            format!("{}.{}", self.prefix, base)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of a published counter, by full path.
    pub fn get(&self, path: &str) -> Option<u64> {
        self.entries.get(path).map(|e| e.value().value())
    }

    pub fn unit(&self, path: &str) -> Option<PerfUnit> {
        self.entries.get(path).map(|e| e.value().unit())
    }

    pub fn is_constant(&self, path: &str) -> Option<bool> {
        self.entries
            .get(path)
            .map(|e| matches!(e.value(), PerfEntry::Constant { .. }))
    }

    /// Point-in-time copy of every counter, sorted by path.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.entries
            .iter()
            .map(|r| (r.key().clone(), r.value().value()))
            .collect()
    }

    /// Render all counters as `name=value` lines, sorted by name.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.snapshot() {
            let _ = writeln!(out, "{}={}", name, value);
        }
        out
    }

    fn reserve_slot(&self, path: &str) -> Result<()> {
        self.used_slots
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| MetaperfError::RegistryExhausted {
                name: path.to_string(),
                capacity: self.capacity,
            })
    }

    fn insert(&self, path: String, entry: PerfEntry) -> Result<()> {
        self.reserve_slot(&path)?;
        match self.entries.entry(path) {
            Entry::Occupied(o) => {
                self.used_slots.fetch_sub(1, Ordering::AcqRel);
                Err(MetaperfError::DuplicateCounter(o.key().clone()))
            }
            Entry::Vacant(v) => {
                v.insert(entry);
                Ok(())
            }
        }
    }
}

impl PerfRegistry for PerfDataRegistry {
    fn create_constant(&self, ns: &str, name: &str, unit: PerfUnit, value: u64) -> Result<()> {
        self.insert(self.path(ns, name), PerfEntry::Constant { unit, value })
    }

    fn create_variable(
        &self,
        ns: &str,
        name: &str,
        unit: PerfUnit,
        value: u64,
    ) -> Result<Arc<PerfVariable>> {
        let path = self.path(ns, name);
        let var = Arc::new(PerfVariable::new(path.clone(), unit, value));
        self.insert(path, PerfEntry::Variable(Arc::clone(&var)))?;
        Ok(var)
    }
}
