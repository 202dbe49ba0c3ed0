//! Counter units and the shared variable handle.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Unit attached to a published counter.
///
/// This is the registry's unit vocabulary; the metaspace counters only
/// publish `Bytes`, the rest are there for other producers sharing a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerfUnit {
    /// Dimensionless value.
    None,
    Bytes,
    /// Clock ticks of the producing runtime.
    Ticks,
    /// Occurrence count.
    Events,
    /// Text-valued counter.
    String,
    Hertz,
}

impl PerfUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            PerfUnit::None => "none",
            PerfUnit::Bytes => "bytes",
            PerfUnit::Ticks => "ticks",
            PerfUnit::Events => "events",
            PerfUnit::String => "string",
            PerfUnit::Hertz => "hertz",
        }
    }
}

/// Mutable published value.
///
/// Writers and readers share the handle through `Arc`; stores are relaxed
/// because readers only need the latest value, not ordering with other data.
#[derive(Debug)]
pub struct PerfVariable {
    name: String,
    unit: PerfUnit,
    value: AtomicU64,
}

impl PerfVariable {
    pub fn new(name: impl Into<String>, unit: PerfUnit, value: u64) -> Self {
        Self {
            name: name.into(),
            unit,
            value: AtomicU64::new(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> PerfUnit {
        self.unit
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn set_value(&self, v: u64) {
        self.value.store(v, Ordering::Relaxed);
    }
}
