use serde::Deserialize;
use metaperf_core::error::{MetaperfError, Result};

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaperfConfig {
    pub version: u32,

    #[serde(default)]
    pub perf_data: PerfDataSection,

    #[serde(default)]
    pub metaspace: MetaspaceSection,
}

impl MetaperfConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetaperfError::UnsupportedVersion);
        }
        self.perf_data.validate()?;
        self.metaspace.validate()?;
        Ok(())
    }

    /// Runtime gates read by the counter components.
    pub fn flags(&self) -> PerfFlags {
        PerfFlags {
            use_perf_data: self.perf_data.enabled,
            use_compressed_class_pointers: self.metaspace.compressed_class_pointers,
        }
    }
}

impl Default for MetaperfConfig {
    fn default() -> Self {
        Self {
            version: 1,
            perf_data: PerfDataSection::default(),
            metaspace: MetaspaceSection::default(),
        }
    }
}

/// Externally owned feature gates. Read-only for the counter layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfFlags {
    pub use_perf_data: bool,
    pub use_compressed_class_pointers: bool,
}

impl Default for PerfFlags {
    fn default() -> Self {
        Self {
            use_perf_data: true,
            use_compressed_class_pointers: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerfDataSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl Default for PerfDataSection {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: default_prefix(),
            max_entries: default_max_entries(),
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

impl PerfDataSection {
    pub fn validate(&self) -> Result<()> {
        // Both counter sets need four entries each.
        if self.max_entries < 8 {
            return Err(MetaperfError::BadConfig(
                "perf_data.max_entries must be at least 8".into(),
            ));
        }
        if !(10..=60000).contains(&self.sample_interval_ms) {
            return Err(MetaperfError::BadConfig(
                "perf_data.sample_interval_ms must be between 10 and 60000".into(),
            ));
        }
        if self.prefix.starts_with('.') || self.prefix.ends_with('.') {
            return Err(MetaperfError::BadConfig(
                "perf_data.prefix must not start or end with '.'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaspaceSection {
    #[serde(default = "default_true")]
    pub compressed_class_pointers: bool,

    #[serde(default = "default_min_chunk_bytes")]
    pub min_chunk_bytes: u64,

    #[serde(default = "default_compressed_class_space_bytes")]
    pub compressed_class_space_bytes: u64,

    /// Reservation for non-class metadata.
    #[serde(default = "default_max_metaspace_bytes")]
    pub max_metaspace_bytes: u64,
}

impl Default for MetaspaceSection {
    fn default() -> Self {
        Self {
            compressed_class_pointers: true,
            min_chunk_bytes: default_min_chunk_bytes(),
            compressed_class_space_bytes: default_compressed_class_space_bytes(),
            max_metaspace_bytes: default_max_metaspace_bytes(),
        }
    }
}

impl MetaspaceSection {
    pub fn validate(&self) -> Result<()> {
        if self.min_chunk_bytes == 0 {
            return Err(MetaperfError::BadConfig(
                "metaspace.min_chunk_bytes must be greater than 0".into(),
            ));
        }
        if !(MIB..=3 * GIB).contains(&self.compressed_class_space_bytes) {
            return Err(MetaperfError::BadConfig(
                "metaspace.compressed_class_space_bytes must be between 1 MiB and 3 GiB".into(),
            ));
        }
        if self.max_metaspace_bytes < MIB {
            return Err(MetaperfError::BadConfig(
                "metaspace.max_metaspace_bytes must be at least 1 MiB".into(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_prefix() -> String {
    "sun.gc".into()
}
fn default_max_entries() -> usize {
    512
}
fn default_sample_interval_ms() -> u64 {
    50
}
fn default_min_chunk_bytes() -> u64 {
    1024
}
fn default_compressed_class_space_bytes() -> u64 {
    GIB
}
fn default_max_metaspace_bytes() -> u64 {
    256 * MIB
}
