//! Counter config loader (strict parsing).

pub mod schema;

use std::fs;

use metaperf_core::error::{MetaperfError, Result};

pub use schema::{MetaperfConfig, MetaspaceSection, PerfDataSection, PerfFlags};

pub fn load_from_file(path: &str) -> Result<MetaperfConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetaperfError::BadConfig(format!("read config `{path}` failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MetaperfConfig> {
    let cfg: MetaperfConfig = serde_yaml::from_str(s)
        .map_err(|e| MetaperfError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
