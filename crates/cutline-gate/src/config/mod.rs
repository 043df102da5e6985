//! Gate config loader (strict parsing).

pub mod schema;

use std::fs;

use cutline_core::error::{CutError, Result};

pub use schema::{CriteriaSection, CutConfig, InterceptorSection};

pub fn load_from_file(path: &str) -> Result<CutConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CutError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<CutConfig> {
    let cfg: CutConfig = serde_yaml::from_str(s)
        .map_err(|e| CutError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
