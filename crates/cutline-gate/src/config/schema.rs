use cutline_core::error::{CutError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CutConfig {
    pub version: u32,

    #[serde(default)]
    pub interceptor: InterceptorSection,

    #[serde(default)]
    pub criteria: CriteriaSection,
}

impl CutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CutError::UnsupportedVersion);
        }

        self.interceptor.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptorSection {
    /// Stage name reported in tracing events.
    #[serde(default = "default_name")]
    pub name: String,

    /// Emit a debug event for every blocked action.
    #[serde(default = "default_true")]
    pub trace_blocked: bool,
}

impl Default for InterceptorSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            trace_blocked: true,
        }
    }
}

impl InterceptorSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CutError::BadConfig("interceptor.name must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaSection {
    /// Emit a debug event naming the criteria that denied an action.
    #[serde(default = "default_true")]
    pub trace_denials: bool,
}

impl Default for CriteriaSection {
    fn default() -> Self {
        Self { trace_denials: true }
    }
}

fn default_name() -> String {
    "cut".into()
}
fn default_true() -> bool {
    true
}
