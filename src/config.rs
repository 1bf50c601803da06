//! Report configuration (YAML)
//!
//! ```yaml
//! company_name: Obras del Sur SRL
//! file_prefix: asistencia
//! output_dir: reports
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ObraResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Printed in the company span; blank means "use each site's client"
    pub company_name: String,
    pub file_prefix: String,
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            file_prefix: "asistencia".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> ObraResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ObraResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise defaults
    pub fn load_or_default(path: Option<&Path>) -> ObraResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
