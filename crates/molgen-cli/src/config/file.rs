use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBudgetConfig {
    pub max_leaves: Option<u64>,
    pub max_steps: Option<u64>,
    pub timeout_secs: Option<f64>,
}

/// Bounds and unit lists refer to units by id or name, exactly as on the
/// command line.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub target_mass: Option<f64>,
    pub max_deviation: Option<f64>,
    pub units: Option<Vec<String>>,
    pub parallel: Option<bool>,
    pub min_quantities: Option<BTreeMap<String, u32>>,
    pub max_quantities: Option<BTreeMap<String, u32>>,
    pub budget: Option<FileBudgetConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
