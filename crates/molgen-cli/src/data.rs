use crate::error::{CliError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const CATALOG_FILE_NAME: &str = "catalog.toml";
const PATH_CONFIG_FILE_NAME: &str = "path.conf";

/// Locates the directory that holds the unit catalog.
///
/// The OS-specific default can be replaced by a custom directory recorded in
/// `path.conf` inside the configuration directory.
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.base_path.join(CATALOG_FILE_NAME)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Argument(format!(
                "Data path must be absolute, got '{}'.",
                path.display()
            )));
        }
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = path.to_str().ok_or_else(|| {
            CliError::Argument(format!(
                "Data path '{}' is not valid UTF-8.",
                path.display()
            ))
        })?;
        fs::write(&config_path, text)?;
        info!("Custom data path recorded in {:?}", &config_path);
        Ok(())
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(&config_path)?;
                info!("Removed custom data path file {:?}", &config_path);
            }
        }
        Ok(())
    }

    fn determine_data_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                Self::read_custom_path(&config_path)?.map_or_else(Self::get_default_data_path, Ok)
            }
            _ => Self::get_default_data_path(),
        }
    }

    fn read_custom_path(config_path: &Path) -> Result<Option<PathBuf>> {
        let custom_path_str = fs::read_to_string(config_path)?.trim().to_string();
        if custom_path_str.is_empty() {
            warn!("Custom path config file is empty, falling back to default path.");
            Ok(None)
        } else {
            Ok(Some(PathBuf::from(custom_path_str)))
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "molgen", "molgen")
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join(PATH_CONFIG_FILE_NAME))
            .ok_or_else(|| CliError::Data("Could not determine config directory path.".to_string()))
    }

    fn get_default_data_path() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                CliError::Data("Could not determine default data directory path.".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn catalog_lives_in_the_data_directory() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());
        assert_eq!(manager.get_data_path(), temp_dir.path());
        assert_eq!(manager.catalog_path(), temp_dir.path().join("catalog.toml"));
    }

    #[test]
    fn read_custom_path_trims_whitespace() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("path.conf");
        fs::write(&config_path, "  /srv/molgen\n").unwrap();
        assert_eq!(
            DataManager::read_custom_path(&config_path).unwrap(),
            Some(PathBuf::from("/srv/molgen"))
        );
    }

    #[test]
    fn read_custom_path_treats_blank_file_as_unset() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("path.conf");
        fs::write(&config_path, "\n").unwrap();
        assert_eq!(DataManager::read_custom_path(&config_path).unwrap(), None);
    }

    #[test]
    fn set_custom_path_rejects_relative_paths() {
        let result = DataManager::set_custom_path(Path::new("relative/dir"));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
