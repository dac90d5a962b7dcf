use molgen::core::io::catalog::CatalogError;
use molgen::core::io::export::ExportError;
use molgen::engine::budget::BudgetLimit;
use molgen::engine::config::ConfigError;
use molgen::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(
        "Search stopped early ({limit}) after {found} result(s); narrow your constraints or raise the budget"
    )]
    SearchIncomplete { limit: BudgetLimit, found: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0} (set it in the config file or on the command line)")]
    CoreConfig(#[from] ConfigError),

    #[error("Data management error: {0}")]
    Data(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
