use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::Result;
use std::path::Path;
use tracing::info;

pub async fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => handle_path(),
        DataCommands::SetPath { path } => handle_set_path(&path),
        DataCommands::ResetPath => handle_reset_path(),
    }
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("Data directory: {}", manager.get_data_path().display());
    println!("Catalog file:   {}", manager.catalog_path().display());
    Ok(())
}

fn handle_set_path(path: &Path) -> Result<()> {
    info!("Setting custom data path to {:?}", path);
    DataManager::set_custom_path(path)?;
    println!("✓ Data directory set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    info!("Resetting data path to default.");
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "✓ Data directory reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}
