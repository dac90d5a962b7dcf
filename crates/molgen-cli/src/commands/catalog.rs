use crate::cli::{AddUnitArgs, CatalogArgs, CatalogCommands};
use crate::error::{CliError, Result};
use crate::ui;
use molgen::core::io::catalog::Catalog;
use molgen::core::models::unit::Unit;
use std::path::Path;
use tracing::info;

pub async fn run(args: CatalogArgs, catalog_path: &Path) -> Result<()> {
    let mut catalog = Catalog::load(catalog_path)?;
    info!(
        "Loaded {} unit(s) from {:?}",
        catalog.len(),
        catalog_path
    );

    match args.command {
        CatalogCommands::List => {
            if catalog.is_empty() {
                println!(
                    "The catalog at {} is empty. Add units with 'molgen catalog add'.",
                    catalog_path.display()
                );
            } else {
                print!("{}", ui::render_catalog(catalog.units()));
            }
            return Ok(());
        }
        CatalogCommands::Add(add) => {
            let unit = add_unit(&mut catalog, add)?;
            println!(
                "✓ Added '{}' (weight {}) with id {}",
                unit.name(),
                unit.weight(),
                unit.id()
            );
        }
        CatalogCommands::Edit { unit, name, weight } => {
            if name.is_none() && weight.is_none() {
                return Err(CliError::Argument(
                    "Nothing to edit: pass --name and/or --weight.".to_string(),
                ));
            }
            let id = catalog.find(&unit)?.id().clone();
            let edited = catalog.update(&id, name, weight)?;
            println!(
                "✓ Updated {}: name '{}', weight {}",
                edited.id(),
                edited.name(),
                edited.weight()
            );
        }
        CatalogCommands::Remove { unit } => {
            let id = catalog.find(&unit)?.id().clone();
            let removed = catalog.remove(&id)?;
            println!("✓ Removed '{}' ({})", removed.name(), removed.id());
        }
    }

    catalog.save(catalog_path)?;
    Ok(())
}

fn add_unit(catalog: &mut Catalog, args: AddUnitArgs) -> Result<Unit> {
    match (args.element, args.name, args.weight) {
        (Some(symbol), _, _) => Ok(catalog.add_element(&symbol)?),
        (None, Some(name), Some(weight)) => Ok(catalog.add(name, weight)?),
        _ => Err(CliError::Argument(
            "Either --element or both --name and --weight are required.".to_string(),
        )),
    }
}
