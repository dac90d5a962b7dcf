use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use molgen::core::io::catalog::Catalog;
use molgen::core::models::unit::QuantityMap;
use molgen::engine::budget::{CancellationToken, SearchBudget};
use molgen::engine::config::GenerationConfigBuilder;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

pub fn build_config(
    args: &GenerateArgs,
    catalog: &Catalog,
    cancellation: CancellationToken,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let target_mass = args.target_mass.or(file_config.target_mass);
    let max_deviation = args
        .max_deviation
        .or(file_config.max_deviation)
        .unwrap_or(defaults.max_deviation);

    let unit_refs = if args.units.is_empty() {
        file_config.units.take().unwrap_or_default()
    } else {
        args.units.clone()
    };
    let units = if unit_refs.is_empty() {
        debug!("No units selected; using the whole catalog.");
        catalog.units().to_vec()
    } else {
        catalog.select(&unit_refs)?
    };

    let min_quantities = resolve_bounds(
        catalog,
        file_config.min_quantities.take(),
        &args.min_quantities,
    )?;
    let max_quantities = resolve_bounds(
        catalog,
        file_config.max_quantities.take(),
        &args.max_quantities,
    )?;

    let budget_file = file_config.budget.take().unwrap_or_default();
    let timeout_secs = args
        .timeout_secs
        .or(budget_file.timeout_secs)
        .unwrap_or(defaults.timeout_secs);
    let budget = SearchBudget {
        max_leaves: args
            .max_leaves
            .or(budget_file.max_leaves)
            .or(defaults.max_leaves),
        max_steps: args
            .max_steps
            .or(budget_file.max_steps)
            .or(defaults.max_steps),
        timeout: timeout_from_secs(timeout_secs)?,
        cancellation: Some(cancellation),
    };

    let parallel = args.parallel || file_config.parallel.unwrap_or(defaults.parallel);

    let mut builder = GenerationConfigBuilder::new()
        .max_deviation(max_deviation)
        .min_quantities(min_quantities)
        .max_quantities(max_quantities)
        .budget(budget)
        .parallel(parallel);
    if let Some(target_mass) = target_mass {
        builder = builder.target_mass(target_mass);
    }
    let core_config = builder.build()?;

    Ok(AppConfig {
        units,
        core_config,
        output_path: args.output.clone(),
        display_limit: args.limit.unwrap_or(defaults.display_limit),
    })
}

/// Resolves file bounds first, then command-line bounds, so a `--min`/`--max`
/// for the same unit replaces the file's entry.
fn resolve_bounds(
    catalog: &Catalog,
    file_bounds: Option<BTreeMap<String, u32>>,
    cli_bounds: &[String],
) -> Result<QuantityMap> {
    let mut bounds = QuantityMap::new();
    for (reference, quantity) in file_bounds.into_iter().flatten() {
        bounds.insert(catalog.find(&reference)?.id().clone(), quantity);
    }
    for entry in cli_bounds {
        let (reference, quantity) = parser::parse_quantity_bound(entry)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        bounds.insert(catalog.find(&reference)?.id().clone(), quantity);
    }
    Ok(bounds)
}

fn timeout_from_secs(secs: f64) -> Result<Option<Duration>> {
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| CliError::Config(format!("Invalid timeout: {} seconds", secs)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let invalid = |kind: &str| {
            CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
        };

        match key {
            "target-mass" => {
                config.target_mass = Some(value_str.parse().map_err(|_| invalid("float"))?);
            }
            "max-deviation" => {
                config.max_deviation = Some(value_str.parse().map_err(|_| invalid("float"))?);
            }
            "parallel" => {
                config.parallel = Some(value_str.parse().map_err(|_| invalid("boolean"))?);
            }
            "budget.max-leaves" => {
                config
                    .budget
                    .get_or_insert_with(Default::default)
                    .max_leaves = Some(value_str.parse().map_err(|_| invalid("integer"))?);
            }
            "budget.max-steps" => {
                config
                    .budget
                    .get_or_insert_with(Default::default)
                    .max_steps = Some(value_str.parse().map_err(|_| invalid("integer"))?);
            }
            "budget.timeout-secs" => {
                config
                    .budget
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(value_str.parse().map_err(|_| invalid("float"))?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
