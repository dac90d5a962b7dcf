use crate::cli::GenerateArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::ui;
use crate::utils::progress::CliProgressHandler;
use molgen::core::io::catalog::Catalog;
use molgen::core::io::export;
use molgen::core::models::result::GenerationResult;
use molgen::engine::budget::CancellationToken;
use molgen::engine::error::EngineError;
use molgen::engine::progress::ProgressReporter;
use molgen::workflows;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(args: GenerateArgs, catalog_path: &Path) -> Result<()> {
    let catalog = Catalog::load(catalog_path)?;
    info!("Loaded {} unit(s) from {:?}", catalog.len(), catalog_path);

    let cancellation = CancellationToken::new();
    let AppConfig {
        units,
        core_config,
        output_path,
        display_limit,
    } = build_config(&args, &catalog, cancellation.clone())?;

    if units.is_empty() {
        warn!("No units selected; only the empty composite can be produced.");
    }
    println!(
        "Generating composites of {} unit(s) for mass {} ± {}...",
        units.len(),
        core_config.target_mass,
        core_config.max_deviation
    );

    let progress_handler = CliProgressHandler::new();
    let callback = progress_handler.get_callback();
    let mut search = tokio::task::spawn_blocking(move || {
        let reporter = ProgressReporter::with_callback(callback);
        workflows::generate::run(&units, &core_config, &reporter)
    });

    let joined = tokio::select! {
        joined = &mut search => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupt received; stopping the search.");
            cancellation.cancel();
            search.await
        }
    };
    let outcome =
        joined.map_err(|e| CliError::Other(anyhow::anyhow!("Generation task failed: {}", e)))?;

    match outcome {
        Ok(report) => {
            info!(
                "Generation finished with {} result(s) after {} step(s).",
                report.results.len(),
                report.stats.steps
            );
            present(&report.results, output_path.as_deref(), display_limit)
        }
        Err(EngineError::SearchBudgetExceeded { limit, partial }) => {
            println!("⚠ Too many results, narrow your constraints. Search stopped: {limit}.");
            println!("Showing the {} result(s) found so far.", partial.len());
            present(&partial, output_path.as_deref(), display_limit)?;
            Err(CliError::SearchIncomplete {
                limit,
                found: partial.len(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn present(results: &[GenerationResult], output: Option<&Path>, display_limit: usize) -> Result<()> {
    if results.is_empty() {
        println!("No composite falls within the requested mass window.");
    } else {
        print!("{}", ui::render_results(results, display_limit));
    }

    if let Some(path) = output {
        info!("Writing {} result(s) to {:?}", results.len(), path);
        export::write_results_to_path(results, path)?;
        println!("✓ Wrote {} result(s) to: {}", results.len(), path.display());
    }
    Ok(())
}
