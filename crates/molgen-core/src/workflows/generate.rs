use crate::core::models::result::GenerationResult;
use crate::core::models::unit::Unit;
use crate::engine::budget::SearchStats;
use crate::engine::config::GenerationConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::ranking::rank;
use crate::engine::search::{SearchOutcome, SearchPlan};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Ranked by ascending absolute deviation.
    pub results: Vec<GenerationResult>,
    pub stats: SearchStats,
}

/// Runs a full generation over `units` with the bounds and budget in `config`.
///
/// When the budget runs out the error still carries the results found so far,
/// already ranked.
#[instrument(skip_all, name = "generation_workflow")]
pub fn run(
    units: &[Unit],
    config: &GenerationConfig,
    reporter: &ProgressReporter,
) -> Result<GenerationReport, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Validating Constraints",
    });
    info!(
        units = units.len(),
        target_mass = config.target_mass,
        max_deviation = config.max_deviation,
        "Preparing generation."
    );
    let plan = SearchPlan::new(
        units,
        &config.min_quantities,
        &config.max_quantities,
        config.target_mass,
        config.max_deviation,
    )?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Enumerating",
    });
    let enumerated = enumerate(&plan, config, reporter);
    reporter.report(Progress::PhaseFinish);

    let outcome = match enumerated {
        Ok(outcome) => {
            reporter.report(Progress::Message(format!(
                "{} composite(s) in window after {} leaves and {} steps ({:.2}s).",
                outcome.results.len(),
                outcome.stats.leaves,
                outcome.stats.steps,
                outcome.stats.elapsed.as_secs_f64()
            )));
            outcome
        }
        Err(EngineError::SearchBudgetExceeded { limit, partial }) => {
            warn!(
                %limit,
                partial = partial.len(),
                "Search budget exhausted; returning partial results."
            );
            reporter.report(Progress::Message(format!(
                "Search stopped early ({limit}); keeping {} partial result(s).",
                partial.len()
            )));
            return Err(EngineError::SearchBudgetExceeded {
                limit,
                partial: rank(&partial),
            });
        }
        Err(e) => return Err(e),
    };

    reporter.report(Progress::PhaseStart { name: "Ranking" });
    let results = rank(&outcome.results);
    reporter.report(Progress::PhaseFinish);

    info!(
        results = results.len(),
        steps = outcome.stats.steps,
        leaves = outcome.stats.leaves,
        elapsed_ms = outcome.stats.elapsed.as_millis() as u64,
        "Generation complete."
    );
    Ok(GenerationReport {
        results,
        stats: outcome.stats,
    })
}

fn enumerate(
    plan: &SearchPlan,
    config: &GenerationConfig,
    reporter: &ProgressReporter,
) -> Result<SearchOutcome, EngineError> {
    #[cfg(feature = "parallel")]
    if config.parallel {
        info!("Enumerating subtrees in parallel.");
        return plan.enumerate_parallel(&config.budget, reporter);
    }

    #[cfg(not(feature = "parallel"))]
    if config.parallel {
        warn!("Parallel enumeration requested but the `parallel` feature is disabled.");
    }

    plan.enumerate(&config.budget, reporter)
}
