use super::budget::{BudgetLimit, BudgetTracker, SearchBudget, SearchStats};
use super::constraints::{MassWindow, QuantityBound, QuantityRange, normalize};
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::models::composite::Composite;
use crate::core::models::result::GenerationResult;
use crate::core::models::unit::{QuantityMap, Unit};
use std::sync::Arc;
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Why a walk stopped before exhausting its subtree.
#[derive(Debug)]
enum Halt {
    Budget(BudgetLimit),
    Failed(EngineError),
}

impl Halt {
    fn into_error(self, partial: Vec<GenerationResult>) -> EngineError {
        match self {
            Self::Budget(limit) => EngineError::SearchBudgetExceeded { limit, partial },
            Self::Failed(error) => error,
        }
    }
}

/// Results of a completed enumeration in emission order, plus the effort it took.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<GenerationResult>,
    pub stats: SearchStats,
}

/// A validated search: the unit order, one quantity range per unit and the
/// mass window.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    units: Arc<[Unit]>,
    ranges: Vec<QuantityRange>,
    window: MassWindow,
}

impl SearchPlan {
    /// Validates the window first, then normalizes the quantity maps.
    /// No search work happens here, so a degenerate input fails before any
    /// enumeration starts.
    pub fn new(
        units: &[Unit],
        min_quantities: &QuantityMap,
        max_quantities: &QuantityMap,
        target_mass: f64,
        max_deviation: f64,
    ) -> Result<Self, EngineError> {
        let window = MassWindow::new(target_mass, max_deviation)?;
        let ranges = normalize(units, min_quantities, max_quantities)?;
        Ok(Self {
            units: Arc::from(units),
            ranges,
            window,
        })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn ranges(&self) -> &[QuantityRange] {
        &self.ranges
    }

    pub fn window(&self) -> MassWindow {
        self.window
    }

    /// True when some unit's minimum exceeds its maximum, so no assignment exists.
    pub fn is_vacuous(&self) -> bool {
        self.ranges.iter().any(QuantityRange::is_empty)
    }

    /// Walks every assignment depth-first in unit order, quantities ascending,
    /// and returns the in-window composites in the order they were reached.
    ///
    /// # Errors
    ///
    /// [`EngineError::SearchBudgetExceeded`] carries every result emitted before
    /// the budget tripped.
    pub fn enumerate(
        &self,
        budget: &SearchBudget,
        reporter: &ProgressReporter,
    ) -> Result<SearchOutcome, EngineError> {
        if self.is_vacuous() {
            debug!("A minimum exceeds its maximum; nothing to enumerate.");
            return Ok(SearchOutcome {
                results: Vec::new(),
                stats: SearchStats::default(),
            });
        }

        let tracker = BudgetTracker::new(budget);
        let mut walker = Walker::new(self, &tracker, reporter);
        let tracked = !self.units.is_empty();

        if tracked {
            reporter.report(Progress::TaskStart {
                total_steps: self.first_position_span(),
            });
        }
        let mut assignment = Vec::with_capacity(self.units.len());
        let walked = walker.descend(0, 0.0, &mut assignment);
        if tracked {
            reporter.report(Progress::TaskFinish);
        }

        let stats = tracker.stats();
        match walked {
            Ok(()) => {
                debug!(
                    steps = stats.steps,
                    leaves = stats.leaves,
                    emitted = walker.results.len(),
                    "Enumeration complete."
                );
                Ok(SearchOutcome {
                    results: walker.results,
                    stats,
                })
            }
            Err(halt) => {
                warn!(steps = stats.steps, leaves = stats.leaves, "Enumeration halted.");
                Err(halt.into_error(walker.results))
            }
        }
    }

    /// Like [`enumerate`](Self::enumerate), but explores the subtrees below each
    /// candidate quantity of the first unit on the rayon thread pool.
    ///
    /// Subtree results are concatenated in candidate order, so a completed run
    /// returns exactly what [`enumerate`](Self::enumerate) returns. When a budget
    /// trips, which subtrees got to finish depends on scheduling.
    #[cfg(feature = "parallel")]
    pub fn enumerate_parallel(
        &self,
        budget: &SearchBudget,
        reporter: &ProgressReporter,
    ) -> Result<SearchOutcome, EngineError> {
        if self.is_vacuous() || self.units.is_empty() {
            return self.enumerate(budget, reporter);
        }

        let tracker = BudgetTracker::new(budget);
        let first_weight = self.units[0].weight();
        let first_range = self.ranges[0];

        let mut candidates = Vec::new();
        let mut quantity = first_range.min;
        while first_range.max.admits(quantity) {
            if let Err(limit) = tracker.step() {
                return Err(EngineError::SearchBudgetExceeded {
                    limit,
                    partial: Vec::new(),
                });
            }
            let mass = first_weight * f64::from(quantity);
            if mass > self.window.ceiling() {
                break;
            }
            candidates.push((quantity, mass));
            match quantity.checked_add(1) {
                Some(next) => quantity = next,
                None => break,
            }
        }

        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });

        let subtrees: Vec<(Vec<GenerationResult>, Result<(), Halt>)> = candidates
            .par_iter()
            .map(|&(quantity, mass)| {
                let mut walker = Walker::new(self, &tracker, reporter);
                let mut assignment = Vec::with_capacity(self.units.len());
                assignment.push(quantity);
                let walked = walker.descend(1, mass, &mut assignment);
                reporter.report(Progress::TaskIncrement);
                (walker.results, walked)
            })
            .collect();

        reporter.report(Progress::TaskFinish);

        let mut results = Vec::new();
        let mut first_halt = None;
        for (mut subtree_results, walked) in subtrees {
            results.append(&mut subtree_results);
            if let Err(halt) = walked {
                first_halt.get_or_insert(halt);
            }
        }

        let stats = tracker.stats();
        match first_halt {
            None => {
                debug!(
                    steps = stats.steps,
                    leaves = stats.leaves,
                    subtrees = candidates.len(),
                    emitted = results.len(),
                    "Parallel enumeration complete."
                );
                Ok(SearchOutcome { results, stats })
            }
            Some(halt) => {
                warn!(steps = stats.steps, leaves = stats.leaves, "Parallel enumeration halted.");
                Err(halt.into_error(results))
            }
        }
    }

    /// How many candidate quantities the first unit can take before pruning.
    fn first_position_span(&self) -> u64 {
        let (Some(unit), Some(range)) = (self.units.first(), self.ranges.first()) else {
            return 0;
        };
        let by_mass = if unit.weight() > 0.0 {
            let fits = (self.window.ceiling() / unit.weight()).floor();
            if fits >= f64::from(u32::MAX) {
                u32::MAX
            } else {
                fits as u32
            }
        } else {
            u32::MAX
        };
        let upper = match range.max {
            QuantityBound::Bounded(max) => max.min(by_mass),
            QuantityBound::Unbounded => by_mass,
        };
        if upper < range.min {
            0
        } else {
            u64::from(upper - range.min) + 1
        }
    }
}

struct Walker<'a> {
    plan: &'a SearchPlan,
    tracker: &'a BudgetTracker<'a>,
    reporter: &'a ProgressReporter<'a>,
    results: Vec<GenerationResult>,
}

impl<'a> Walker<'a> {
    fn new(
        plan: &'a SearchPlan,
        tracker: &'a BudgetTracker<'a>,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            plan,
            tracker,
            reporter,
            results: Vec::new(),
        }
    }

    /// `assignment` holds the quantities chosen for units `0..depth` and is
    /// restored to that length before returning.
    fn descend(&mut self, depth: usize, mass: f64, assignment: &mut Vec<u32>) -> Result<(), Halt> {
        let (Some(unit), Some(range)) = (self.plan.units.get(depth), self.plan.ranges.get(depth))
        else {
            return self.visit_leaf(mass, assignment);
        };
        let weight = unit.weight();
        let ceiling = self.plan.window.ceiling();

        let mut quantity = range.min;
        while range.max.admits(quantity) {
            self.tracker.step().map_err(Halt::Budget)?;

            let next_mass = mass + weight * f64::from(quantity);
            if next_mass > ceiling {
                break;
            }

            assignment.push(quantity);
            let walked = self.descend(depth + 1, next_mass, assignment);
            assignment.pop();
            walked?;

            if depth == 0 {
                self.reporter.report(Progress::TaskIncrement);
            }
            match quantity.checked_add(1) {
                Some(next) => quantity = next,
                None => break,
            }
        }
        Ok(())
    }

    fn visit_leaf(&mut self, mass: f64, assignment: &[u32]) -> Result<(), Halt> {
        self.tracker.leaf().map_err(Halt::Budget)?;
        if !self.plan.window.contains(mass) {
            return Ok(());
        }

        let quantities: QuantityMap = self
            .plan
            .units
            .iter()
            .zip(assignment)
            .map(|(unit, &quantity)| (unit.id().clone(), quantity))
            .collect();
        let composite = Composite::from_quantity_map(Arc::clone(&self.plan.units), quantities)
            .map_err(|e| Halt::Failed(e.into()))?;
        let result = GenerationResult::new(composite, self.plan.window.target());
        trace!(mass, deviation = result.deviation(), "Composite inside window.");
        self.results.push(result);
        Ok(())
    }
}

/// Enumerates every composite of `units` whose mass lies within
/// `[target_mass - max_deviation, target_mass + max_deviation]`.
///
/// Units missing from `min_quantities` default to a minimum of 0 and units
/// missing from `max_quantities` are unbounded. Results come back in
/// enumeration order: earlier units vary slowest, quantities ascend. Pass them
/// to [`rank`](super::ranking::rank) to order them by deviation.
///
/// # Errors
///
/// * [`EngineError::InvalidConstraint`] for a negative or non-finite target or
///   deviation, or a quantity bound on a unit not in `units`.
/// * [`EngineError::DuplicateUnit`] if `units` repeats an id.
/// * [`EngineError::UnboundedSearchSpace`] for a zero-weight unit without a maximum.
/// * [`EngineError::SearchBudgetExceeded`] when `budget` runs out, with the
///   results found so far.
pub fn generate(
    units: &[Unit],
    min_quantities: &QuantityMap,
    max_quantities: &QuantityMap,
    target_mass: f64,
    max_deviation: f64,
    budget: &SearchBudget,
) -> Result<Vec<GenerationResult>, EngineError> {
    let plan = SearchPlan::new(units, min_quantities, max_quantities, target_mass, max_deviation)?;
    Ok(plan.enumerate(budget, &ProgressReporter::new())?.results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::UnitId;
    use crate::engine::budget::CancellationToken;
    use std::sync::Mutex;

    fn ab_units() -> Vec<Unit> {
        vec![
            Unit::new("A", "A", 1.0).unwrap(),
            Unit::new("B", "B", 2.0).unwrap(),
        ]
    }

    fn map(pairs: &[(&str, u32)]) -> QuantityMap {
        pairs.iter().map(|&(id, q)| (UnitId::from(id), q)).collect()
    }

    fn pairs(results: &[GenerationResult]) -> Vec<(u32, u32, f64)> {
        results
            .iter()
            .map(|r| {
                let c = r.composite();
                (
                    c.quantity_of(&"A".into()).unwrap(),
                    c.quantity_of(&"B".into()).unwrap(),
                    r.deviation(),
                )
            })
            .collect()
    }

    fn run(target: f64, deviation: f64) -> Vec<GenerationResult> {
        generate(
            &ab_units(),
            &map(&[]),
            &map(&[("A", 5), ("B", 5)]),
            target,
            deviation,
            &SearchBudget::unlimited(),
        )
        .unwrap()
    }

    #[test]
    fn exact_target_enumerates_in_unit_order() {
        assert_eq!(
            pairs(&run(5.0, 0.0)),
            vec![(1, 2, 0.0), (3, 1, 0.0), (5, 0, 0.0)]
        );
    }

    #[test]
    fn deviation_widens_window_in_enumeration_order() {
        assert_eq!(
            pairs(&run(5.0, 1.0)),
            vec![
                (0, 2, -1.0),
                (0, 3, 1.0),
                (1, 2, 0.0),
                (2, 1, -1.0),
                (2, 2, 1.0),
                (3, 1, 0.0),
                (4, 0, -1.0),
                (4, 1, 1.0),
                (5, 0, 0.0),
            ]
        );
    }

    #[test]
    fn every_result_lies_in_the_window() {
        for result in run(7.0, 1.5) {
            assert!(result.mass() >= 5.5 && result.mass() <= 8.5);
            assert_eq!(result.deviation(), result.mass() - 7.0);
        }
    }

    #[test]
    fn no_prefix_of_an_emitted_assignment_exceeds_the_ceiling() {
        let units = ab_units();
        for result in run(6.0, 0.5) {
            let mut partial = 0.0;
            for unit in &units {
                partial += unit.weight() * f64::from(result.composite().quantity_of(unit.id()).unwrap());
                assert!(partial <= 6.5);
            }
        }
    }

    #[test]
    fn zero_deviation_results_hit_target_exactly() {
        let units = vec![
            Unit::new("C", "C", 12.011).unwrap(),
            Unit::new("H", "H", 1.008).unwrap(),
            Unit::new("O", "O", 15.999).unwrap(),
        ];
        let target = 12.011 * 2.0 + 1.008 * 6.0 + 15.999;
        let results = generate(
            &units,
            &map(&[]),
            &map(&[]),
            target,
            0.0,
            &SearchBudget::unlimited(),
        )
        .unwrap();
        assert!(!results.is_empty());
        for result in &results {
            assert_eq!(result.mass(), target);
        }
    }

    #[test]
    fn minimum_quantities_are_honored() {
        let results = generate(
            &ab_units(),
            &map(&[("B", 2)]),
            &map(&[("A", 5), ("B", 5)]),
            5.0,
            0.0,
            &SearchBudget::unlimited(),
        )
        .unwrap();
        assert_eq!(pairs(&results), vec![(1, 2, 0.0)]);
    }

    #[test]
    fn empty_unit_list_yields_single_empty_composite_when_zero_fits() {
        let none = SearchBudget::unlimited();
        let results = generate(&[], &map(&[]), &map(&[]), 0.0, 0.0, &none).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].composite().units().is_empty());
        assert_eq!(results[0].deviation(), 0.0);

        let results = generate(&[], &map(&[]), &map(&[]), 3.0, 1.0, &none).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn zero_weight_without_maximum_fails_before_searching() {
        let units = vec![
            Unit::new("A", "A", 1.0).unwrap(),
            Unit::new("Z", "Zero", 0.0).unwrap(),
        ];
        let token = CancellationToken::new();
        token.cancel();
        let budget = SearchBudget::unlimited().with_cancellation(token);
        let result = generate(&units, &map(&[]), &map(&[("A", 2)]), 1.0, 0.0, &budget);
        assert!(matches!(result, Err(EngineError::UnboundedSearchSpace { .. })));
    }

    #[test]
    fn zero_weight_with_maximum_enumerates_each_copy_count() {
        let units = vec![
            Unit::new("A", "A", 1.0).unwrap(),
            Unit::new("Z", "Zero", 0.0).unwrap(),
        ];
        let results = generate(
            &units,
            &map(&[]),
            &map(&[("Z", 2)]),
            1.0,
            0.0,
            &SearchBudget::unlimited(),
        )
        .unwrap();
        let zeros: Vec<_> = results
            .iter()
            .map(|r| r.composite().quantity_of(&"Z".into()).unwrap())
            .collect();
        assert_eq!(zeros, vec![0, 1, 2]);
    }

    #[test]
    fn negative_target_is_invalid_constraint() {
        let result = generate(
            &ab_units(),
            &map(&[]),
            &map(&[]),
            -1.0,
            0.0,
            &SearchBudget::unlimited(),
        );
        assert!(matches!(result, Err(EngineError::InvalidConstraint { .. })));
    }

    #[test]
    fn min_above_max_is_vacuous() {
        let plan = SearchPlan::new(
            &ab_units(),
            &map(&[("A", 3)]),
            &map(&[("A", 2), ("B", 5)]),
            5.0,
            1.0,
        )
        .unwrap();
        assert!(plan.is_vacuous());
        let outcome = plan
            .enumerate(&SearchBudget::unlimited(), &ProgressReporter::new())
            .unwrap();
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.steps, 0);
    }

    #[test]
    fn leaf_budget_returns_partial_results() {
        let budget = SearchBudget::unlimited().with_max_leaves(5);
        let result = generate(
            &ab_units(),
            &map(&[]),
            &map(&[("A", 5), ("B", 5)]),
            5.0,
            1.0,
            &budget,
        );
        let error = result.unwrap_err();
        assert!(matches!(
            error,
            EngineError::SearchBudgetExceeded {
                limit: BudgetLimit::Leaves(5),
                ..
            }
        ));
        // A=0 reaches four leaves, A=1 the fifth; (A=1, B=1) trips the cap.
        let partial = error.into_partial_results().unwrap();
        assert_eq!(pairs(&partial), vec![(0, 2, -1.0), (0, 3, 1.0)]);
    }

    #[test]
    fn cancelled_search_stops_at_first_step() {
        let token = CancellationToken::new();
        token.cancel();
        let budget = SearchBudget::unlimited().with_cancellation(token);
        let result = generate(&ab_units(), &map(&[]), &map(&[]), 5.0, 0.0, &budget);
        let error = result.unwrap_err();
        assert!(matches!(
            error,
            EngineError::SearchBudgetExceeded {
                limit: BudgetLimit::Cancelled,
                ..
            }
        ));
        assert_eq!(error.partial_results().map(<[_]>::len), Some(0));
    }

    #[test]
    fn identical_inputs_give_identical_sequences() {
        let first = pairs(&run(9.0, 2.0));
        let second = pairs(&run(9.0, 2.0));
        assert_eq!(first, second);
    }

    #[test]
    fn composites_get_distinct_ids_and_share_units() {
        let results = run(5.0, 0.0);
        assert_ne!(results[0].composite().id(), results[1].composite().id());
        assert!(std::ptr::eq(
            results[0].composite().units().as_ptr(),
            results[1].composite().units().as_ptr()
        ));
    }

    #[test]
    fn progress_tracks_first_unit_candidates() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e: Progress| events.lock().unwrap().push(e)));
        let plan = SearchPlan::new(&ab_units(), &map(&[]), &map(&[("A", 5), ("B", 5)]), 5.0, 0.0)
            .unwrap();
        plan.enumerate(&SearchBudget::unlimited(), &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(events.first(), Some(&Progress::TaskStart { total_steps: 6 }));
        assert_eq!(events.last(), Some(&Progress::TaskFinish));
        let increments = events
            .iter()
            .filter(|e| **e == Progress::TaskIncrement)
            .count();
        assert_eq!(increments, 6);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_enumeration_matches_sequential_order() {
        let plan = SearchPlan::new(
            &ab_units(),
            &map(&[]),
            &map(&[("A", 9), ("B", 9)]),
            10.0,
            3.0,
        )
        .unwrap();
        let reporter = ProgressReporter::new();
        let sequential = plan.enumerate(&SearchBudget::unlimited(), &reporter).unwrap();
        let parallel = plan
            .enumerate_parallel(&SearchBudget::unlimited(), &reporter)
            .unwrap();
        assert_eq!(pairs(&sequential.results), pairs(&parallel.results));
        assert_eq!(sequential.stats.leaves, parallel.stats.leaves);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_enumeration_reports_budget_exhaustion() {
        let plan = SearchPlan::new(&ab_units(), &map(&[]), &map(&[]), 40.0, 5.0).unwrap();
        let budget = SearchBudget::unlimited().with_max_leaves(10);
        let error = plan
            .enumerate_parallel(&budget, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            error,
            EngineError::SearchBudgetExceeded {
                limit: BudgetLimit::Leaves(10),
                ..
            }
        ));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_deadline_stops_every_subtree() {
        let units = vec![
            Unit::new("x", "X", 0.001).unwrap(),
            Unit::new("y", "Y", 0.001).unwrap(),
            Unit::new("z", "Z", 0.001).unwrap(),
        ];
        let plan = SearchPlan::new(&units, &map(&[]), &map(&[]), 5.0, 5.0).unwrap();
        let timeout = std::time::Duration::from_millis(200);
        let budget = SearchBudget::unlimited().with_timeout(timeout);

        let started = std::time::Instant::now();
        let error = plan
            .enumerate_parallel(&budget, &ProgressReporter::new())
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(
            error,
            EngineError::SearchBudgetExceeded {
                limit: BudgetLimit::Deadline(_),
                ..
            }
        ));
        assert!(
            elapsed < std::time::Duration::from_secs(3),
            "parallel search overran its deadline: {elapsed:?}"
        );
    }
}
