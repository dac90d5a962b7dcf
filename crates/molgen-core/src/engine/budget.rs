use std::fmt;
use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The wall clock is only consulted once per this many search steps.
const CLOCK_CHECK_INTERVAL: u64 = 256;

/// A shared flag that asks a running search to stop at its next step.
///
/// Clones share the same flag, so one clone can be handed to the search while
/// another is kept by a signal handler or UI thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The cap that stopped a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetLimit {
    /// More than this many complete assignments were evaluated.
    Leaves(u64),
    /// More than this many candidate quantities were tried.
    Steps(u64),
    /// The search ran longer than this.
    Deadline(Duration),
    /// The caller's cancellation token was tripped.
    Cancelled,
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaves(max) => write!(f, "more than {max} leaf evaluations"),
            Self::Steps(max) => write!(f, "more than {max} search steps"),
            Self::Deadline(limit) => write!(f, "deadline of {:.1}s elapsed", limit.as_secs_f64()),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Caller-imposed caps on search effort.
///
/// Every cap is optional; [`SearchBudget::unlimited`] disables all of them and
/// leaves the search bounded only by its pruning rule.
#[derive(Debug, Clone, Default)]
pub struct SearchBudget {
    pub max_leaves: Option<u64>,
    pub max_steps: Option<u64>,
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_max_leaves(mut self, max: u64) -> Self {
        self.max_leaves = Some(max);
        self
    }

    pub fn with_max_steps(mut self, max: u64) -> Self {
        self.max_steps = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_leaves.is_none()
            && self.max_steps.is_none()
            && self.timeout.is_none()
            && self.cancellation.is_none()
    }
}

/// Effort spent by one search.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchStats {
    pub steps: u64,
    pub leaves: u64,
    pub elapsed: Duration,
}

/// Counts steps and leaves against a [`SearchBudget`].
///
/// Counters are atomic so parallel subtrees can charge the same budget. The
/// first limit hit is latched: every later `step` or `leaf` call fails with it,
/// so sibling subtrees stop at their next transition.
#[derive(Debug)]
pub(crate) struct BudgetTracker<'a> {
    budget: &'a SearchBudget,
    started: Instant,
    steps: AtomicU64,
    leaves: AtomicU64,
    tripped: OnceLock<BudgetLimit>,
}

impl<'a> BudgetTracker<'a> {
    pub(crate) fn new(budget: &'a SearchBudget) -> Self {
        Self {
            budget,
            started: Instant::now(),
            steps: AtomicU64::new(0),
            leaves: AtomicU64::new(0),
            tripped: OnceLock::new(),
        }
    }

    /// Records `limit` unless another limit was already latched, and returns
    /// whichever limit won.
    fn trip(&self, limit: BudgetLimit) -> BudgetLimit {
        *self.tripped.get_or_init(|| limit)
    }

    fn check_tripped(&self) -> Result<(), BudgetLimit> {
        match self.tripped.get() {
            Some(limit) => Err(*limit),
            None => Ok(()),
        }
    }

    /// Charges one unit-position transition.
    pub(crate) fn step(&self) -> Result<(), BudgetLimit> {
        self.check_tripped()?;
        let taken = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(max) = self.budget.max_steps {
            if taken > max {
                return Err(self.trip(BudgetLimit::Steps(max)));
            }
        }
        if let Some(token) = &self.budget.cancellation {
            if token.is_cancelled() {
                return Err(self.trip(BudgetLimit::Cancelled));
            }
        }
        if let Some(timeout) = self.budget.timeout {
            if (taken - 1) % CLOCK_CHECK_INTERVAL == 0 && self.started.elapsed() > timeout {
                return Err(self.trip(BudgetLimit::Deadline(timeout)));
            }
        }
        Ok(())
    }

    /// Charges one evaluation of a complete assignment.
    pub(crate) fn leaf(&self) -> Result<(), BudgetLimit> {
        self.check_tripped()?;
        let taken = self.leaves.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(max) = self.budget.max_leaves {
            if taken > max {
                return Err(self.trip(BudgetLimit::Leaves(max)));
            }
        }
        Ok(())
    }

    pub(crate) fn stats(&self) -> SearchStats {
        SearchStats {
            steps: self.steps.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            elapsed: self.started.elapsed(),
        }
    }
}
