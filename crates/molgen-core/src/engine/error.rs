use super::budget::BudgetLimit;
use crate::core::models::composite::CompositeError;
use crate::core::models::ids::UnitId;
use crate::core::models::result::GenerationResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid constraint on '{field}': {reason}")]
    InvalidConstraint { field: String, reason: String },

    #[error(
        "Unit '{unit_name}' ({unit_id}) has zero weight and no maximum quantity; the search space is unbounded"
    )]
    UnboundedSearchSpace { unit_id: UnitId, unit_name: String },

    #[error("Unit '{0}' appears more than once in the unit list")]
    DuplicateUnit(UnitId),

    #[error("Search budget exceeded ({limit}) after collecting {} result(s)", .partial.len())]
    SearchBudgetExceeded {
        limit: BudgetLimit,
        partial: Vec<GenerationResult>,
    },

    #[error("Composite construction failed: {source}")]
    Composite {
        #[from]
        source: CompositeError,
    },
}

impl EngineError {
    pub(crate) fn invalid_constraint(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Results gathered before the search was cut short, if this error carries any.
    pub fn partial_results(&self) -> Option<&[GenerationResult]> {
        match self {
            Self::SearchBudgetExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// Like [`partial_results`](Self::partial_results), but takes ownership of them.
    pub fn into_partial_results(self) -> Option<Vec<GenerationResult>> {
        match self {
            Self::SearchBudgetExceeded { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
