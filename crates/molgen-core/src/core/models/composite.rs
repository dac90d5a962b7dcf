use super::ids::{CompositeId, UnitId};
use super::unit::{QuantityMap, Unit};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised when the unit sequence and the quantity map of a composite
/// do not describe the same set of units.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum CompositeError {
    #[error("Quantity map references units absent from the unit set: {}", join_ids(.unknown))]
    IncompleteUnitSet { unknown: Vec<UnitId> },

    #[error("Quantity map has no entry for units: {}", join_ids(.missing))]
    IncompleteQuantityMap { missing: Vec<UnitId> },

    #[error("Unit '{0}' appears more than once in the unit set")]
    DuplicateUnit(UnitId),
}

fn join_ids(ids: &[UnitId]) -> String {
    ids.iter()
        .map(UnitId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// An immutable combination of units with an exact multiplicity for each, the
/// "molecule" produced by the generator.
///
/// The unit sequence is shared behind an `Arc`, so every composite produced by
/// one generation run points at the same unit slice.
#[derive(Debug, Clone, Serialize)]
pub struct Composite {
    id: CompositeId,
    units: Arc<[Unit]>,
    quantities: QuantityMap,
}

impl Composite {
    /// Builds a composite from an ordered unit set and a quantity assignment.
    ///
    /// The ids referenced by `quantities` must be exactly the ids of `units`.
    /// Both directions of that bijection are evaluated before reporting, so the
    /// returned error lists every offending id rather than the first one found.
    /// When both directions are violated, the unit-set violation is returned.
    ///
    /// A new [`CompositeId`] is minted on every call.
    ///
    /// # Errors
    ///
    /// * [`CompositeError::DuplicateUnit`] if `units` repeats an id.
    /// * [`CompositeError::IncompleteUnitSet`] if `quantities` names an id absent from `units`.
    /// * [`CompositeError::IncompleteQuantityMap`] if a unit has no quantity entry.
    pub fn from_quantity_map(
        units: impl Into<Arc<[Unit]>>,
        quantities: QuantityMap,
    ) -> Result<Self, CompositeError> {
        let units = units.into();

        let mut unit_ids = HashSet::with_capacity(units.len());
        for unit in units.iter() {
            if !unit_ids.insert(unit.id()) {
                return Err(CompositeError::DuplicateUnit(unit.id().clone()));
            }
        }

        let unknown: Vec<UnitId> = quantities
            .keys()
            .filter(|id| !unit_ids.contains(id))
            .cloned()
            .collect();
        let missing: Vec<UnitId> = units
            .iter()
            .filter(|unit| !quantities.contains_key(unit.id()))
            .map(|unit| unit.id().clone())
            .collect();

        if !unknown.is_empty() && !missing.is_empty() {
            debug!(
                unknown = %join_ids(&unknown),
                missing = %join_ids(&missing),
                "Composite rejected in both directions."
            );
        }
        if !unknown.is_empty() {
            return Err(CompositeError::IncompleteUnitSet { unknown });
        }
        if !missing.is_empty() {
            return Err(CompositeError::IncompleteQuantityMap { missing });
        }

        Ok(Self {
            id: CompositeId::mint(),
            units,
            quantities,
        })
    }

    pub fn id(&self) -> CompositeId {
        self.id
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn quantities(&self) -> &QuantityMap {
        &self.quantities
    }

    pub fn quantity_of(&self, id: &UnitId) -> Option<u32> {
        self.quantities.get(id).copied()
    }

    /// Total mass, `Σ weight × quantity`, summed in unit order.
    pub fn mass(&self) -> f64 {
        self.units.iter().fold(0.0, |acc, unit| {
            acc + unit.weight() * f64::from(self.quantities[unit.id()])
        })
    }

    /// Yields `(unit name, quantity)` pairs in unit order.
    ///
    /// Each call starts a fresh pass, so the sequence can be consumed any
    /// number of times.
    pub fn named_quantities(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.units
            .iter()
            .map(|unit| (unit.name(), self.quantities[unit.id()]))
    }
}
