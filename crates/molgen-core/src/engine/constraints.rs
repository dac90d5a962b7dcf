use super::error::EngineError;
use crate::core::models::unit::{QuantityMap, Unit};
use std::collections::HashSet;
use tracing::debug;

/// Upper limit on how many copies of a unit a composite may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityBound {
    Bounded(u32),
    Unbounded,
}

impl QuantityBound {
    #[inline]
    pub fn admits(&self, quantity: u32) -> bool {
        match self {
            Self::Bounded(max) => quantity <= *max,
            Self::Unbounded => true,
        }
    }
}

impl From<Option<u32>> for QuantityBound {
    fn from(max: Option<u32>) -> Self {
        max.map_or(Self::Unbounded, Self::Bounded)
    }
}

/// The effective multiplicity range of one unit after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityRange {
    pub min: u32,
    pub max: QuantityBound,
}

impl QuantityRange {
    /// A range whose minimum exceeds its maximum admits no quantity at all.
    pub fn is_empty(&self) -> bool {
        !self.max.admits(self.min)
    }
}

/// The closed interval `[target - tolerance, target + tolerance]` a composite's
/// mass must fall into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassWindow {
    target: f64,
    tolerance: f64,
}

impl MassWindow {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConstraint`] when either value is negative
    /// or not finite. Values are never clamped.
    pub fn new(target_mass: f64, max_deviation: f64) -> Result<Self, EngineError> {
        check_non_negative("target-mass", target_mass)?;
        check_non_negative("max-deviation", max_deviation)?;
        Ok(Self {
            target: target_mass,
            tolerance: max_deviation,
        })
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The pruning bound: no partial assignment heavier than this can succeed.
    #[inline]
    pub fn ceiling(&self) -> f64 {
        self.target + self.tolerance
    }

    #[inline]
    pub fn floor(&self) -> f64 {
        self.target - self.tolerance
    }

    #[inline]
    pub fn contains(&self, mass: f64) -> bool {
        self.floor() <= mass && mass <= self.ceiling()
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() {
        return Err(EngineError::invalid_constraint(
            field,
            format!("must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(EngineError::invalid_constraint(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(())
}

/// Resolves per-unit minimum and maximum quantities into one [`QuantityRange`]
/// per position of `units`.
///
/// Units absent from `min_quantities` get a minimum of 0; units absent from
/// `max_quantities` are [`QuantityBound::Unbounded`]. The caller's maps are only
/// read.
///
/// # Errors
///
/// * [`EngineError::DuplicateUnit`] if `units` repeats an id.
/// * [`EngineError::InvalidConstraint`] if a map names a unit not in `units`.
/// * [`EngineError::UnboundedSearchSpace`] if a zero-weight unit has no maximum,
///   since every quantity of it would fit the window and enumeration could not end.
pub fn normalize(
    units: &[Unit],
    min_quantities: &QuantityMap,
    max_quantities: &QuantityMap,
) -> Result<Vec<QuantityRange>, EngineError> {
    let mut ids = HashSet::with_capacity(units.len());
    for unit in units {
        if !ids.insert(unit.id()) {
            return Err(EngineError::DuplicateUnit(unit.id().clone()));
        }
    }

    for (field, map) in [
        ("min-quantities", min_quantities),
        ("max-quantities", max_quantities),
    ] {
        if let Some(stray) = map.keys().find(|id| !ids.contains(id)) {
            return Err(EngineError::invalid_constraint(
                format!("{field}.{stray}"),
                "refers to a unit that is not part of the selection",
            ));
        }
    }

    let ranges: Vec<QuantityRange> = units
        .iter()
        .map(|unit| QuantityRange {
            min: min_quantities.get(unit.id()).copied().unwrap_or(0),
            max: max_quantities.get(unit.id()).copied().into(),
        })
        .collect();

    for (unit, range) in units.iter().zip(&ranges) {
        if unit.weight() == 0.0 && range.max == QuantityBound::Unbounded {
            return Err(EngineError::UnboundedSearchSpace {
                unit_id: unit.id().clone(),
                unit_name: unit.name().to_string(),
            });
        }
    }

    debug!(?ranges, "Normalized quantity constraints.");
    Ok(ranges)
}
