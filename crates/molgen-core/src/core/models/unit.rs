use super::ids::UnitId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mapping from unit id to a non-negative multiplicity.
///
/// A `BTreeMap` keeps iteration and serialization deterministic; the order of
/// insertion carries no meaning.
pub type QuantityMap = BTreeMap<UnitId, u32>;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum UnitError {
    #[error("Unit '{name}' has invalid weight {weight}: weights must be finite and non-negative")]
    InvalidWeight { name: String, weight: f64 },

    #[error("Unit id must not be empty")]
    EmptyId,
}

/// A weighted building block, the "atom" of a generated composite.
///
/// Identity is carried by [`UnitId`]: composites, catalogs and quantity maps
/// refer to a unit through its id, so an edited copy with a new name or weight
/// still stands for the same unit there. Equality (`==`) compares values, so
/// such a copy is not equal to the original; compare [`Unit::id`] to ask
/// whether two values are the same unit.
/// Values are immutable; edits go through [`Unit::with_name`] and
/// [`Unit::with_weight`], which return a new value under the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnit")]
pub struct Unit {
    id: UnitId,
    name: String,
    weight: f64,
}

#[derive(Deserialize)]
struct RawUnit {
    id: UnitId,
    name: String,
    weight: f64,
}

impl TryFrom<RawUnit> for Unit {
    type Error = UnitError;

    fn try_from(raw: RawUnit) -> Result<Self, Self::Error> {
        Unit::new(raw.id, raw.name, raw.weight)
    }
}

impl Unit {
    /// Creates a unit after checking that `weight` is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::InvalidWeight`] for negative, NaN or infinite weights,
    /// and [`UnitError::EmptyId`] for an empty id.
    pub fn new(id: impl Into<UnitId>, name: impl Into<String>, weight: f64) -> Result<Self, UnitError> {
        let id = id.into();
        let name = name.into();
        if id.as_str().is_empty() {
            return Err(UnitError::EmptyId);
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(UnitError::InvalidWeight { name, weight });
        }
        Ok(Self { id, name, weight })
    }

    /// Creates a unit under a freshly generated id.
    pub fn create(name: impl Into<String>, weight: f64) -> Result<Self, UnitError> {
        Self::new(UnitId::generate(), name, weight)
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            name: name.into(),
            weight: self.weight,
        }
    }

    pub fn with_weight(&self, weight: f64) -> Result<Self, UnitError> {
        Self::new(self.id.clone(), self.name.clone(), weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_unit_keeps_given_fields() {
        let unit = Unit::new("C", "Carbon", 12.011).unwrap();
        assert_eq!(unit.id(), &UnitId::from("C"));
        assert_eq!(unit.name(), "Carbon");
        assert_eq!(unit.weight(), 12.011);
    }

    #[test]
    fn zero_weight_is_accepted() {
        assert!(Unit::new("e", "electron-ish", 0.0).is_ok());
    }

    #[test]
    fn negative_and_non_finite_weights_are_rejected() {
        assert!(matches!(
            Unit::new("X", "X", -1.0),
            Err(UnitError::InvalidWeight { .. })
        ));
        assert!(matches!(
            Unit::new("X", "X", f64::NAN),
            Err(UnitError::InvalidWeight { .. })
        ));
        assert!(matches!(
            Unit::new("X", "X", f64::INFINITY),
            Err(UnitError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!(Unit::new("", "X", 1.0), Err(UnitError::EmptyId));
    }

    #[test]
    fn edits_preserve_identity() {
        let unit = Unit::create("H", 1.0).unwrap();
        let renamed = unit.with_name("Hydrogen");
        let reweighed = unit.with_weight(1.008).unwrap();

        assert_eq!(renamed.id(), unit.id());
        assert_eq!(renamed.name(), "Hydrogen");
        assert_eq!(reweighed.id(), unit.id());
        assert_eq!(reweighed.weight(), 1.008);
        assert_eq!(unit.name(), "H");
    }

    #[test]
    fn equality_compares_values_while_id_tracks_identity() {
        let unit = Unit::new("C", "C", 12.0).unwrap();
        let edited = unit.with_weight(12.011).unwrap();
        assert_ne!(edited, unit);
        assert_eq!(edited.id(), unit.id());
        assert_eq!(unit.clone(), unit);
    }

    #[test]
    fn deserialization_validates_weight() {
        let ok: Result<Unit, _> = toml::from_str("id = \"O\"\nname = \"Oxygen\"\nweight = 15.999\n");
        assert_eq!(ok.unwrap().name(), "Oxygen");

        let bad: Result<Unit, _> = toml::from_str("id = \"O\"\nname = \"Oxygen\"\nweight = -2.0\n");
        assert!(bad.is_err());
    }
}
