use crate::core::elements;
use crate::core::models::ids::UnitId;
use crate::core::models::unit::{Unit, UnitError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Represents errors that can occur while editing, loading or saving a unit catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read or written.
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The catalog file is not valid TOML or does not match the catalog layout.
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    /// The catalog could not be serialized.
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A unit definition carries an invalid weight or id.
    #[error(transparent)]
    InvalidUnit(#[from] UnitError),
    /// Two catalog entries share an id.
    #[error("Duplicate unit id '{0}' in catalog")]
    DuplicateId(UnitId),
    /// No unit matches the given id or name.
    #[error("No unit with id or name '{0}' in catalog")]
    UnitNotFound(String),
    /// A name matches more than one unit; the caller must use an id instead.
    #[error("Name '{name}' matches {count} units; refer to it by id")]
    AmbiguousReference { name: String, count: usize },
    /// The symbol is not in the built-in element table.
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
}

/// The ordered list of units a user can compose molecules from.
///
/// A catalog is persisted as TOML, one `[[unit]]` table per entry:
///
/// ```toml
/// [[unit]]
/// id = "6f1c..."
/// name = "C"
/// weight = 12.011
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    #[serde(rename = "unit", default)]
    units: Vec<Unit>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from existing units, rejecting repeated ids.
    pub fn from_units(units: Vec<Unit>) -> Result<Self, CatalogError> {
        let catalog = Self { units };
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// Loads a catalog from a TOML file.
    ///
    /// A missing file is treated as an empty catalog, which is the state of a
    /// fresh installation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            debug!("Catalog file {:?} does not exist; starting empty.", path);
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let catalog: Self = toml::from_str(&content).map_err(|e| CatalogError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        catalog.check_unique_ids()?;
        debug!("Loaded {} unit(s) from {:?}.", catalog.len(), path);
        Ok(catalog)
    }

    /// Writes the catalog as pretty TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let io_err = |e| CatalogError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)?;
        info!("Saved {} unit(s) to {:?}.", self.len(), path);
        Ok(())
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id() == id)
    }

    /// Adds a new unit under a freshly generated id and returns a copy of it.
    pub fn add(&mut self, name: impl Into<String>, weight: f64) -> Result<Unit, CatalogError> {
        let unit = Unit::create(name, weight)?;
        self.units.push(unit.clone());
        Ok(unit)
    }

    /// Adds a unit named after an element symbol, weighted by its standard atomic weight.
    pub fn add_element(&mut self, symbol: &str) -> Result<Unit, CatalogError> {
        let name = elements::canonical_symbol(symbol)
            .ok_or_else(|| CatalogError::UnknownElement(symbol.to_string()))?;
        let weight = elements::standard_atomic_weight(name)
            .ok_or_else(|| CatalogError::UnknownElement(symbol.to_string()))?;
        self.add(name, weight)
    }

    /// Replaces the unit with the given id by an edited copy.
    ///
    /// The id is kept; only the supplied fields change.
    pub fn update(
        &mut self,
        id: &UnitId,
        name: Option<String>,
        weight: Option<f64>,
    ) -> Result<Unit, CatalogError> {
        let slot = self
            .units
            .iter_mut()
            .find(|unit| unit.id() == id)
            .ok_or_else(|| CatalogError::UnitNotFound(id.to_string()))?;

        let mut edited = slot.clone();
        if let Some(name) = name {
            edited = edited.with_name(name);
        }
        if let Some(weight) = weight {
            edited = edited.with_weight(weight)?;
        }
        *slot = edited.clone();
        Ok(edited)
    }

    pub fn remove(&mut self, id: &UnitId) -> Result<Unit, CatalogError> {
        let index = self
            .units
            .iter()
            .position(|unit| unit.id() == id)
            .ok_or_else(|| CatalogError::UnitNotFound(id.to_string()))?;
        Ok(self.units.remove(index))
    }

    /// Resolves a reference that is either a unit id or an unambiguous unit name.
    ///
    /// Ids take precedence over names.
    pub fn find(&self, reference: &str) -> Result<&Unit, CatalogError> {
        if let Some(unit) = self.get(&UnitId::from(reference)) {
            return Ok(unit);
        }
        let mut matches = self.units.iter().filter(|unit| unit.name() == reference);
        match (matches.next(), matches.count()) {
            (Some(unit), 0) => Ok(unit),
            (Some(_), rest) => Err(CatalogError::AmbiguousReference {
                name: reference.to_string(),
                count: rest + 1,
            }),
            (None, _) => Err(CatalogError::UnitNotFound(reference.to_string())),
        }
    }

    /// Resolves several references, keeping the order in which they are given.
    pub fn select<S: AsRef<str>>(&self, references: &[S]) -> Result<Vec<Unit>, CatalogError> {
        references
            .iter()
            .map(|reference| self.find(reference.as_ref()).cloned())
            .collect()
    }

    fn check_unique_ids(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.units.len());
        for unit in &self.units {
            if !seen.insert(unit.id()) {
                return Err(CatalogError::DuplicateId(unit.id().clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Catalog {
        Catalog::from_units(vec![
            Unit::new("c", "C", 12.011).unwrap(),
            Unit::new("h", "H", 1.008).unwrap(),
            Unit::new("o", "O", 15.999).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn add_mints_fresh_ids() {
        let mut catalog = Catalog::new();
        let a = catalog.add("X", 1.0).unwrap();
        let b = catalog.add("X", 1.0).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn add_rejects_negative_weight() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add("X", -3.0),
            Err(CatalogError::InvalidUnit(UnitError::InvalidWeight { .. }))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn add_element_uses_standard_weight() {
        let mut catalog = Catalog::new();
        let unit = catalog.add_element("n").unwrap();
        assert_eq!(unit.name(), "N");
        assert_eq!(unit.weight(), 14.007);
        assert!(matches!(
            catalog.add_element("Qq"),
            Err(CatalogError::UnknownElement(_))
        ));
    }

    #[test]
    fn update_keeps_id_and_changes_fields() {
        let mut catalog = sample();
        let edited = catalog
            .update(&UnitId::from("h"), Some("Hydrogen".to_string()), Some(1.0))
            .unwrap();
        assert_eq!(edited.id(), &UnitId::from("h"));
        assert_eq!(catalog.get(&UnitId::from("h")).unwrap().name(), "Hydrogen");
        assert_eq!(catalog.get(&UnitId::from("h")).unwrap().weight(), 1.0);
    }

    #[test]
    fn update_with_invalid_weight_leaves_unit_untouched() {
        let mut catalog = sample();
        let result = catalog.update(&UnitId::from("c"), None, Some(f64::NAN));
        assert!(result.is_err());
        assert_eq!(catalog.get(&UnitId::from("c")).unwrap().weight(), 12.011);
    }

    #[test]
    fn remove_deletes_unit() {
        let mut catalog = sample();
        let removed = catalog.remove(&UnitId::from("o")).unwrap();
        assert_eq!(removed.name(), "O");
        assert_eq!(catalog.len(), 2);
        assert!(matches!(
            catalog.remove(&UnitId::from("o")),
            Err(CatalogError::UnitNotFound(_))
        ));
    }

    #[test]
    fn find_prefers_id_then_unique_name() {
        let catalog = sample();
        assert_eq!(catalog.find("c").unwrap().name(), "C");
        assert_eq!(catalog.find("O").unwrap().id(), &UnitId::from("o"));
        assert!(matches!(
            catalog.find("Zn"),
            Err(CatalogError::UnitNotFound(_))
        ));
    }

    #[test]
    fn find_rejects_ambiguous_name() {
        let mut catalog = sample();
        catalog.add("C", 13.003).unwrap();
        assert!(matches!(
            catalog.find("C"),
            Err(CatalogError::AmbiguousReference { count: 2, .. })
        ));
    }

    #[test]
    fn select_preserves_requested_order() {
        let catalog = sample();
        let selected = catalog.select(&["O", "c"]).unwrap();
        let names: Vec<_> = selected.iter().map(Unit::name).collect();
        assert_eq!(names, vec!["O", "C"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::from_units(vec![
            Unit::new("x", "X", 1.0).unwrap(),
            Unit::new("x", "Y", 2.0).unwrap(),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn save_and_load_preserve_units() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.toml");
        let catalog = sample();

        catalog.save(&path).unwrap();
        let loaded = Catalog::load(&path).unwrap();

        assert_eq!(loaded, catalog);
    }

    #[test]
    fn load_of_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::load(&dir.path().join("absent.toml")).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn load_reports_invalid_weight() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[[unit]]\nid = \"x\"\nname = \"X\"\nweight = -1.0\n",
        )
        .unwrap();
        assert!(matches!(
            Catalog::load(&path),
            Err(CatalogError::Toml { .. })
        ));
    }
}
