//! # Core Models Module
//!
//! Immutable value types shared by every layer of molgen.
//!
//! - [`ids`] - Identifier newtypes for units and composites
//! - [`unit`] - The weighted [`Unit`](unit::Unit) and the [`QuantityMap`](unit::QuantityMap) assignment
//! - [`composite`] - The [`Composite`](composite::Composite), a checked unit/quantity bijection with a derived mass
//! - [`result`] - The [`GenerationResult`](result::GenerationResult) emitted by the engine
//!
//! ```ignore
//! use molgen::core::models::{composite::Composite, unit::{QuantityMap, Unit}};
//!
//! let units = vec![Unit::new("C", "C", 12.011)?, Unit::new("H", "H", 1.008)?];
//! let quantities = QuantityMap::from([("C".into(), 2), ("H".into(), 6)]);
//! let ethane = Composite::from_quantity_map(units, quantities)?;
//! assert!((ethane.mass() - 30.07).abs() < 1e-9);
//! ```

pub mod composite;
pub mod ids;
pub mod result;
pub mod unit;
