//! # Core Module
//!
//! Stateless building blocks: the unit and composite value types, the built-in
//! element table, and file I/O for unit catalogs and generation results.
//!
//! - **Models** ([`models`]) - `Unit`, `QuantityMap`, `Composite` and their identifiers
//! - **Elements** ([`elements`]) - Standard atomic weights for seeding catalogs
//! - **I/O** ([`io`]) - TOML catalog persistence and CSV result export

pub mod elements;
pub mod io;
pub mod models;
