//! # I/O Module
//!
//! File formats molgen reads and writes:
//!
//! - [`catalog`] - The unit catalog, persisted as TOML
//! - [`export`] - Ranked generation results, exported as CSV

pub mod catalog;
pub mod export;
