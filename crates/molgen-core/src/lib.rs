//! # molgen Core Library
//!
//! Enumerates every integer combination ("molecule") of weighted units ("atoms")
//! whose total mass lies within a target window, subject to per-unit minimum and
//! maximum multiplicities, and ranks the combinations by their deviation from the
//! target.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Immutable value types (`Unit`, `Composite`), the
//!   element table, and catalog/result I/O.
//!
//! - **[`engine`]: The Logic Core.** Constraint normalization, the execution budget,
//!   the pruned backtracking search and the stable ranking.
//!
//! - **[`workflows`]: The Public API.** Ties validation, search, ranking and progress
//!   reporting together into a single call.

pub mod core;
pub mod engine;
pub mod workflows;
