//! # Engine Module
//!
//! The generation engine: turns an ordered unit list, per-unit quantity bounds and
//! a mass window into the list of every composite that fits, then ranks it.
//!
//! ## Overview
//!
//! The search is a depth-first backtracking walk over the unit sequence. Each unit
//! tries its candidate quantities in ascending order, and a branch is abandoned as
//! soon as its partial mass exceeds the upper edge of the window. Because weights
//! are non-negative, no larger quantity at that position can succeed either.
//!
//! ## Architecture
//!
//! - **Constraints** ([`constraints`]) - Mass window validation and pure min/max normalization
//! - **Search** ([`search`]) - The pruned enumeration, sequential or split across rayon
//! - **Ranking** ([`ranking`]) - Stable ordering by absolute deviation
//! - **Budget** ([`budget`]) - Leaf, step, deadline and cancellation caps on search effort
//! - **Configuration** ([`config`]) - The [`GenerationConfig`](config::GenerationConfig) builder
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Search Cost
//!
//! Enumeration is exponential in the number of units in the worst case. Tiny
//! weights combined with a wide window produce a combinatorial explosion, which is
//! why every search runs against a [`SearchBudget`](budget::SearchBudget).

pub mod budget;
pub mod config;
pub mod constraints;
pub mod error;
pub mod progress;
pub mod ranking;
pub mod search;
