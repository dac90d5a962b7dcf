//! # Workflows Module
//!
//! High-level entry points that run a complete generation: constraint validation,
//! enumeration and ranking, with progress reported along the way.
//!
//! - **Generation Workflow** ([`generate`]) - Validates a [`GenerationConfig`](crate::engine::config::GenerationConfig)
//!   against a unit list, enumerates and returns ranked results.

pub mod generate;
