//! Analysis and result aggregation modules
//!
//! Turns per-stage features into the final analysis:
//! - Result types
//! - Metadata
//! - Explicit fallback estimates
//! - Progression summary and difficulty rating

pub mod difficulty;
pub mod estimate;
pub mod metadata;
pub mod progression;
pub mod result;
