//! Analysis result types
//!
//! Combines the tempo estimate and beat train into the final analysis:
//! - Result and metadata
//! - Flags and tempo response diagnostics

pub mod result;
