//! Error types for the tempo detection engine

use std::fmt;

/// Errors that can occur during tempo analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters (empty audio, non-finite samples, bad BPM range)
    InvalidInput(String),

    /// Input too short to produce a usable onset curve or resonator output
    InsufficientData(String),

    /// The BPM range maps to an empty set of comb filter periods
    EmptyBank(String),

    /// Numerical error (length mismatch, overflow, etc.)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            AnalysisError::EmptyBank(msg) => write!(f, "Empty resonator bank: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
