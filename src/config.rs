//! Configuration parameters for tempo analysis

use serde::{Deserialize, Serialize};

use crate::features::beat_tracking::BeatPredictorKind;
use crate::features::period::resonator_bank::MAX_PERIOD;
use crate::features::period::tempo_selector::EnergyWeighting;
use crate::features::period::bpm_to_samples;

/// Tempo analysis configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoConfig {
    // Tempo search range
    /// Minimum BPM to consider (default: 30.0)
    /// Maps to the longest comb filter period, at most `MAX_PERIOD` (6 BPM)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 150.0)
    /// Maps to the shortest comb filter period
    pub max_bpm: f32,

    /// Advisory upper bound on the number of resonators (default: 500)
    /// The real bank size is always `max_period - min_period + 1`
    pub filter_count: usize,

    // Resonators
    /// Comb filter half-life in onset samples (default: 15.0, i.e. 1500 ms at 100 Hz)
    pub half_life_samples: f32,

    /// How resonator output energy is scored (default: Plain)
    pub energy_weighting: EnergyWeighting,

    // Onset extraction
    /// Length of the half-Hann envelope window in seconds (default: 0.2)
    pub onset_window_seconds: f32,

    // Beat prediction
    /// Beat prediction strategy (default: Static)
    pub predictor: BeatPredictorKind,

    // Execution
    /// Run the resonator bank on the rayon thread pool (default: true)
    pub parallel: bool,

    /// Keep the per-resonator energy curve in the result metadata (default: false)
    pub collect_tempo_response: bool,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            min_bpm: 30.0,
            max_bpm: 150.0,
            filter_count: 500,
            half_life_samples: 15.0,
            energy_weighting: EnergyWeighting::Plain,
            onset_window_seconds: 0.2,
            predictor: BeatPredictorKind::Static,
            parallel: true,
            collect_tempo_response: false,
        }
    }
}

impl TempoConfig {
    /// Same configuration with the dynamic beat predictor selected
    pub fn dynamic() -> Self {
        Self {
            predictor: BeatPredictorKind::Dynamic,
            ..Self::default()
        }
    }

    /// Check parameter sanity before any signal processing happens
    pub(crate) fn validate(&self) -> Result<(), crate::error::AnalysisError> {
        if !self.min_bpm.is_finite() || !self.max_bpm.is_finite() || self.min_bpm <= 0.0 || self.max_bpm <= 0.0 {
            return Err(crate::error::AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }

        let slowest = bpm_to_samples(self.min_bpm).round_ties_even();
        if !slowest.is_finite() || slowest > MAX_PERIOD as f32 {
            return Err(crate::error::AnalysisError::InvalidInput(format!(
                "Minimum tempo {} BPM needs a period above {} onset samples",
                self.min_bpm, MAX_PERIOD
            )));
        }

        if !self.half_life_samples.is_finite() || self.half_life_samples < 0.0 {
            return Err(crate::error::AnalysisError::InvalidInput(format!(
                "Invalid half-life: {:.2} samples",
                self.half_life_samples
            )));
        }

        if !self.onset_window_seconds.is_finite() || self.onset_window_seconds <= 0.0 {
            return Err(crate::error::AnalysisError::InvalidInput(format!(
                "Invalid onset window: {:.3} s",
                self.onset_window_seconds
            )));
        }

        Ok(())
    }
}
