//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::features::beat_tracking::{BeatPredictorKind, BeatTrain};

/// Complete tempo analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoAnalysis {
    /// Tempo estimate in BPM
    pub bpm: f32,

    /// Winning beat period in onset samples (100 Hz)
    pub period: usize,

    /// Feedback gain of the winning resonator
    pub alpha: f32,

    /// Predicted beats at the onset rate
    pub beats: BeatTrain,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl TempoAnalysis {
    /// Beat times in seconds
    pub fn beat_times(&self) -> Vec<f32> {
        self.beats.times_seconds()
    }
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Audio duration in seconds
    pub duration_seconds: f32,

    /// Sample rate of the audio handed in, in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Beat predictor that produced `beats`
    pub predictor: BeatPredictorKind,

    /// Length of the onset curve in samples
    pub onset_samples: usize,

    /// Shortest resonator period searched
    pub min_period: usize,

    /// Longest resonator period searched
    pub max_period: usize,

    /// Output energy of the winning resonator
    pub winning_energy: f32,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Optional: energy of every resonator, in period order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo_response: Option<Vec<ResonatorResponse>>,
}

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Every resonator scored the same; the shortest period was taken
    DegenerateEnergy,
    /// The winning period sits on an edge of the search range
    TempoAtRangeBoundary,
    /// The predictor produced no beats
    NoBeatsPredicted,
}

/// Energy of one resonator (for tempo response curves)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonatorResponse {
    /// Beat period in onset samples
    pub period: usize,
    /// Tempo of the period in BPM
    pub bpm: f32,
    /// Feedback gain
    pub alpha: f32,
    /// Output energy
    pub energy: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> TempoAnalysis {
        TempoAnalysis {
            bpm: 120.0,
            period: 50,
            alpha: 0.81,
            beats: BeatTrain::silent(10),
            metadata: AnalysisMetadata {
                duration_seconds: 0.1,
                sample_rate: 44000,
                processing_time_ms: 1.0,
                algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
                predictor: BeatPredictorKind::Static,
                onset_samples: 10,
                min_period: 40,
                max_period: 200,
                winning_energy: 0.0,
                flags: vec![AnalysisFlag::NoBeatsPredicted],
                tempo_response: None,
            },
        }
    }

    #[test]
    fn test_serialization_skips_missing_response() {
        let json = serde_json::to_string(&sample_analysis()).unwrap();
        assert!(!json.contains("tempo_response"));
        assert!(json.contains("NoBeatsPredicted"));

        let back: TempoAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back.period, 50);
        assert_eq!(back.beats.len(), 10);
    }

    #[test]
    fn test_beat_times_empty() {
        assert!(sample_analysis().beat_times().is_empty());
    }
}
