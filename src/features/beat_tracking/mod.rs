//! Beat prediction modules
//!
//! Turn the winning resonator into a beat impulse train at the onset rate:
//! - Static phase lock (one phase for the whole recording)
//! - Dynamic tracker (phase re-estimated every other onset sample)
//!
//! Both predictors start by feeding the resonator silence until its history
//! length is a whole number of periods past the end of the onset curve, so
//! that position `j` within the next period lines up with onset index
//! `j mod T`.

pub mod dynamic_predictor;
pub mod static_predictor;

use crate::error::AnalysisError;
use crate::features::onset::{OnsetCurve, ONSET_RATE};
use crate::features::period::comb_filter::CombFilter;
use serde::{Deserialize, Serialize};

/// Beat prediction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BeatPredictorKind {
    /// Single phase estimate replicated every period
    #[default]
    Static,
    /// Phase re-estimated online to follow tempo drift
    Dynamic,
}

impl BeatPredictorKind {
    /// Run the selected predictor on the winning resonator
    ///
    /// # Arguments
    ///
    /// * `filter` - Winning comb filter, with the history of its pass over `onset`
    /// * `onset` - The onset curve the filter was run on
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the onset curve is empty
    pub fn predict(&self, filter: &CombFilter, onset: &OnsetCurve) -> Result<BeatTrain, AnalysisError> {
        match self {
            BeatPredictorKind::Static => static_predictor::predict_static_beats(filter, onset.len()),
            BeatPredictorKind::Dynamic => dynamic_predictor::predict_dynamic_beats(filter, onset),
        }
    }
}

/// Beat impulses at the onset rate, same length as the onset curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatTrain {
    impulses: Vec<f32>,
}

impl BeatTrain {
    /// Train of `len` zeros
    pub fn silent(len: usize) -> Self {
        Self {
            impulses: vec![0.0; len],
        }
    }

    /// Impulse values (0.0 = no beat)
    pub fn impulses(&self) -> &[f32] {
        &self.impulses
    }

    /// Number of onset samples covered
    pub fn len(&self) -> usize {
        self.impulses.len()
    }

    /// True if the train covers no samples
    pub fn is_empty(&self) -> bool {
        self.impulses.is_empty()
    }

    /// Onset-sample indices holding a beat
    pub fn positions(&self) -> Vec<usize> {
        self.impulses
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Beat times in seconds
    pub fn times_seconds(&self) -> Vec<f32> {
        self.positions()
            .into_iter()
            .map(|i| i as f32 / ONSET_RATE as f32)
            .collect()
    }

    /// Number of samples holding a beat
    pub fn beat_count(&self) -> usize {
        self.impulses.iter().filter(|&&v| v > 0.0).count()
    }

    pub(crate) fn add_impulse(&mut self, index: usize) {
        if let Some(slot) = self.impulses.get_mut(index) {
            *slot += 1.0;
        }
    }
}

/// Silence needed to bring a history of `onset_len` samples to a period boundary
///
/// Always in `1..=period`: a curve that already ends on a boundary gets a
/// full period of padding.
pub(crate) fn alignment_padding(period: usize, onset_len: usize) -> usize {
    period - (onset_len % period)
}

/// Phase within the next period where the filter's output peaks
///
/// Runs a copy of the filter over one period of silence and returns the
/// index of the first maximum of that output.
pub(crate) fn locate_phase(filter: &CombFilter) -> usize {
    let mut probe = filter.clone();
    let mut best = 0usize;
    let mut best_value = f32::NEG_INFINITY;
    for j in 0..probe.period() {
        let y = probe.process(0.0);
        if y > best_value {
            best_value = y;
            best = j;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_padding() {
        assert_eq!(alignment_padding(50, 1000), 50);
        assert_eq!(alignment_padding(50, 1001), 49);
        assert_eq!(alignment_padding(7, 3), 4);
    }

    #[test]
    fn test_locate_phase_finds_peak() {
        let mut filter = CombFilter::new(5, 0.5).unwrap();
        filter.process_sequence(&[0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(locate_phase(&filter), 3);
        // Probing must not disturb the filter
        assert_eq!(filter.processed(), 5);
    }

    #[test]
    fn test_locate_phase_silent_filter() {
        let filter = CombFilter::new(5, 0.5).unwrap();
        assert_eq!(locate_phase(&filter), 0);
    }

    #[test]
    fn test_beat_train_accessors() {
        let mut train = BeatTrain::silent(300);
        train.add_impulse(50);
        train.add_impulse(150);
        train.add_impulse(150);
        train.add_impulse(1000); // out of range, ignored

        assert_eq!(train.len(), 300);
        assert_eq!(train.positions(), vec![50, 150]);
        assert_eq!(train.beat_count(), 2);
        assert_eq!(train.impulses()[150], 2.0);
        assert_eq!(train.times_seconds(), vec![0.5, 1.5]);
    }

    #[test]
    fn test_kind_dispatch() {
        let onset = OnsetCurve::from_values(vec![0.0; 20]);
        let filter = CombFilter::new(4, 0.5).unwrap();
        let train = BeatPredictorKind::Static.predict(&filter, &onset).unwrap();
        assert_eq!(train.len(), 20);
        let train = BeatPredictorKind::Dynamic.predict(&filter, &onset).unwrap();
        assert_eq!(train.len(), 20);
    }
}
