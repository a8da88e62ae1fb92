//! Resonator bank spanning a tempo range
//!
//! One [`CombFilter`] per integer beat period between the periods of the
//! fastest and slowest admissible tempo. Each filter owns its history and
//! runs over the same read-only onset curve, so the bank is processed with
//! a rayon parallel iterator; outputs come back in period order.
//!
//! # Example
//!
//! ```
//! use pulse_dsp::features::period::resonator_bank::ResonatorBank;
//!
//! let bank = ResonatorBank::build(30.0, 150.0, 500, 15.0)?;
//! assert_eq!(bank.min_period(), 40);
//! assert_eq!(bank.max_period(), 200);
//! assert_eq!(bank.len(), 161);
//! # Ok::<(), pulse_dsp::AnalysisError>(())
//! ```

use super::bpm_to_samples;
use super::comb_filter::CombFilter;
use crate::error::AnalysisError;
use crate::features::onset::OnsetCurve;
use rayon::prelude::*;

/// Longest admissible beat period in onset samples (10 s, i.e. 6 BPM)
///
/// Every filter owns a delay line of its period and an output buffer of the
/// onset length, so the bank's memory grows with the square of this bound.
pub const MAX_PERIOD: usize = 1000;

/// Output of one resonator over the onset curve
#[derive(Debug, Clone)]
pub struct ResonatorOutput {
    /// Beat period in onset samples
    pub period: usize,

    /// Feedback gain of the filter
    pub alpha: f32,

    /// Filter output, one value per onset sample
    pub output: Vec<f32>,
}

/// Owned collection of comb filters indexed by `period - min_period`
#[derive(Debug, Clone)]
pub struct ResonatorBank {
    min_period: usize,
    max_period: usize,
    filters: Vec<CombFilter>,
}

impl ResonatorBank {
    /// Build a bank covering `[min_bpm, max_bpm]`
    ///
    /// # Arguments
    ///
    /// * `min_bpm` - Slowest tempo, maps to `max_period = round(bpm_to_samples(min_bpm))`
    /// * `max_bpm` - Fastest tempo, maps to `min_period = round(bpm_to_samples(max_bpm))`
    /// * `filter_count` - Advisory upper bound on the bank size (only logged when exceeded)
    /// * `half_life` - Decay half-life in onset samples (`alpha = 0.5 ^ (half_life / T)`)
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if a BPM bound is not a positive finite number, or
    ///   `min_bpm` is so slow its period exceeds [`MAX_PERIOD`]
    /// - `EmptyBank` if the derived period range is empty
    pub fn build(
        min_bpm: f32,
        max_bpm: f32,
        filter_count: usize,
        half_life: f32,
    ) -> Result<Self, AnalysisError> {
        if !min_bpm.is_finite() || !max_bpm.is_finite() || min_bpm <= 0.0 || max_bpm <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                min_bpm, max_bpm
            )));
        }

        let slowest = bpm_to_samples(min_bpm).round_ties_even();
        if !slowest.is_finite() || slowest > MAX_PERIOD as f32 {
            return Err(AnalysisError::InvalidInput(format!(
                "Minimum tempo {} BPM is below the slowest supported period of {} samples",
                min_bpm, MAX_PERIOD
            )));
        }

        let max_period = slowest as usize;
        let min_period = (bpm_to_samples(max_bpm).round_ties_even() as usize).max(1);

        if min_period > max_period {
            return Err(AnalysisError::EmptyBank(format!(
                "BPM range [{:.1}, {:.1}] maps to empty period range [{}, {}]",
                min_bpm, max_bpm, min_period, max_period
            )));
        }

        let width = max_period - min_period + 1;
        if width > filter_count {
            log::warn!(
                "Resonator bank has {} filters, above the advisory count of {}",
                width,
                filter_count
            );
        }

        Self::from_periods(min_period, max_period, half_life)
    }

    /// Build a bank with one filter per period in `[min_period, max_period]`
    pub fn from_periods(min_period: usize, max_period: usize, half_life: f32) -> Result<Self, AnalysisError> {
        if min_period == 0 || min_period > max_period {
            return Err(AnalysisError::EmptyBank(format!(
                "Empty period range [{}, {}]",
                min_period, max_period
            )));
        }

        if max_period > MAX_PERIOD {
            return Err(AnalysisError::InvalidInput(format!(
                "Period {} exceeds the supported maximum of {} samples",
                max_period, MAX_PERIOD
            )));
        }

        let filters = (min_period..=max_period)
            .map(|period| CombFilter::with_half_life(period, half_life))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Built resonator bank: periods [{}, {}], {} filters, half-life {:.1} samples",
            min_period,
            max_period,
            filters.len(),
            half_life
        );

        Ok(Self {
            min_period,
            max_period,
            filters,
        })
    }

    /// Shortest period in the bank (fastest tempo)
    pub fn min_period(&self) -> usize {
        self.min_period
    }

    /// Longest period in the bank (slowest tempo)
    pub fn max_period(&self) -> usize {
        self.max_period
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True if the bank holds no filters
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filters in period order
    pub fn filters(&self) -> &[CombFilter] {
        &self.filters
    }

    /// Run every filter over the onset curve
    ///
    /// Each filter keeps the history it accumulates, so a filter taken out
    /// with [`ResonatorBank::into_filter`] afterwards continues from the end
    /// of the curve.
    ///
    /// # Arguments
    ///
    /// * `onset` - Onset curve shared by all filters
    /// * `parallel` - Use the rayon thread pool
    ///
    /// # Returns
    ///
    /// One [`ResonatorOutput`] per filter, in period order
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InsufficientData` if the curve is shorter than
    /// the smallest period
    pub fn run(&mut self, onset: &OnsetCurve, parallel: bool) -> Result<Vec<ResonatorOutput>, AnalysisError> {
        if onset.len() < self.min_period {
            return Err(AnalysisError::InsufficientData(format!(
                "Onset curve of {} samples is shorter than the smallest period ({})",
                onset.len(),
                self.min_period
            )));
        }

        log::debug!(
            "Running {} resonators over {} onset samples (parallel={})",
            self.filters.len(),
            onset.len(),
            parallel
        );

        let input = onset.values();
        let run_one = |filter: &mut CombFilter| ResonatorOutput {
            period: filter.period(),
            alpha: filter.alpha(),
            output: filter.process_sequence(input),
        };

        let outputs: Vec<ResonatorOutput> = if parallel {
            self.filters.par_iter_mut().map(run_one).collect()
        } else {
            self.filters.iter_mut().map(run_one).collect()
        };

        Ok(outputs)
    }

    /// Take the filter at `index` (period order) with its accumulated history
    pub fn into_filter(mut self, index: usize) -> Option<CombFilter> {
        if index < self.filters.len() {
            Some(self.filters.swap_remove(index))
        } else {
            None
        }
    }
}
