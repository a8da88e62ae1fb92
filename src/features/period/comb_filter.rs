//! Resonant comb filter
//!
//! A leaky integrator with feedback delayed by one beat period:
//!
//! ```text
//! y[n] = alpha * y[n - T] + (1 - alpha) * x[n]
//! ```
//!
//! with `y[n - T] = 0` until `T` outputs exist. Fed a periodic onset curve
//! whose period matches `T`, the output builds up at the onset phase; for a
//! mismatched period successive onsets land on different delay slots and the
//! output stays small.
//!
//! Only the last `T` outputs are ever read back, so the filter keeps them in
//! a ring buffer of exactly `T` slots: the slot under the cursor holds
//! `y[n - T]`, and is overwritten with `y[n]`.
//!
//! # Reference
//!
//! Scheirer, E. D. (1998). Tempo and beat analysis of acoustic musical signals.
//! *The Journal of the Acoustical Society of America*, 103(1), 588-601.
//!
//! # Example
//!
//! ```
//! use pulse_dsp::features::period::comb_filter::CombFilter;
//!
//! let mut filter = CombFilter::new(2, 0.5)?;
//! let out = filter.process_sequence(&[1.0, 0.0, 1.0, 0.0]);
//! assert_eq!(out, vec![0.5, 0.0, 0.75, 0.0]);
//! # Ok::<(), pulse_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;

/// Stateful comb filter tuned to one beat period
#[derive(Debug, Clone)]
pub struct CombFilter {
    /// Beat period in onset samples
    period: usize,

    /// Feedback gain in [0, 1]
    alpha: f32,

    /// Last `period` outputs, oldest under `cursor`
    delay_line: Vec<f32>,

    /// Ring position of `y[n - period]`
    cursor: usize,

    /// Number of samples processed so far
    processed: usize,
}

impl CombFilter {
    /// Create a filter with empty history
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `period` is 0 or `alpha` is outside [0, 1]
    pub fn new(period: usize, alpha: f32) -> Result<Self, AnalysisError> {
        if period == 0 {
            return Err(AnalysisError::InvalidInput(
                "Comb filter period must be at least 1 sample".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AnalysisError::InvalidInput(format!(
                "Comb filter decay must be in [0, 1], got {}",
                alpha
            )));
        }

        Ok(Self {
            period,
            alpha,
            delay_line: vec![0.0; period],
            cursor: 0,
            processed: 0,
        })
    }

    /// Create a filter whose feedback halves every `half_life` samples
    ///
    /// `alpha = 0.5 ^ (half_life / period)`
    pub fn with_half_life(period: usize, half_life: f32) -> Result<Self, AnalysisError> {
        if period == 0 {
            return Err(AnalysisError::InvalidInput(
                "Comb filter period must be at least 1 sample".to_string(),
            ));
        }
        Self::new(period, decay_for_period(period, half_life))
    }

    /// Beat period in onset samples
    pub fn period(&self) -> usize {
        self.period
    }

    /// Feedback gain
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of samples processed since construction
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Feed one sample and return the new output
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let delayed = self.delay_line[self.cursor];
        let output = self.alpha * delayed + (1.0 - self.alpha) * sample;
        self.delay_line[self.cursor] = output;
        self.cursor += 1;
        if self.cursor == self.period {
            self.cursor = 0;
        }
        self.processed += 1;
        output
    }

    /// Feed a sequence and return every output, continuing from prior history
    pub fn process_sequence(&mut self, samples: &[f32]) -> Vec<f32> {
        samples.iter().map(|&x| self.process(x)).collect()
    }

    /// Feed `count` zero samples, discarding the outputs
    pub fn feed_silence(&mut self, count: usize) {
        for _ in 0..count {
            self.process(0.0);
        }
    }

    /// Last `period` outputs in chronological order (oldest first)
    ///
    /// Slots not yet written read as 0.
    pub fn recent_outputs(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.period);
        out.extend_from_slice(&self.delay_line[self.cursor..]);
        out.extend_from_slice(&self.delay_line[..self.cursor]);
        out
    }
}

/// Feedback gain for a resonator of `period` samples: `0.5 ^ (half_life / period)`
pub fn decay_for_period(period: usize, half_life: f32) -> f32 {
    0.5f32.powf(half_life / period as f32)
}
