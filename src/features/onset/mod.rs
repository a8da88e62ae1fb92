//! Onset strength extraction
//!
//! Converts raw mono audio at the 44 kHz analysis rate into a 100 Hz onset
//! strength curve.
//!
//! # Algorithm
//!
//! 1. Build a half-Hann window of `onset_window_seconds` (0.2 s = 8800 samples)
//! 2. Convolve `|x|` with the window (FFT circular convolution, see [`envelope`])
//! 3. Resample the envelope from 44000 Hz to 100 Hz (polyphase low-pass)
//! 4. First difference with an implicit leading 0, half-wave rectified
//!
//! # Example
//!
//! ```
//! use pulse_dsp::features::onset::compute_onset_curve;
//!
//! let samples = vec![0.0f32; 44000]; // 1 second of silence
//! let curve = compute_onset_curve(&samples, 0.2)?;
//! assert_eq!(curve.len(), 100);
//! # Ok::<(), pulse_dsp::AnalysisError>(())
//! ```

pub mod envelope;

use crate::error::AnalysisError;
use crate::preprocessing::resample::resample_poly;
use serde::{Deserialize, Serialize};

/// Sample rate the onset extractor's constants are tuned for (Hz)
pub const ANALYSIS_SAMPLE_RATE: u32 = 44000;

/// Rate of the onset strength curve (samples per second)
pub const ONSET_RATE: u32 = 100;

/// Onset strength curve sampled at [`ONSET_RATE`]
///
/// Every value is non-negative: the curve is a half-wave rectified derivative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsetCurve {
    values: Vec<f32>,
}

impl OnsetCurve {
    /// Wrap precomputed onset strengths, clamping negatives to 0
    pub fn from_values(values: Vec<f32>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.max(0.0)).collect(),
        }
    }

    /// Onset strengths
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of onset samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the curve holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Duration covered by the curve in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.values.len() as f32 / ONSET_RATE as f32
    }
}

/// Compute the onset strength curve of mono audio at [`ANALYSIS_SAMPLE_RATE`]
///
/// # Arguments
///
/// * `samples` - Mono audio samples at 44000 Hz
/// * `window_seconds` - Length of the half-Hann smoothing window (typically 0.2)
///
/// # Returns
///
/// Onset curve of `ceil(len * 100 / 44000)` non-negative samples
///
/// # Errors
///
/// - `InvalidInput` if the audio is empty or holds non-finite samples
/// - `InsufficientData` if the audio is shorter than the smoothing window
pub fn compute_onset_curve(samples: &[f32], window_seconds: f32) -> Result<OnsetCurve, AnalysisError> {
    log::debug!(
        "Computing onset curve: {} samples, window={:.3}s",
        samples.len(),
        window_seconds
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Non-finite audio sample at index {}",
            pos
        )));
    }

    let window_len = (window_seconds * ANALYSIS_SAMPLE_RATE as f32) as usize;
    if window_len == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Onset window of {:.4}s is shorter than one sample",
            window_seconds
        )));
    }

    if samples.len() < window_len {
        return Err(AnalysisError::InsufficientData(format!(
            "Audio of {} samples is shorter than the {}-sample onset window",
            samples.len(),
            window_len
        )));
    }

    let window = envelope::half_hann_window(window_len);
    let smoothed = envelope::convolve_envelope(samples, &window)?;
    let downsampled = resample_poly(&smoothed, ONSET_RATE as usize, ANALYSIS_SAMPLE_RATE as usize)?;

    let values = rectified_difference(&downsampled);

    log::debug!("Onset curve: {} samples at {} Hz", values.len(), ONSET_RATE);

    Ok(OnsetCurve { values })
}

/// First difference with an implicit leading 0, negatives clamped to 0
fn rectified_difference(signal: &[f32]) -> Vec<f32> {
    let mut prev = 0.0f32;
    signal
        .iter()
        .map(|&x| {
            let d = (x - prev).max(0.0);
            prev = x;
            d
        })
        .collect()
}
