//! Period estimation modules
//!
//! Turn an onset curve into a tempo estimate with a bank of resonators:
//! - Comb filter (one resonator per candidate period)
//! - Resonator bank spanning a BPM range
//! - Energy-based tempo selection

pub mod comb_filter;
pub mod resonator_bank;
pub mod tempo_selector;

use crate::features::onset::ONSET_RATE;

/// Convert a tempo in BPM to a beat period in onset samples
///
/// `bpm_to_samples(bpm) = (60 / bpm) * 100`
///
/// # Example
///
/// ```
/// use pulse_dsp::features::period::bpm_to_samples;
///
/// assert_eq!(bpm_to_samples(120.0), 50.0);
/// ```
pub fn bpm_to_samples(bpm: f32) -> f32 {
    (60.0 / bpm) * ONSET_RATE as f32
}

/// Convert a beat period in onset samples to a tempo in BPM
///
/// `samples_to_bpm(T) = 60 / (T / 100)`
pub fn samples_to_bpm(samples: f32) -> f32 {
    60.0 / (samples / ONSET_RATE as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_conversions() {
        assert_eq!(bpm_to_samples(30.0), 200.0);
        assert_eq!(bpm_to_samples(150.0), 40.0);
        assert_eq!(samples_to_bpm(50.0), 120.0);
    }

    #[test]
    fn test_roundtrip() {
        for &x in &[1.0f32, 7.5, 40.0, 50.0, 113.0, 200.0, 1234.5] {
            let back = bpm_to_samples(samples_to_bpm(x));
            assert!((back - x).abs() <= x * 1e-5, "roundtrip of {} gave {}", x, back);

            let back = samples_to_bpm(bpm_to_samples(x));
            assert!((back - x).abs() <= x * 1e-5, "roundtrip of {} BPM gave {}", x, back);
        }
    }
}
