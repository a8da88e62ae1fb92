//! Amplitude envelope via half-Hann smoothing
//!
//! The envelope is the circular convolution of the rectified signal with the
//! decaying half of a Hann window, computed in the frequency domain:
//! `env = IFFT(FFT(|x|) · FFT(w_padded))`, with `w_padded` the window
//! zero-padded to the signal length.

use crate::error::AnalysisError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Decaying half of a symmetric Hann window of length `2 * window_len`
///
/// The full window is `w[i] = sin²(π i / (M - 1))` with `M = 2 * window_len`;
/// the returned slice is `w[window_len..M]`, so it starts near 1.0 and
/// decays to exactly 0.0.
pub fn half_hann_window(window_len: usize) -> Vec<f32> {
    let full_len = 2 * window_len;
    if full_len < 2 {
        return vec![0.0; window_len];
    }
    let denom = (full_len - 1) as f64;
    (window_len..full_len)
        .map(|i| {
            let v = (std::f64::consts::PI * i as f64 / denom).sin();
            (v * v) as f32
        })
        .collect()
}

/// Smooth the magnitude of `samples` with `window` by FFT circular convolution
///
/// # Arguments
///
/// * `samples` - Audio samples
/// * `window` - Smoothing kernel, no longer than `samples`
///
/// # Returns
///
/// Envelope with the same length as `samples`
///
/// # Errors
///
/// Returns `AnalysisError::InsufficientData` if the window is longer than the signal
pub fn convolve_envelope(samples: &[f32], window: &[f32]) -> Result<Vec<f32>, AnalysisError> {
    let n = samples.len();
    if window.len() > n {
        return Err(AnalysisError::InsufficientData(format!(
            "Signal of {} samples is shorter than the {}-sample envelope window",
            n,
            window.len()
        )));
    }
    if n == 0 {
        return Ok(vec![]);
    }

    log::debug!("Convolving {} samples with {}-tap half-Hann window", n, window.len());

    let mut signal: Vec<Complex<f64>> = samples
        .iter()
        .map(|&x| Complex::new(x.abs() as f64, 0.0))
        .collect();

    let mut kernel: Vec<Complex<f64>> = window.iter().map(|&w| Complex::new(w as f64, 0.0)).collect();
    kernel.resize(n, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut signal);
    fft.process(&mut kernel);

    for (s, k) in signal.iter_mut().zip(kernel.iter()) {
        *s *= *k;
    }

    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut signal);

    if signal.len() != n {
        return Err(AnalysisError::NumericalError(format!(
            "Inverse FFT produced {} samples, expected {}",
            signal.len(),
            n
        )));
    }

    let scale = 1.0 / n as f64;
    Ok(signal.iter().map(|c| (c.re * scale) as f32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_hann_shape() {
        let w = half_hann_window(8800);
        assert_eq!(w.len(), 8800);
        assert!(w[0] > 0.999, "Half window should start near 1.0, got {}", w[0]);
        assert_eq!(*w.last().unwrap(), 0.0);
        assert!(w.windows(2).all(|p| p[1] <= p[0]), "Half window must be non-increasing");
    }

    #[test]
    fn test_single_impulse_reproduces_window() {
        let mut samples = vec![0.0f32; 64];
        samples[0] = -1.0; // magnitude is taken
        let window = half_hann_window(8);
        let env = convolve_envelope(&samples, &window).unwrap();
        assert_eq!(env.len(), 64);
        for (i, &w) in window.iter().enumerate() {
            assert!((env[i] - w).abs() < 1e-6, "env[{}]={} should equal window {}", i, env[i], w);
        }
        for &v in &env[8..] {
            assert!(v.abs() < 1e-6);
        }
    }

    #[test]
    fn test_convolution_wraps_circularly() {
        let mut samples = vec![0.0f32; 16];
        samples[14] = 1.0;
        let window = vec![1.0, 0.5, 0.25];
        let env = convolve_envelope(&samples, &window).unwrap();
        assert!((env[14] - 1.0).abs() < 1e-6);
        assert!((env[15] - 0.5).abs() < 1e-6);
        assert!((env[0] - 0.25).abs() < 1e-6, "Tail should wrap to index 0");
    }

    #[test]
    fn test_window_longer_than_signal() {
        let result = convolve_envelope(&[1.0, 1.0], &[1.0, 1.0, 1.0]);
        assert!(matches!(result, Err(AnalysisError::InsufficientData(_))));
    }
}
