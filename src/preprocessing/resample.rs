//! Sample-rate conversion
//!
//! Two resamplers with different jobs:
//!
//! - [`resample_to_rate`] converts input audio to the 44 kHz analysis rate
//!   with rubato's FFT resampler
//! - [`resample_poly`] decimates the onset envelope by the exact rational
//!   factor `up / down` with a Kaiser-windowed sinc FIR evaluated only at the
//!   output instants (polyphase form)
//!
//! # Polyphase algorithm
//!
//! 1. Reduce `up / down` by their greatest common divisor
//! 2. Design a low-pass FIR filter with `2 * 10 * max(up, down) + 1` taps,
//!    cutoff `1 / max(up, down)` (relative to Nyquist), Kaiser window β = 5.0
//! 3. Normalise the filter to unit DC gain, then scale by `up`
//! 4. For each output sample `j`, sum the filter taps that land on real
//!    (non-inserted) input samples around `j * down` in the upsampled domain
//!
//! This is the filter and alignment of `scipy.signal.resample_poly`: the
//! signal is treated as zero outside its bounds, output length is
//! `ceil(n * up / down)` and output sample `j` is centred on input time
//! `j * down / up`.
//!
//! # Example
//!
//! ```
//! use pulse_dsp::preprocessing::resample::resample_poly;
//!
//! let input = vec![1.0f32; 44000];
//! let output = resample_poly(&input, 100, 44000)?;
//! assert_eq!(output.len(), 100);
//! # Ok::<(), pulse_dsp::AnalysisError>(())
//! ```

use crate::error::AnalysisError;
use rubato::{FftFixedInOut, Resampler};

/// Kaiser window shape parameter
const KAISER_BETA: f64 = 5.0;

/// Filter half-length as a multiple of the larger rate factor
const HALF_LEN_FACTOR: usize = 10;

/// Nominal input chunk for the FFT resampler
const RESAMPLER_CHUNK: usize = 1024;

/// Resample `samples` by the rational factor `up / down`
///
/// # Arguments
///
/// * `samples` - Input signal
/// * `up` - Upsampling factor
/// * `down` - Downsampling factor
///
/// # Returns
///
/// Resampled signal of length `ceil(samples.len() * up / down)`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if either factor is zero
pub fn resample_poly(samples: &[f32], up: usize, down: usize) -> Result<Vec<f32>, AnalysisError> {
    if up == 0 || down == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid resampling factors: up={}, down={}",
            up, down
        )));
    }

    let g = gcd(up, down);
    let (up, down) = (up / g, down / g);

    if up == 1 && down == 1 {
        return Ok(samples.to_vec());
    }

    if samples.is_empty() {
        return Ok(vec![]);
    }

    let filter = design_lowpass(up, down);
    let half_len = (filter.len() - 1) / 2;
    let n = samples.len();
    let out_len = (n * up).div_ceil(down);

    log::debug!(
        "Resampling {} samples by {}/{} ({} taps) -> {} samples",
        n,
        up,
        down,
        filter.len(),
        out_len
    );

    let mut output = Vec::with_capacity(out_len);
    for j in 0..out_len {
        // Centre of this output sample in the upsampled domain
        let centre = j * down;
        let lo = centre.saturating_sub(half_len);
        let hi = (centre + half_len).min(n * up - 1);

        // First upsampled index >= lo that carries a real input sample
        let mut p = lo.div_ceil(up) * up;
        let mut acc = 0.0f64;
        while p <= hi {
            let tap = half_len + centre - p;
            acc += filter[tap] * samples[p / up] as f64;
            p += up;
        }
        output.push(acc as f32);
    }

    Ok(output)
}

/// Resample mono audio from one sample rate to another
///
/// Runs rubato's [`FftFixedInOut`] over the whole buffer, zero-padding the
/// last chunk, then drops the resampler delay so the output starts at the
/// same instant as the input.
///
/// # Arguments
///
/// * `samples` - Mono audio at `source_rate`
/// * `source_rate` - Input sample rate in Hz
/// * `target_rate` - Output sample rate in Hz
///
/// # Returns
///
/// `ceil(samples.len() * target_rate / source_rate)` samples at `target_rate`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if either rate is zero or rubato
/// rejects the rate pair
pub fn resample_to_rate(
    samples: &[f32],
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, AnalysisError> {
    if source_rate == 0 || target_rate == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid sample rates: {} Hz -> {} Hz",
            source_rate, target_rate
        )));
    }

    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedInOut::<f32>::new(source_rate as usize, target_rate as usize, RESAMPLER_CHUNK, 1).map_err(|e| {
            AnalysisError::InvalidInput(format!(
                "Cannot resample {} Hz -> {} Hz: {}",
                source_rate, target_rate, e
            ))
        })?;

    let delay = resampler.output_delay();
    let expected = (samples.len() as u64 * target_rate as u64).div_ceil(source_rate as u64) as usize;
    let wanted = delay + expected;

    log::debug!(
        "Resampling {} samples {} Hz -> {} Hz (delay {} frames)",
        samples.len(),
        source_rate,
        target_rate,
        delay
    );

    let mut output: Vec<f32> = Vec::with_capacity(wanted);
    let mut chunk: Vec<f32> = Vec::with_capacity(resampler.input_frames_max());
    let mut pos = 0usize;

    while output.len() < wanted {
        let need = resampler.input_frames_next();
        chunk.clear();
        if pos < samples.len() {
            let end = (pos + need).min(samples.len());
            chunk.extend_from_slice(&samples[pos..end]);
        }
        // Past the end, feed silence until the delayed tail is flushed
        chunk.resize(need, 0.0);
        pos += need;

        let block = resampler
            .process(&[chunk.as_slice()], None)
            .map_err(|e| AnalysisError::NumericalError(format!("Resampling failed: {}", e)))?;
        if let Some(channel) = block.into_iter().next() {
            output.extend(channel);
        }
    }

    output.drain(..delay);
    output.truncate(expected);
    Ok(output)
}

/// Kaiser-windowed sinc low-pass, unit DC gain scaled by `up`
fn design_lowpass(up: usize, down: usize) -> Vec<f64> {
    let max_rate = up.max(down);
    let half_len = HALF_LEN_FACTOR * max_rate;
    let num_taps = 2 * half_len + 1;
    let cutoff = 1.0 / max_rate as f64;

    let i0_beta = bessel_i0(KAISER_BETA);
    let mut taps: Vec<f64> = (0..num_taps)
        .map(|k| {
            let m = k as f64 - half_len as f64;
            let ratio = 2.0 * k as f64 / (num_taps - 1) as f64 - 1.0;
            let window = bessel_i0(KAISER_BETA * (1.0 - ratio * ratio).max(0.0).sqrt()) / i0_beta;
            cutoff * sinc(cutoff * m) * window
        })
        .collect();

    let dc_gain: f64 = taps.iter().sum();
    let scale = up as f64 / dc_gain;
    for tap in &mut taps {
        *tap *= scale;
    }

    taps
}

/// Normalised sinc: sin(πx) / (πx)
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

/// Zeroth-order modified Bessel function of the first kind (power series)
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-17 {
        term *= (half / k) * (half / k);
        sum += term;
        k += 1.0;
    }
    sum
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
