//! # Pulse DSP
//!
//! Tempo estimation and beat prediction for recorded audio with a bank of
//! resonant comb filters.
//!
//! ## Features
//!
//! - **Onset extraction**: half-Hann envelope, 100 Hz rectified derivative
//! - **Tempo estimation**: one comb filter per candidate beat period, strongest output wins
//! - **Beat prediction**: static phase lock or a dynamic tracker that follows drift
//!
//! ## Quick Start
//!
//! ```no_run
//! use pulse_dsp::{analyze_tempo, TempoConfig};
//!
//! use pulse_dsp::preprocessing::channel_mixer::{to_mono, ChannelMixMode};
//!
//! // Load audio samples (interleaved stereo, f32)
//! let interleaved: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! let samples = to_mono(&interleaved, 2, ChannelMixMode::Average)?;
//! let result = analyze_tempo(&samples, sample_rate, TempoConfig::default())?;
//!
//! println!("BPM: {:.2} (period {} samples)", result.bpm, result.period);
//! println!("Beats at: {:?}", result.beat_times());
//! # Ok::<(), pulse_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Audio (44 kHz) → Onset curve (100 Hz) → Resonator bank → Tempo selection → Beat prediction
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

use std::borrow::Cow;

// Re-export main types
pub use analysis::result::{AnalysisFlag, AnalysisMetadata, ResonatorResponse, TempoAnalysis};
pub use config::TempoConfig;
pub use error::AnalysisError;
pub use features::beat_tracking::{BeatPredictorKind, BeatTrain};
pub use features::onset::{OnsetCurve, ANALYSIS_SAMPLE_RATE, ONSET_RATE};
pub use features::period::tempo_selector::{EnergyWeighting, TempoEstimate};
pub use features::period::{bpm_to_samples, samples_to_bpm};

use features::onset::compute_onset_curve;
use features::period::resonator_bank::ResonatorBank;
use features::period::tempo_selector::{resonator_energy, select_tempo};

/// Detect tempo and beats with the static predictor
///
/// # Arguments
///
/// * `samples` - Mono audio at [`ANALYSIS_SAMPLE_RATE`] (44000 Hz)
///
/// # Returns
///
/// The winning tempo and a beat train at the 100 Hz onset rate
///
/// # Errors
///
/// - `InvalidInput` for empty or non-finite audio
/// - `InsufficientData` if the audio is shorter than the onset window or
///   the onset curve is shorter than the smallest resonator period
///
/// # Example
///
/// ```no_run
/// use pulse_dsp::detect_tempo;
///
/// let samples = vec![0.0f32; 44000 * 30];
/// let (tempo, beats) = detect_tempo(&samples)?;
/// println!("{:.1} BPM, {} beats", tempo.bpm, beats.beat_count());
/// # Ok::<(), pulse_dsp::AnalysisError>(())
/// ```
pub fn detect_tempo(samples: &[f32]) -> Result<(TempoEstimate, BeatTrain), AnalysisError> {
    detect_with(samples, TempoConfig::default())
}

/// Detect tempo and beats with the dynamic (drift-following) predictor
///
/// Same contract as [`detect_tempo`].
pub fn detect_tempo_dynamic(samples: &[f32]) -> Result<(TempoEstimate, BeatTrain), AnalysisError> {
    detect_with(samples, TempoConfig::dynamic())
}

fn detect_with(samples: &[f32], config: TempoConfig) -> Result<(TempoEstimate, BeatTrain), AnalysisError> {
    config.validate()?;
    let onset = compute_onset_curve(samples, config.onset_window_seconds)?;
    let outcome = run_pipeline(&onset, &config)?;
    Ok((outcome.tempo, outcome.beats))
}

/// Detect tempo and beats from a precomputed onset curve
///
/// # Arguments
///
/// * `onset` - Onset strength curve at [`ONSET_RATE`]
/// * `config` - Analysis configuration (the onset window is ignored)
pub fn detect_tempo_from_onset(
    onset: &OnsetCurve,
    config: &TempoConfig,
) -> Result<(TempoEstimate, BeatTrain), AnalysisError> {
    config.validate()?;
    let outcome = run_pipeline(onset, config)?;
    Ok((outcome.tempo, outcome.beats))
}

/// Main analysis function
///
/// Resamples the audio to the analysis rate if needed, then runs onset
/// extraction, the resonator bank, tempo selection and beat prediction.
///
/// Input must be mono. Mix interleaved multi-channel audio down first with
/// [`preprocessing::channel_mixer::to_mono`].
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz (resampled to 44000 Hz when different)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `TempoAnalysis` containing BPM, beat train and metadata
///
/// # Errors
///
/// Returns `AnalysisError` if the input is invalid or too short, or if the
/// BPM range maps to no resonator
pub fn analyze_tempo(
    samples: &[f32],
    sample_rate: u32,
    config: TempoConfig,
) -> Result<TempoAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!("Starting tempo analysis: {} samples at {} Hz", samples.len(), sample_rate);

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate".to_string()));
    }

    config.validate()?;

    // Non-finite input survives resampling as non-finite output and is
    // rejected by the onset stage
    let audio: Cow<'_, [f32]> = if sample_rate == ANALYSIS_SAMPLE_RATE {
        Cow::Borrowed(samples)
    } else {
        Cow::Owned(preprocessing::resample::resample_to_rate(
            samples,
            sample_rate,
            ANALYSIS_SAMPLE_RATE,
        )?)
    };

    let onset = compute_onset_curve(&audio, config.onset_window_seconds)?;
    let outcome = run_pipeline(&onset, &config)?;

    let mut flags = Vec::new();
    if outcome.tempo.degenerate {
        flags.push(AnalysisFlag::DegenerateEnergy);
    }
    if outcome.max_period > outcome.min_period
        && (outcome.tempo.period == outcome.min_period || outcome.tempo.period == outcome.max_period)
    {
        flags.push(AnalysisFlag::TempoAtRangeBoundary);
    }
    if outcome.beats.beat_count() == 0 {
        flags.push(AnalysisFlag::NoBeatsPredicted);
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Tempo analysis done: {:.2} BPM, {} beats, {:.2} ms",
        outcome.tempo.bpm,
        outcome.beats.beat_count(),
        processing_time_ms
    );

    Ok(TempoAnalysis {
        bpm: outcome.tempo.bpm,
        period: outcome.tempo.period,
        alpha: outcome.tempo.alpha,
        beats: outcome.beats,
        metadata: AnalysisMetadata {
            duration_seconds: samples.len() as f32 / sample_rate as f32,
            sample_rate,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            predictor: config.predictor,
            onset_samples: onset.len(),
            min_period: outcome.min_period,
            max_period: outcome.max_period,
            winning_energy: outcome.tempo.energy,
            flags,
            tempo_response: outcome.response,
        },
    })
}

/// Everything the resonator stage produces for one onset curve
struct PipelineOutcome {
    tempo: TempoEstimate,
    beats: BeatTrain,
    min_period: usize,
    max_period: usize,
    response: Option<Vec<ResonatorResponse>>,
}

fn run_pipeline(onset: &OnsetCurve, config: &TempoConfig) -> Result<PipelineOutcome, AnalysisError> {
    if onset.is_empty() {
        return Err(AnalysisError::InsufficientData("Empty onset curve".to_string()));
    }

    let mut bank = ResonatorBank::build(
        config.min_bpm,
        config.max_bpm,
        config.filter_count,
        config.half_life_samples,
    )?;
    let (min_period, max_period) = (bank.min_period(), bank.max_period());

    let outputs = bank.run(onset, config.parallel)?;
    let tempo = select_tempo(&outputs, config.energy_weighting)?;

    let response = config.collect_tempo_response.then(|| {
        outputs
            .iter()
            .map(|o| ResonatorResponse {
                period: o.period,
                bpm: samples_to_bpm(o.period as f32),
                alpha: o.alpha,
                energy: resonator_energy(o, config.energy_weighting),
            })
            .collect()
    });
    drop(outputs);

    let winner = bank.into_filter(tempo.index).ok_or_else(|| {
        AnalysisError::NumericalError(format!("Winning resonator index {} out of range", tempo.index))
    })?;

    let beats = config.predictor.predict(&winner, onset)?;

    Ok(PipelineOutcome {
        tempo,
        beats,
        min_period,
        max_period,
        response,
    })
}
