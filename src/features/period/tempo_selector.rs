//! Energy-based tempo selection
//!
//! Scores every resonator by the energy of its output and keeps the
//! strongest one. The first maximum wins, so ties resolve to the shortest
//! period (fastest tempo).

use super::resonator_bank::ResonatorOutput;
use super::samples_to_bpm;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// How a resonator's output energy is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnergyWeighting {
    /// `Σ y²`
    #[default]
    Plain,
    /// `alpha * Σ y²`, favouring slower resonators
    DecayWeighted,
}

/// Winning resonator and its tempo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Tempo in BPM, `60 / (period / 100)`
    pub bpm: f32,

    /// Beat period in onset samples
    pub period: usize,

    /// Feedback gain of the winning filter
    pub alpha: f32,

    /// Position of the winning filter in the bank (period order)
    pub index: usize,

    /// Score of the winning filter
    pub energy: f32,

    /// All resonators scored the same; the shortest period was taken
    pub degenerate: bool,
}

/// Score one resonator output
pub fn resonator_energy(output: &ResonatorOutput, weighting: EnergyWeighting) -> f32 {
    let sum: f64 = output.output.iter().map(|&y| (y as f64) * (y as f64)).sum();
    let energy = match weighting {
        EnergyWeighting::Plain => sum,
        EnergyWeighting::DecayWeighted => sum * output.alpha as f64,
    };
    energy as f32
}

/// Pick the resonator with the highest output energy
///
/// # Arguments
///
/// * `outputs` - Resonator outputs in period order
/// * `weighting` - Energy scoring rule
///
/// # Returns
///
/// [`TempoEstimate`] for the strongest resonator. When every resonator
/// scores the same the first (shortest period) one is returned with
/// `degenerate` set.
///
/// # Errors
///
/// Returns `AnalysisError::EmptyBank` if `outputs` is empty
pub fn select_tempo(
    outputs: &[ResonatorOutput],
    weighting: EnergyWeighting,
) -> Result<TempoEstimate, AnalysisError> {
    if outputs.is_empty() {
        return Err(AnalysisError::EmptyBank(
            "No resonator outputs to select from".to_string(),
        ));
    }

    let energies: Vec<f32> = outputs.iter().map(|o| resonator_energy(o, weighting)).collect();

    let mut best = 0usize;
    for (i, &e) in energies.iter().enumerate().skip(1) {
        if e > energies[best] {
            best = i;
        }
    }

    let degenerate = energies.iter().all(|&e| e == energies[0]);
    if degenerate {
        log::warn!(
            "All {} resonators have equal energy ({:.3e}); using shortest period {}",
            energies.len(),
            energies[0],
            outputs[0].period
        );
    }

    let winner = &outputs[best];
    let bpm = samples_to_bpm(winner.period as f32);

    log::debug!(
        "Selected period {} ({:.2} BPM), energy {:.4}, alpha {:.4}",
        winner.period,
        bpm,
        energies[best],
        winner.alpha
    );

    Ok(TempoEstimate {
        bpm,
        period: winner.period,
        alpha: winner.alpha,
        index: best,
        energy: energies[best],
        degenerate,
    })
}
