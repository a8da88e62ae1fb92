//! Static beat prediction
//!
//! Locks a single beat phase from the state the winning resonator reached at
//! the end of the recording and replicates it every period:
//!
//! 1. Feed `T - (N mod T)` zeros so the history ends on a period boundary
//! 2. Feed one more period of zeros to a copy; the first maximum of that
//!    output is the beat phase `offset`
//! 3. Emit beats at `offset, offset + T, offset + 2T, ...` below `N`

use super::{alignment_padding, locate_phase, BeatTrain};
use crate::error::AnalysisError;
use crate::features::period::comb_filter::CombFilter;

/// Predict a strictly periodic beat train
///
/// # Arguments
///
/// * `filter` - Winning comb filter after its pass over the onset curve (left untouched)
/// * `onset_len` - Length `N` of the onset curve
///
/// # Returns
///
/// Beat train of exactly `N` samples with unit impulses spaced one period apart
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `onset_len` is 0
pub fn predict_static_beats(filter: &CombFilter, onset_len: usize) -> Result<BeatTrain, AnalysisError> {
    if onset_len == 0 {
        return Err(AnalysisError::InvalidInput(
            "Cannot predict beats for an empty onset curve".to_string(),
        ));
    }

    let period = filter.period();
    let mut aligned = filter.clone();
    aligned.feed_silence(alignment_padding(period, onset_len));

    let offset = locate_phase(&aligned);

    let mut train = BeatTrain::silent(onset_len);
    for index in (offset..onset_len).step_by(period) {
        train.add_impulse(index);
    }

    log::debug!(
        "Static prediction: period {}, phase {}, {} beats over {} samples",
        period,
        offset,
        train.beat_count(),
        onset_len
    );

    Ok(train)
}
