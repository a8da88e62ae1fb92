//! Dynamic beat prediction
//!
//! Re-estimates the beat phase while the resonator replays the recording, so
//! beats can follow moderate tempo drift.
//!
//! # Algorithm
//!
//! After aligning the winning filter to a period boundary (as the static
//! predictor does), the onset curve is fed through it once more. At every
//! even onset index `i`, before sample `i` is fed:
//!
//! 1. `idx` = phase of the filter's next output peak ([`super::locate_phase`])
//! 2. If recent phases exist, `m = round(mean(past))`; a beat is emitted at
//!    `i + m` when `m < 1` (the predicted beat is due) or `|m - idx| > T / 1.5`
//!    (the filter now points at a different beat), and `past` is cleared
//! 3. `idx` joins `past` only if `idx > 0`; `past` keeps the 5 newest entries
//! 4. Every entry in `past` is decremented by one, since the next probe
//!    happens one step closer to the predicted beat
//!
//! The constants (window of 5, `T / 1.5`, unit decrement) are empirical and
//! change the produced beats if altered.

use super::{alignment_padding, locate_phase, BeatTrain};
use crate::error::AnalysisError;
use crate::features::onset::OnsetCurve;
use crate::features::period::comb_filter::CombFilter;
use std::collections::VecDeque;

/// Number of recent phase estimates averaged
const PHASE_HISTORY: usize = 5;

/// A new beat is assumed when the phase jumps by more than `period / PHASE_JUMP_DIVISOR`
const PHASE_JUMP_DIVISOR: f64 = 1.5;

/// Predict beats with online phase tracking
///
/// # Arguments
///
/// * `filter` - Winning comb filter after its pass over `onset` (left untouched)
/// * `onset` - The onset curve the filter was run on
///
/// # Returns
///
/// Beat train of `onset.len()` samples. Impulse values count how many times
/// a beat was emitted at that index.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if the onset curve is empty
pub fn predict_dynamic_beats(filter: &CombFilter, onset: &OnsetCurve) -> Result<BeatTrain, AnalysisError> {
    let n = onset.len();
    if n == 0 {
        return Err(AnalysisError::InvalidInput(
            "Cannot predict beats for an empty onset curve".to_string(),
        ));
    }

    let period = filter.period();
    let jump_threshold = period as f64 / PHASE_JUMP_DIVISOR;

    let mut tracker = filter.clone();
    tracker.feed_silence(alignment_padding(period, n));

    let mut train = BeatTrain::silent(n);
    let mut past: VecDeque<i64> = VecDeque::with_capacity(PHASE_HISTORY + 1);

    for (i, &sample) in onset.values().iter().enumerate() {
        if i % 2 == 0 {
            let idx = locate_phase(&tracker) as i64;

            if !past.is_empty() {
                let mean = past.iter().sum::<i64>() as f64 / past.len() as f64;
                let mean_idx = mean.round_ties_even() as i64;

                if mean_idx < 1 || ((mean_idx - idx).abs() as f64) > jump_threshold {
                    let target = i as i64 + mean_idx;
                    if (0..n as i64).contains(&target) {
                        train.add_impulse(target as usize);
                    }
                    past.clear();
                }
            }

            if idx > 0 {
                past.push_back(idx);
            }
            while past.len() > PHASE_HISTORY {
                past.pop_front();
            }
            for p in past.iter_mut() {
                *p -= 1;
            }
        }

        tracker.process(sample);
    }

    log::debug!(
        "Dynamic prediction: period {}, {} beats over {} samples",
        period,
        train.beat_count(),
        n
    );

    if train.beat_count() == 0 {
        log::warn!("Dynamic predictor emitted no beats over {} onset samples", n);
    }

    Ok(train)
}
