//! Feature extraction modules
//!
//! This module contains the rhythmic pulse pipeline:
//! - Onset strength extraction (100 Hz curve)
//! - Period estimation (comb filter resonator bank + tempo selection)
//! - Beat prediction (static phase lock, dynamic tracker)

pub mod beat_tracking;
pub mod onset;
pub mod period;
