//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for tempo analysis:
//! - Channel mixing (interleaved multi-channel to mono)
//! - Polyphase resampling (source rate to the 44 kHz analysis rate)

pub mod channel_mixer;
pub mod resample;
