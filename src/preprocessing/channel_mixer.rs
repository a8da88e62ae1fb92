//! Channel mixing utilities (interleaved multi-channel to mono)

use serde::{Deserialize, Serialize};

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMixMode {
    /// Average of all channels
    Average,
    /// Keep the first (left) channel only
    First,
}

/// Convert interleaved multi-channel audio to mono
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of channels in the stream
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero
pub fn to_mono(
    interleaved: &[f32],
    channels: usize,
    mode: ChannelMixMode,
) -> Result<Vec<f32>, crate::error::AnalysisError> {
    if channels == 0 {
        return Err(crate::error::AnalysisError::InvalidInput(
            "Invalid channel count: 0".to_string(),
        ));
    }

    log::debug!(
        "Mixing {} interleaved samples ({} channels) to mono using {:?}",
        interleaved.len(),
        channels,
        mode
    );

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    let mono = interleaved
        .chunks_exact(channels)
        .map(|frame| match mode {
            ChannelMixMode::Average => frame.iter().sum::<f32>() / channels as f32,
            ChannelMixMode::First => frame[0],
        })
        .collect();

    Ok(mono)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_average() {
        let stereo = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = to_mono(&stereo, 2, ChannelMixMode::Average).unwrap();
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_first_channel() {
        let stereo = vec![1.0, 0.0, 0.5, 0.25, -1.0, 1.0];
        let mono = to_mono(&stereo, 2, ChannelMixMode::First).unwrap();
        assert_eq!(mono, vec![1.0, 0.5, -1.0]);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let stereo = vec![1.0, 1.0, 0.5];
        let mono = to_mono(&stereo, 2, ChannelMixMode::Average).unwrap();
        assert_eq!(mono.len(), 1);
    }

    #[test]
    fn test_mono_passthrough_and_zero_channels() {
        let samples = vec![0.1, 0.2];
        assert_eq!(to_mono(&samples, 1, ChannelMixMode::Average).unwrap(), samples);
        assert!(to_mono(&samples, 0, ChannelMixMode::Average).is_err());
    }
}
