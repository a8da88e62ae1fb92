//! Integration tests for the tempo detection engine

use pulse_dsp::preprocessing::channel_mixer::{to_mono, ChannelMixMode};
use pulse_dsp::{
    analyze_tempo, detect_tempo, detect_tempo_dynamic, detect_tempo_from_onset, samples_to_bpm,
    AnalysisError, AnalysisFlag, BeatPredictorKind, OnsetCurve, TempoConfig,
};

/// Unit clicks every `interval` samples
fn click_track(len: usize, interval: usize) -> Vec<f32> {
    let mut samples = vec![0.0f32; len];
    for i in (0..len).step_by(interval) {
        samples[i] = 1.0;
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_120bpm_click_track() {
        // 0.5 s between clicks at 44 kHz -> 50 onset samples
        let samples = click_track(44000 * 10, 22000);
        let (tempo, beats) = detect_tempo(&samples).expect("Detection should succeed");

        assert!(
            (49..=51).contains(&tempo.period),
            "Winning period should be ~50, got {} ({:.2} BPM)",
            tempo.period,
            tempo.bpm
        );
        assert!((tempo.bpm - samples_to_bpm(tempo.period as f32)).abs() < 1e-4);

        assert_eq!(beats.len(), 1000, "Beat train must match the onset curve length");
        let positions = beats.positions();
        assert!(positions.len() >= 19, "Expected ~20 beats, got {}", positions.len());
        assert!(positions.windows(2).all(|w| w[1] - w[0] == tempo.period));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let samples = click_track(44000 * 6, 26400);
        let a = detect_tempo(&samples).unwrap();
        let b = detect_tempo(&samples).unwrap();
        assert_eq!(a, b);

        let c = detect_tempo_dynamic(&samples).unwrap();
        let d = detect_tempo_dynamic(&samples).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn test_dynamic_agrees_on_tempo() {
        let samples = click_track(44000 * 10, 22000);
        let (static_tempo, _) = detect_tempo(&samples).unwrap();
        let (dynamic_tempo, beats) = detect_tempo_dynamic(&samples).unwrap();

        assert_eq!(static_tempo.period, dynamic_tempo.period);
        assert_eq!(beats.len(), 1000);
        assert!(beats.beat_count() > 0, "Dynamic tracker should emit beats on a steady click track");
    }

    #[test]
    fn test_empty_audio_is_invalid() {
        assert!(matches!(detect_tempo(&[]), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(
            analyze_tempo(&[], 44000, TempoConfig::default()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_audio_shorter_than_window() {
        let samples = vec![0.5f32; 4000];
        assert!(matches!(
            detect_tempo(&samples),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_onset_shorter_than_smallest_period() {
        // 0.3 s -> 30 onset samples, below the 40-sample minimum period
        let samples = click_track(13200, 4400);
        assert!(matches!(
            detect_tempo(&samples),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_tempo_clamped_to_search_range() {
        // Clicks every 5000 samples: ~11.4 onset samples (~528 BPM), far above
        // the range, so the bank settles on a multiple inside [30, 150] BPM.
        let samples = click_track(44000 * 30, 5000);
        let config = TempoConfig {
            min_bpm: 30.0,
            max_bpm: 150.0,
            ..TempoConfig::default()
        };
        let result = analyze_tempo(&samples, 44000, config).unwrap();

        assert!(
            result.bpm >= 30.0 - 1e-3 && result.bpm <= 150.0 + 1e-3,
            "BPM {:.2} should lie in the search range",
            result.bpm
        );
        assert!((40..=200).contains(&result.period));
        assert_eq!(result.metadata.onset_samples, 3000);
        assert_eq!(result.beats.len(), 3000);
    }

    #[test]
    fn test_inverted_range_is_empty_bank() {
        let samples = click_track(44000 * 5, 22000);
        let config = TempoConfig {
            min_bpm: 150.0,
            max_bpm: 30.0,
            ..TempoConfig::default()
        };
        assert!(matches!(
            analyze_tempo(&samples, 44000, config),
            Err(AnalysisError::EmptyBank(_))
        ));
    }

    #[test]
    fn test_silence_is_degenerate() {
        let samples = vec![0.0f32; 44000 * 3];
        let result = analyze_tempo(&samples, 44000, TempoConfig::default()).unwrap();

        assert_eq!(result.period, 40, "Degenerate energy resolves to the shortest period");
        assert!(result.metadata.flags.contains(&AnalysisFlag::DegenerateEnergy));
        assert!(result.metadata.flags.contains(&AnalysisFlag::TempoAtRangeBoundary));
    }

    #[test]
    fn test_resamples_other_rates() {
        // 120 BPM clicks at 48 kHz
        let samples = click_track(48000 * 8, 24000);
        let result = analyze_tempo(&samples, 48000, TempoConfig::default()).unwrap();

        assert!(
            (49..=51).contains(&result.period),
            "Expected ~50 samples after resampling, got {}",
            result.period
        );
        assert_eq!(result.metadata.sample_rate, 48000);
        assert!((result.metadata.duration_seconds - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_tempo_response_collected() {
        let samples = click_track(44000 * 8, 22000);
        let config = TempoConfig {
            collect_tempo_response: true,
            predictor: BeatPredictorKind::Dynamic,
            ..TempoConfig::default()
        };
        let result = analyze_tempo(&samples, 44000, config).unwrap();

        let response = result.metadata.tempo_response.as_ref().expect("Response requested");
        assert_eq!(response.len(), 161);
        let best = response
            .iter()
            .max_by(|a, b| a.energy.partial_cmp(&b.energy).unwrap())
            .unwrap();
        assert_eq!(best.period, result.period);
        assert_eq!(result.metadata.predictor, BeatPredictorKind::Dynamic);
    }

    #[test]
    fn test_from_onset_curve() {
        let values: Vec<f32> = (0..1200).map(|i| if i % 60 == 13 { 1.0 } else { 0.0 }).collect();
        let onset = OnsetCurve::from_values(values);
        let (tempo, beats) = detect_tempo_from_onset(&onset, &TempoConfig::default()).unwrap();

        assert_eq!(tempo.period, 60);
        assert!((tempo.bpm - 100.0).abs() < 1e-3);
        assert_eq!(beats.positions()[0], 13);
        assert!(beats.positions().windows(2).all(|w| w[1] - w[0] == 60));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let samples = click_track(44000 * 6, 19800);
        let par = analyze_tempo(&samples, 44000, TempoConfig::default()).unwrap();
        let seq = analyze_tempo(
            &samples,
            44000,
            TempoConfig {
                parallel: false,
                ..TempoConfig::default()
            },
        )
        .unwrap();

        assert_eq!(par.period, seq.period);
        assert_eq!(par.beats, seq.beats);
    }

    #[test]
    fn test_stereo_mixdown_then_analyze() {
        let mono = click_track(44000 * 10, 22000);
        let interleaved: Vec<f32> = mono.iter().flat_map(|&s| [s, 0.5 * s]).collect();

        let mixed = to_mono(&interleaved, 2, ChannelMixMode::Average).unwrap();
        assert_eq!(mixed.len(), mono.len());

        let result = analyze_tempo(&mixed, 44000, TempoConfig::default()).unwrap();
        let (tempo, _) = detect_tempo(&mono).unwrap();
        assert_eq!(result.period, tempo.period, "Mixdown only scales the clicks");
    }

    #[test]
    fn test_non_finite_audio_rejected_at_any_rate() {
        let mut samples = click_track(44000 * 5, 22000);
        samples[1000] = f32::NAN;
        assert!(matches!(
            analyze_tempo(&samples, 44000, TempoConfig::default()),
            Err(AnalysisError::InvalidInput(_))
        ));

        let mut samples = click_track(48000 * 5, 24000);
        samples[1000] = f32::INFINITY;
        assert!(matches!(
            analyze_tempo(&samples, 48000, TempoConfig::default()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_extreme_slow_tempo_rejected() {
        let samples = click_track(44000 * 5, 22000);
        let config = TempoConfig {
            min_bpm: 1e-37,
            ..TempoConfig::default()
        };
        assert!(matches!(
            analyze_tempo(&samples, 44000, config),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
