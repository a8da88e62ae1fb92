//! Example: Detect the tempo of a synthetic click track
//!
//! Usage:
//!   cargo run --release --example detect_click_track -- [BPM] [--dynamic]

use pulse_dsp::preprocessing::channel_mixer::{to_mono, ChannelMixMode};
use pulse_dsp::{analyze_tempo, TempoConfig, ANALYSIS_SAMPLE_RATE};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let bpm: f32 = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| a.parse::<f32>())
        .transpose()?
        .unwrap_or(120.0);
    let dynamic = args.iter().any(|a| a == "--dynamic");

    // 20 seconds of interleaved stereo clicks, quieter on the right
    let sample_rate = ANALYSIS_SAMPLE_RATE;
    let interval = (60.0 / bpm * sample_rate as f32).round() as usize;
    let frames = sample_rate as usize * 20;
    let mut interleaved = vec![0.0f32; frames * 2];
    for frame in (0..frames).step_by(interval.max(1)) {
        interleaved[frame * 2] = 1.0;
        interleaved[frame * 2 + 1] = 0.5;
    }

    let samples = to_mono(&interleaved, 2, ChannelMixMode::Average)?;

    let config = if dynamic {
        TempoConfig::dynamic()
    } else {
        TempoConfig::default()
    };

    let result = analyze_tempo(&samples, sample_rate, config)?;

    println!("Analysis Results:");
    println!("  Input tempo: {:.2} BPM", bpm);
    println!("  Detected: {:.2} BPM (period {} samples, alpha {:.3})", result.bpm, result.period, result.alpha);
    println!("  Beats: {} ({:?})", result.beats.beat_count(), result.metadata.predictor);
    println!("  First beats (s): {:?}", result.beat_times().iter().take(8).collect::<Vec<_>>());
    println!("  Flags: {:?}", result.metadata.flags);
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);

    Ok(())
}
