//! Level and dynamics processing: saturation, limiting, loudness fitting.

use super::filter::lowpass;

/// Below this RMS a buffer is treated as silence.
const SILENCE_RMS: f64 = 1e-9;

/// Soft clipper using tanh. `drive` in [0, 1] scales pre-gain from 1x to 5x.
pub fn soft_clip(signal: &[f64], drive: f64) -> Vec<f64> {
    let gain = 1.0 + drive.clamp(0.0, 1.0) * 4.0;
    signal.iter().map(|&s| (s * gain).tanh()).collect()
}

/// Brick-wall limiter: hard clamp to ±threshold (threshold in [0.5, 0.99]).
pub fn limit(signal: &[f64], threshold: f64) -> Vec<f64> {
    let t = threshold.clamp(0.5, 0.99);
    signal.iter().map(|&s| s.clamp(-t, t)).collect()
}

/// Root-mean-square level. Empty buffers are silent.
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let sum: f64 = signal.iter().map(|s| s * s).sum();
    (sum / signal.len() as f64).sqrt()
}

/// Scale a buffer so its RMS equals `target_rms`. Silence is left untouched.
pub fn fit_rms(signal: &[f64], target_rms: f64) -> Vec<f64> {
    let current = rms(signal);
    if current < SILENCE_RMS {
        return signal.to_vec();
    }
    let gain = target_rms / current;
    signal.iter().map(|&s| s * gain).collect()
}

/// Scale so the largest absolute sample equals `target`.
pub fn normalize_peak(signal: &[f64], target: f64) -> Vec<f64> {
    let peak = signal.iter().fold(0.0_f64, |m, &s| m.max(s.abs()));
    if peak <= 0.0 {
        return signal.to_vec();
    }
    signal.iter().map(|&s| s / peak * target).collect()
}

/// Subtract the mean.
pub fn remove_dc(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    signal.iter().map(|&s| s - mean).collect()
}

/// Crossover for [`rebalance_low_end`].
pub const LOW_END_SPLIT_HZ: f64 = 120.0;
/// Default maximum low-band share of the mix.
pub const DEFAULT_LOW_END_RATIO: f64 = 0.46;

fn split_low_end(signal: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let low = lowpass(signal, LOW_END_SPLIT_HZ);
    let high: Vec<f64> = signal.iter().zip(&low).map(|(s, l)| s - l).collect();
    (low, high)
}

/// Low-band share `RMS(low) / (RMS(low) + RMS(high))` of a buffer.
pub fn low_end_ratio(signal: &[f64]) -> f64 {
    let (low, high) = split_low_end(signal);
    let (low_rms, high_rms) = (rms(&low), rms(&high));
    low_rms / (low_rms + high_rms + SILENCE_RMS)
}

/// Keep the sub-120 Hz share under `target_ratio` so the 808 does not mask
/// the rest of the mix. Buffers already under the target come back unchanged.
pub fn rebalance_low_end(signal: &[f64], target_ratio: f64) -> Vec<f64> {
    let ratio = low_end_ratio(signal);
    if ratio <= target_ratio {
        return signal.to_vec();
    }
    let (low, high) = split_low_end(signal);
    let scale = target_ratio / ratio.max(SILENCE_RMS);
    low.iter().zip(&high).map(|(l, h)| l * scale + h).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::SAMPLE_RATE_F64;
    use std::f64::consts::PI;

    fn sine(freq: f64, amp: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| amp * (2.0 * PI * freq * i as f64 / SAMPLE_RATE_F64).sin())
            .collect()
    }

    #[test]
    fn soft_clip_bounded() {
        let out = soft_clip(&[100.0, -100.0, 0.0], 1.0);
        assert!(out.iter().all(|s| s.abs() <= 1.0));
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn soft_clip_drive_is_clamped() {
        let a = soft_clip(&[0.2], 3.0);
        let b = soft_clip(&[0.2], 1.0);
        assert_eq!(a, b);
        assert!((soft_clip(&[0.2], -1.0)[0] - 0.2_f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn limiter_threshold_is_clamped() {
        let out = limit(&[2.0, -2.0, 0.3], 1.5);
        assert_eq!(out, vec![0.99, -0.99, 0.3]);
        let low = limit(&[0.7], 0.1);
        assert_eq!(low, vec![0.5]);
    }

    #[test]
    fn rms_of_empty_and_constant() {
        assert_eq!(rms(&[]), 0.0);
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fit_rms_hits_target() {
        let out = fit_rms(&sine(220.0, 0.8, 4410), 0.19);
        assert!((rms(&out) - 0.19).abs() < 1e-9);
    }

    #[test]
    fn fit_rms_is_idempotent_at_target() {
        let first = fit_rms(&sine(220.0, 0.8, 4410), 0.2);
        let second = fit_rms(&first, 0.2);
        for (a, b) in first.iter().zip(&second) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn fit_rms_leaves_silence() {
        let silent = vec![0.0; 128];
        assert_eq!(fit_rms(&silent, 0.2), silent);
    }

    #[test]
    fn normalize_peak_targets_max() {
        let out = normalize_peak(&[0.1, -0.4, 0.2], 0.92);
        assert!((out[1] + 0.92).abs() < 1e-12);
        assert_eq!(normalize_peak(&[0.0; 4], 0.92), vec![0.0; 4]);
    }

    #[test]
    fn remove_dc_centers_signal() {
        let out = remove_dc(&[1.0, 2.0, 3.0]);
        assert_eq!(out, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn rebalance_is_noop_when_under_target() {
        let bright = sine(4000.0, 0.5, 8820);
        assert!(low_end_ratio(&bright) <= DEFAULT_LOW_END_RATIO);
        assert_eq!(rebalance_low_end(&bright, DEFAULT_LOW_END_RATIO), bright);
    }

    #[test]
    fn rebalance_reduces_heavy_low_end() {
        let heavy: Vec<f64> = sine(50.0, 0.9, 22050)
            .iter()
            .zip(sine(3000.0, 0.05, 22050))
            .map(|(a, b)| a + b)
            .collect();
        let before = low_end_ratio(&heavy);
        assert!(before > DEFAULT_LOW_END_RATIO);
        let out = rebalance_low_end(&heavy, DEFAULT_LOW_END_RATIO);
        assert!(rms(&out) < rms(&heavy));
    }
}
