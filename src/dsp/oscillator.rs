//! 808 bass oscillator with harmonic body and optional pitch glide.

use std::f64::consts::PI;

use super::dynamics::{limit, soft_clip};
use super::envelope::AttackRelease;
use super::{SAMPLE_RATE_F64, linspace, ms_to_samples};

/// Lowest frequency the oscillator will play.
const MIN_FREQ_HZ: f64 = 25.0;
/// Shortest glide, in samples.
const MIN_GLIDE_SAMPLES: usize = 64;
const ATTACK_SECONDS: f64 = 0.01;

/// Relative levels of the fundamental, 2nd and 3rd harmonic.
const HARMONICS: [(f64, f64); 3] = [(1.0, 1.0), (2.0, 0.26), (3.0, 0.1)];

/// Parameters for one sustained 808 note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note808 {
    pub freq: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Soft-clip drive in [0, 1].
    pub distortion: f64,
    /// Release time in seconds.
    pub release: f64,
    /// Target frequency for a glide over the note's tail.
    pub glide_to: Option<f64>,
    pub glide_ms: f64,
}

impl Note808 {
    pub fn new(freq: f64, duration: f64) -> Self {
        Note808 {
            freq,
            duration,
            distortion: 0.3,
            release: 0.3,
            glide_to: None,
            glide_ms: 100.0,
        }
    }

    /// Per-sample frequency: flat at `freq`, then a linear slide to
    /// `glide_to` over the final `glide_ms` (at least 64 samples).
    pub fn frequency_curve(&self, n: usize) -> Vec<f64> {
        let base = self.freq.max(MIN_FREQ_HZ);
        let mut curve = vec![base; n];
        if let Some(target) = self.glide_to {
            let glide_len = ms_to_samples(self.glide_ms).max(MIN_GLIDE_SAMPLES);
            let start = n.saturating_sub(glide_len);
            let from = curve[start.min(n.saturating_sub(1))];
            for (f, v) in curve[start..]
                .iter_mut()
                .zip(linspace(from, target.max(MIN_FREQ_HZ), n - start))
            {
                *f = v;
            }
        }
        curve
    }

    /// Render the note: harmonic sine stack, attack/release envelope, then
    /// the bus waveshaper and clipper.
    pub fn render(&self) -> Vec<f64> {
        let n = ((self.duration * SAMPLE_RATE_F64).max(0.0) as usize).max(1);
        let curve = self.frequency_curve(n);

        let mut phase = 0.0;
        let mut signal: Vec<f64> = curve
            .iter()
            .map(|&f| {
                phase += 2.0 * PI * f / SAMPLE_RATE_F64;
                HARMONICS
                    .iter()
                    .map(|&(mult, level)| level * (phase * mult).sin())
                    .sum()
            })
            .collect();

        AttackRelease::new(ATTACK_SECONDS, self.release).apply(&mut signal);
        limit(&soft_clip(&signal, self.distortion), 0.97)
    }
}
