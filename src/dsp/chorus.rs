//! Chorus effect — LFO-modulated short delay for thickening the mix.
//!
//! Reads the buffer at a slowly swinging offset behind the write position
//! and blends that with the dry signal.

use std::f64::consts::PI;

use super::SAMPLE_RATE_F64;

/// A mono chorus with configurable rate, depth, base delay and mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chorus {
    /// LFO rate in Hz.
    pub rate: f64,
    /// Modulation depth in seconds.
    pub depth: f64,
    /// Base delay time in seconds.
    pub delay: f64,
    /// Wet share (0.0 = fully dry, 1.0 = fully wet).
    pub mix: f64,
}

impl Default for Chorus {
    fn default() -> Self {
        Chorus {
            rate: 1.5,
            depth: 0.002,
            delay: 0.01,
            mix: 0.3,
        }
    }
}

impl Chorus {
    /// Delay in whole samples at sample index `i`, clamped to [1, n-1].
    #[inline]
    fn delay_at(&self, i: usize, n: usize) -> usize {
        let t = i as f64 / SAMPLE_RATE_F64;
        let lfo = (2.0 * PI * self.rate * t).sin() * self.depth * SAMPLE_RATE_F64;
        let d = (lfo + self.delay * SAMPLE_RATE_F64) as i64;
        d.clamp(1, (n as i64 - 1).max(1)) as usize
    }

    /// Process a whole buffer. Buffers under 2 samples pass through.
    pub fn process_buffer(&self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n < 2 {
            return signal.to_vec();
        }
        (0..n)
            .map(|i| {
                let wet = signal[i.saturating_sub(self.delay_at(i, n))];
                signal[i] * (1.0 - self.mix) + wet * self.mix
            })
            .collect()
    }
}
