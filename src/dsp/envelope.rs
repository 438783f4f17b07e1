//! Linear envelopes applied to whole buffers.

use super::{linspace, ms_to_samples};

/// Linear fade in/out. Each ramp is capped at half the buffer; buffers
/// shorter than 4 samples are returned unchanged.
pub fn fade(signal: &[f64], in_ms: f64, out_ms: f64) -> Vec<f64> {
    let mut out = signal.to_vec();
    let n = out.len();
    if n < 4 {
        return out;
    }
    let fade_in = ms_to_samples(in_ms).min(n / 2);
    let fade_out = ms_to_samples(out_ms).min(n / 2);
    for (s, g) in out.iter_mut().zip(linspace(0.0, 1.0, fade_in)) {
        *s *= g;
    }
    for (s, g) in out[n - fade_out..].iter_mut().zip(linspace(1.0, 0.0, fade_out)) {
        *s *= g;
    }
    out
}

/// Attack/release envelope with a flat sustain between the ramps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackRelease {
    /// Attack time in seconds.
    pub attack: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl AttackRelease {
    pub fn new(attack: f64, release: f64) -> Self {
        AttackRelease { attack, release }
    }

    /// Gain curve of `n` samples: ramps 0→1 over the attack, holds at 1, then
    /// scales by a 1→0 ramp over the release. Both ramps are at least one
    /// sample and never longer than the buffer.
    pub fn curve(&self, n: usize) -> Vec<f64> {
        let mut env = vec![1.0; n];
        let attack_len = ms_to_samples(self.attack * 1000.0).max(1).min(n);
        for (e, g) in env.iter_mut().zip(linspace(0.0, 1.0, attack_len)) {
            *e = g;
        }
        let release_len = ms_to_samples(self.release * 1000.0).max(1).min(n);
        for (e, g) in env[n - release_len..]
            .iter_mut()
            .zip(linspace(1.0, 0.0, release_len))
        {
            *e *= g;
        }
        env
    }

    /// Apply the envelope to a buffer in place.
    pub fn apply(&self, signal: &mut [f64]) {
        let env = self.curve(signal.len());
        for (s, e) in signal.iter_mut().zip(env) {
            *s *= e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_skips_tiny_buffers() {
        assert_eq!(fade(&[1.0, 1.0, 1.0], 4.0, 16.0), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn fade_ramps_both_ends() {
        let out = fade(&vec![1.0; 4410], 3.0, 20.0);
        assert_eq!(out[0], 0.0);
        assert_eq!(*out.last().unwrap(), 0.0);
        assert_eq!(out[2205], 1.0);
        // 3 ms = 132 samples of fade-in
        assert!(out[131] > 0.99 && out[130] < 1.0);
    }

    #[test]
    fn fade_is_capped_at_half() {
        let out = fade(&vec![1.0; 10], 1000.0, 1000.0);
        assert_eq!(out.len(), 10);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[9], 0.0);
        assert!(out.iter().all(|&s| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn attack_release_shape() {
        let env = AttackRelease::new(0.01, 0.1).curve(44100);
        assert_eq!(env[0], 0.0);
        assert_eq!(env[440], 1.0);
        assert_eq!(env[20000], 1.0);
        assert_eq!(*env.last().unwrap(), 0.0);
        assert!(env.iter().all(|&e| (0.0..=1.0).contains(&e)));
    }

    #[test]
    fn attack_release_short_buffer() {
        let env = AttackRelease::new(0.01, 0.5).curve(100);
        assert_eq!(env.len(), 100);
        assert!(env.iter().all(|e| e.is_finite()));
        assert_eq!(env[99], 0.0);
    }
}
