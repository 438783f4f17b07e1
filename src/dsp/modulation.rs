//! Lo-fi texture: vinyl surface noise and tape-style pitch warble.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use super::SAMPLE_RATE_F64;

const POPS_PER_SAMPLE: f64 = 0.00008;
const POP_LEVEL: f64 = 0.045;
const HISS_LEVEL: f64 = 0.006;

const WARBLE_RATE_HZ: f64 = 0.5;
const WARBLE_DEPTH_SECONDS: f64 = 0.003;

/// Add vinyl crackle: sparse random pops plus a constant hiss floor.
pub fn vinyl_crackle<R: Rng + ?Sized>(signal: &[f64], rng: &mut R) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut crackle = vec![0.0; n];
    let num_pops = ((n as f64 * POPS_PER_SAMPLE) as usize).max(1);
    for _ in 0..num_pops {
        let idx = rng.gen_range(0..n);
        let amp: f64 = rng.sample(StandardNormal);
        crackle[idx] = amp * POP_LEVEL;
    }

    signal
        .iter()
        .zip(crackle)
        .map(|(&s, c)| {
            let hiss: f64 = rng.sample(StandardNormal);
            s + c + hiss * HISS_LEVEL
        })
        .collect()
}

/// Slow pitch wobble by reading slightly ahead of or behind the playhead.
pub fn pitch_warble(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let last = (n - 1) as i64;
    (0..n)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE_F64;
            let offset = ((2.0 * PI * WARBLE_RATE_HZ * t).sin()
                * WARBLE_DEPTH_SECONDS
                * SAMPLE_RATE_F64) as i64;
            signal[(i as i64 + offset).clamp(0, last) as usize]
        })
        .collect()
}
