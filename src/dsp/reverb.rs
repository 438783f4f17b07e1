//! Echo-based space effects.
//!
//! Both the short room "reverb" and the tempo-free delay are built from the
//! same thing: the dry signal plus three decaying copies at integer
//! multiples of a base delay.

use super::ms_to_samples;

const ECHO_TAPS: i32 = 3;

/// Dry signal plus `ECHO_TAPS` echoes at `i * delay_samples`, each scaled
/// by `gain^i`.
pub fn echoes(signal: &[f64], delay_samples: usize, gain: f64) -> Vec<f64> {
    let mut out = signal.to_vec();
    let n = signal.len();
    for i in 1..=ECHO_TAPS {
        let offset = delay_samples * i as usize;
        if offset >= n {
            break;
        }
        let g = gain.powi(i);
        for (o, &s) in out[offset..].iter_mut().zip(&signal[..n - offset]) {
            *o += s * g;
        }
    }
    out
}

/// Short room reverb: early echoes every `delay_ms`.
pub fn reverb(signal: &[f64], decay: f64, delay_ms: f64) -> Vec<f64> {
    echoes(signal, ms_to_samples(delay_ms), decay)
}

/// Slapback/echo delay.
pub fn delay(signal: &[f64], delay_ms: f64, feedback: f64) -> Vec<f64> {
    echoes(signal, ms_to_samples(delay_ms), feedback)
}
