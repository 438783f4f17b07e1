//! DSP primitives — offline, whole-buffer audio processing.
//!
//! Every function here takes a complete mono `f64` buffer and returns (or
//! rewrites) a complete buffer. There is no streaming state shared between
//! calls, which keeps renders deterministic for a given random source.

pub mod chorus;
pub mod dynamics;
pub mod envelope;
pub mod filter;
pub mod mixer;
pub mod modulation;
pub mod oscillator;
pub mod renderer;
pub mod reverb;
pub mod sampler;

/// Output and processing sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44100;

/// [`SAMPLE_RATE`] as a float, for coefficient math.
pub const SAMPLE_RATE_F64: f64 = SAMPLE_RATE as f64;

/// Convert milliseconds to a whole number of samples (truncating).
#[inline]
pub fn ms_to_samples(ms: f64) -> usize {
    (ms * SAMPLE_RATE_F64 / 1000.0).max(0.0) as usize
}

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// A single point yields `start`; zero points yield nothing.
pub fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { (end - start) / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| {
        if n > 1 && i == n - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}
