//! One-pole IIR filters.
//!
//! Single-tap recurrences with the coefficient derived from the RC time
//! constant of the cutoff. Gentle 6 dB/octave slopes are all the mix chain
//! needs for rumble removal, band-limiting and tone tilt.

use std::f64::consts::PI;

use super::SAMPLE_RATE_F64;

/// Filter type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    Lowpass,
    Highpass,
}

/// A one-pole filter with its running state.
#[derive(Debug, Clone)]
pub struct OnePole {
    pub filter_type: FilterType,
    /// Cutoff in Hz after clamping.
    pub frequency: f64,
    alpha: f64,

    prev_x: f64,
    prev_y: f64,
}

impl OnePole {
    pub fn new(filter_type: FilterType, cutoff_hz: f64, sample_rate: f64) -> Self {
        let frequency = match filter_type {
            FilterType::Lowpass => cutoff_hz.clamp(30.0, sample_rate * 0.45),
            FilterType::Highpass => cutoff_hz.clamp(20.0, sample_rate * 0.45),
        };
        let rc = 1.0 / (2.0 * PI * frequency);
        let dt = 1.0 / sample_rate;
        let alpha = match filter_type {
            FilterType::Lowpass => dt / (rc + dt),
            FilterType::Highpass => rc / (rc + dt),
        };
        OnePole {
            filter_type,
            frequency,
            alpha,
            prev_x: 0.0,
            prev_y: 0.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Process a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = match self.filter_type {
            FilterType::Lowpass => self.alpha * input + (1.0 - self.alpha) * self.prev_y,
            FilterType::Highpass => self.alpha * (self.prev_y + input - self.prev_x),
        };
        self.prev_x = input;
        self.prev_y = output;
        output
    }

    /// Filter a whole buffer from a cleared state.
    pub fn process_buffer(&mut self, signal: &[f64]) -> Vec<f64> {
        self.reset();
        signal.iter().map(|&x| self.process(x)).collect()
    }

    /// Reset filter state.
    pub fn reset(&mut self) {
        self.prev_x = 0.0;
        self.prev_y = 0.0;
    }
}

/// Low-pass a buffer at `cutoff_hz` (clamped to [30, 0.45·sr]).
pub fn lowpass(signal: &[f64], cutoff_hz: f64) -> Vec<f64> {
    OnePole::new(FilterType::Lowpass, cutoff_hz, SAMPLE_RATE_F64).process_buffer(signal)
}

/// High-pass a buffer at `cutoff_hz` (clamped to [20, 0.45·sr]).
pub fn highpass(signal: &[f64], cutoff_hz: f64) -> Vec<f64> {
    OnePole::new(FilterType::Highpass, cutoff_hz, SAMPLE_RATE_F64).process_buffer(signal)
}

/// High-pass then low-pass: keeps roughly `[low_hz, high_hz]`.
pub fn bandpass(signal: &[f64], low_hz: f64, high_hz: f64) -> Vec<f64> {
    lowpass(&highpass(signal, low_hz), high_hz)
}

/// Darkness tilt without fully killing the highs.
///
/// Blends a low-passed body (cutoff falls with darkness), the dry signal,
/// a small sub boost and a touch of presence.
pub fn dark_tone_shape(signal: &[f64], darkness: f64) -> Vec<f64> {
    let darkness = darkness.clamp(0.0, 1.0);
    let cutoff = 12000.0 - darkness * 3800.0;
    let body = lowpass(signal, cutoff);
    let sub = lowpass(signal, 130.0);
    let presence = highpass(signal, 1800.0);
    let sub_gain = 0.02 + darkness * 0.045;
    signal
        .iter()
        .enumerate()
        .map(|(i, &x)| body[i] * 0.86 + x * 0.2 + sub[i] * sub_gain + presence[i] * 0.06)
        .collect()
}
