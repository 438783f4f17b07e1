//! Mixer — places one-shots into a timeline buffer and sums stems.

/// Add `layer * gain` into `buffer` starting at `position`. Anything past
/// the end of `buffer` is dropped.
pub fn overlay(buffer: &mut [f64], layer: &[f64], position: usize, gain: f64) {
    if position >= buffer.len() {
        return;
    }
    for (out, &s) in buffer[position..].iter_mut().zip(layer) {
        *out += s * gain;
    }
}

/// A simple summing mixer that accumulates whole stems with per-stem gain.
#[derive(Debug, Clone)]
pub struct Mixer {
    buffer: Vec<f64>,
}

impl Mixer {
    /// A silent mix bus of `num_samples`.
    pub fn new(num_samples: usize) -> Self {
        Mixer {
            buffer: vec![0.0; num_samples],
        }
    }

    /// Sum a stem at unity position with the given gain.
    pub fn add(&mut self, stem: &[f64], gain: f64) {
        overlay(&mut self.buffer, stem, 0, gain);
    }

    /// Take the summed bus.
    pub fn into_output(self) -> Vec<f64> {
        self.buffer
    }
}
