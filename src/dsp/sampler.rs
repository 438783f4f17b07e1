//! Sample playback helpers: interpolated reads and resampling pitch shift.
//!
//! Pitch shifting here is classic sample-rate shifting: the buffer is read
//! at a different rate, so pitch and duration change together.

/// Shortest buffer a pitch shift will produce.
const MIN_SHIFTED_LEN: usize = 32;

/// Read a sample with linear interpolation at a fractional position.
///
/// Positions before the start read as silence; positions at or past the
/// last sample hold the last value.
pub fn read_interpolated(data: &[f64], position: f64) -> f64 {
    if data.is_empty() || position < 0.0 {
        return 0.0;
    }

    let idx = position as usize;
    if idx >= data.len() - 1 {
        return data[data.len() - 1];
    }

    let frac = position - idx as f64;
    data[idx] * (1.0 - frac) + data[idx + 1] * frac
}

/// Playback-rate ratio for a shift of `semitones`.
#[inline]
pub fn semitone_ratio(semitones: i32) -> f64 {
    2.0_f64.powf(semitones as f64 / 12.0)
}

/// Resample to `len / 2^(semitones/12)` samples (at least 32) by linear
/// interpolation over evenly spaced positions spanning the original.
/// Buffers under 4 samples, or a shift of 0, are copied unchanged.
pub fn pitch_shift(signal: &[f64], semitones: i32) -> Vec<f64> {
    if signal.len() < 4 || semitones == 0 {
        return signal.to_vec();
    }
    let ratio = semitone_ratio(semitones);
    let new_len = ((signal.len() as f64 / ratio) as usize).max(MIN_SHIFTED_LEN);
    let last = (signal.len() - 1) as f64;
    super::linspace(0.0, last, new_len)
        .map(|pos| read_interpolated(signal, pos))
        .collect()
}
