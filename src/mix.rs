//! Mix & master — stem balance, tone shaping, DNA effects, sidechain pump
//! and the master bus.

use rand::Rng;

use crate::dna::{Dna, EffectType};
use crate::dsp::chorus::Chorus;
use crate::dsp::dynamics::{
    DEFAULT_LOW_END_RATIO, fit_rms, limit, normalize_peak, rebalance_low_end, remove_dc,
    soft_clip,
};
use crate::dsp::filter::{bandpass, dark_tone_shape, highpass};
use crate::dsp::linspace;
use crate::dsp::mixer::Mixer;
use crate::dsp::modulation::{pitch_warble, vinyl_crackle};
use crate::dsp::reverb::{delay, reverb};
use crate::stems::beats_to_samples;

const BASS_MIX_GAIN: f64 = 0.68;
const MELODY_MIX_GAIN: f64 = 1.25;

const SIDECHAIN_HARD_DEPTH: f64 = 0.55;
const SIDECHAIN_LIGHT_DEPTH: f64 = 0.32;

const MASTER_RMS: f64 = 0.19;
const MASTER_CEILING: f64 = 0.92;

/// The five rendered instrument layers, all of the render length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stems {
    pub drums: Vec<f64>,
    pub bass: Vec<f64>,
    pub cowbell: Vec<f64>,
    pub vocals: Vec<f64>,
    pub melody: Vec<f64>,
}

impl Stems {
    /// Filter each stem into its band and bring it to a fixed loudness so
    /// no layer (the 808 above all) masks the rest.
    pub fn balanced(&self) -> Stems {
        Stems {
            drums: fit_rms(&highpass(&self.drums, 35.0), 0.2),
            bass: fit_rms(&bandpass(&self.bass, 26.0, 190.0), 0.08),
            cowbell: fit_rms(&highpass(&self.cowbell, 650.0), 0.03),
            vocals: fit_rms(&highpass(&self.vocals, 170.0), 0.065),
            melody: fit_rms(&highpass(&self.melody, 140.0), 0.085),
        }
    }

    /// Weighted sum of all stems.
    pub fn sum(&self) -> Vec<f64> {
        let mut mixer = Mixer::new(self.drums.len());
        mixer.add(&self.drums, 1.0);
        mixer.add(&self.bass, BASS_MIX_GAIN);
        mixer.add(&self.cowbell, 1.0);
        mixer.add(&self.vocals, 1.0);
        mixer.add(&self.melody, MELODY_MIX_GAIN);
        mixer.into_output()
    }
}

/// Apply one DNA effect to the full mix. Sidechain entries are handled
/// separately by [`apply_sidechain`].
pub fn apply_effect<R: Rng>(signal: &[f64], effect: EffectType, rng: &mut R) -> Vec<f64> {
    match effect {
        EffectType::DistortionHeavy => soft_clip(signal, 0.65),
        EffectType::DistortionLight => soft_clip(signal, 0.28),
        EffectType::ReverbHall => reverb(signal, 0.5, 65.0),
        EffectType::ReverbLight => reverb(signal, 0.25, 36.0),
        EffectType::VinylCrackle => vinyl_crackle(signal, rng),
        EffectType::PitchShift => pitch_warble(signal),
        EffectType::Delay => delay(signal, 270.0, 0.28),
        EffectType::Chorus => Chorus::default().process_buffer(signal),
        EffectType::SidechainHard | EffectType::SidechainLight => signal.to_vec(),
    }
}

/// Run the DNA effects in list order.
pub fn apply_effects<R: Rng>(signal: &[f64], effects: &[EffectType], rng: &mut R) -> Vec<f64> {
    effects
        .iter()
        .fold(signal.to_vec(), |acc, &effect| apply_effect(&acc, effect, rng))
}

/// Ducking depth for the DNA's sidechain effect, if any. Hard wins.
pub fn sidechain_depth(effects: &[EffectType]) -> Option<f64> {
    if effects.contains(&EffectType::SidechainHard) {
        Some(SIDECHAIN_HARD_DEPTH)
    } else if effects.contains(&EffectType::SidechainLight) {
        Some(SIDECHAIN_LIGHT_DEPTH)
    } else {
        None
    }
}

/// Pump the mix on every beat: a linear ramp from `1 - depth` back to
/// unity over the first third of the beat.
pub fn apply_sidechain(signal: &[f64], effects: &[EffectType], tempo: i32) -> Vec<f64> {
    let Some(depth) = sidechain_depth(effects) else {
        return signal.to_vec();
    };
    let n = signal.len();
    let beat = beats_to_samples(1.0, tempo).max(1);
    let mut out = signal.to_vec();
    let mut pos = 0;
    while pos < n {
        let duck_len = (beat / 3).max(1).min(n - pos);
        for (s, g) in out[pos..pos + duck_len]
            .iter_mut()
            .zip(linspace(1.0 - depth, 1.0, duck_len))
        {
            *s *= g;
        }
        pos += beat;
    }
    out
}

/// Master bus: DC removal, loudness, saturation, limiter, peak normalize.
pub fn master(signal: &[f64], drive: f64) -> Vec<f64> {
    let out = remove_dc(signal);
    let out = fit_rms(&out, MASTER_RMS);
    let out = soft_clip(&out, 0.1 + drive * 0.35);
    let out = limit(&out, MASTER_CEILING);
    normalize_peak(&out, MASTER_CEILING)
}

/// Full chain from raw stems to the mastered loop.
pub fn mix_and_master<R: Rng>(stems: &Stems, dna: &Dna, tempo: i32, rng: &mut R) -> Vec<f64> {
    let mix = stems.balanced().sum();
    let mix = dark_tone_shape(&mix, dna.darkness);
    let mix = rebalance_low_end(&mix, DEFAULT_LOW_END_RATIO);
    let mix = apply_effects(&mix, &dna.effects, rng);
    let mix = apply_sidechain(&mix, &dna.effects, tempo);
    let mix = highpass(&mix, 24.0);
    master(&mix, dna.distortion_drive)
}
