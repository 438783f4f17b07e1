//! Agent DNA — the bounded parameter vector that defines a track's style.
//!
//! These types map directly to the flat JSON document stored per agent.
//! Optional keys fall back to documented defaults; the core fields must be
//! present.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};

/// Tempo bounds in BPM.
pub const TEMPO_MIN: i32 = 88;
pub const TEMPO_MAX: i32 = 160;

/// Vocal pitch-down bounds in semitones.
pub const PITCH_DOWN_MIN: i32 = -8;
pub const PITCH_DOWN_MAX: i32 = -1;

/// Maximum number of simultaneous effects on one DNA.
pub const MAX_EFFECTS: usize = 4;

// ── Categorical controls ────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocalChopStyle {
    Aggressive,
    Memphis,
    Minimal,
    Dark,
    Melodic,
}

impl VocalChopStyle {
    pub const ALL: [VocalChopStyle; 5] = [
        VocalChopStyle::Aggressive,
        VocalChopStyle::Memphis,
        VocalChopStyle::Minimal,
        VocalChopStyle::Dark,
        VocalChopStyle::Melodic,
    ];

    /// Serialized name, also used as the vocal sample keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            VocalChopStyle::Aggressive => "aggressive",
            VocalChopStyle::Memphis => "memphis",
            VocalChopStyle::Minimal => "minimal",
            VocalChopStyle::Dark => "dark",
            VocalChopStyle::Melodic => "melodic",
        }
    }
}

/// Master effects an agent can stack on its mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    DistortionHeavy,
    DistortionLight,
    SidechainHard,
    SidechainLight,
    ReverbHall,
    ReverbLight,
    VinylCrackle,
    /// Slow pitch warble (tape wobble), not a transposition.
    PitchShift,
    Chorus,
    Delay,
}

impl EffectType {
    pub const ALL: [EffectType; 10] = [
        EffectType::DistortionHeavy,
        EffectType::DistortionLight,
        EffectType::SidechainHard,
        EffectType::SidechainLight,
        EffectType::ReverbHall,
        EffectType::ReverbLight,
        EffectType::VinylCrackle,
        EffectType::PitchShift,
        EffectType::Chorus,
        EffectType::Delay,
    ];
}

// ── DNA ─────────────────────────────────────────────────────

/// The mutable parameter set that defines an agent's music style.
///
/// Values outside their declared domain are accepted as-is; every DSP or
/// mutation step that consumes a field clamps it locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dna {
    /// 0.0 - 1.0
    pub bass_intensity: f64,
    /// 0.0 - 1.0
    pub cowbell_frequency: f64,
    pub vocal_chop_style: VocalChopStyle,
    /// BPM, 88 - 160
    pub tempo: i32,
    /// 0.0 - 1.0
    pub melody_complexity: f64,
    /// Ordered, 1 - 4 distinct entries.
    pub effects: Vec<EffectType>,
    #[serde(default = "defaults::hi_hat_density")]
    pub hi_hat_density: f64,
    #[serde(default)]
    pub swing: f64,
    /// How much sample selection varies between hits.
    #[serde(default = "defaults::sample_variation")]
    pub sample_variation: f64,
    /// Source pool selector: core / any / custom pack names.
    #[serde(default = "defaults::sample_pack")]
    pub sample_pack: String,
    /// Stylistic melody blueprint id, see [`crate::profile`].
    #[serde(default = "defaults::melody_profile")]
    pub melody_profile: String,
    /// Chance of an 808 glide into the next bar's note.
    #[serde(default = "defaults::glide_probability")]
    pub glide_probability: f64,
    /// Tonal darkness (high cut + low focus).
    #[serde(default = "defaults::darkness")]
    pub darkness: f64,
    /// Saturation/clip drive.
    #[serde(default = "defaults::distortion_drive")]
    pub distortion_drive: f64,
    /// Semitones, -8 to -1.
    #[serde(default = "defaults::vocal_pitch_down")]
    pub vocal_pitch_down: i32,
}

mod defaults {
    pub fn hi_hat_density() -> f64 {
        0.5
    }
    pub fn sample_variation() -> f64 {
        0.5
    }
    pub fn sample_pack() -> String {
        "core".to_string()
    }
    pub fn melody_profile() -> String {
        crate::profile::DEFAULT_PROFILE.to_string()
    }
    pub fn glide_probability() -> f64 {
        0.3
    }
    pub fn darkness() -> f64 {
        0.7
    }
    pub fn distortion_drive() -> f64 {
        0.6
    }
    pub fn vocal_pitch_down() -> i32 {
        -4
    }
}

impl Default for Dna {
    fn default() -> Self {
        Dna {
            bass_intensity: 0.5,
            cowbell_frequency: 0.5,
            vocal_chop_style: VocalChopStyle::Memphis,
            tempo: 140,
            melody_complexity: 0.5,
            effects: vec![EffectType::ReverbLight],
            hi_hat_density: defaults::hi_hat_density(),
            swing: 0.0,
            sample_variation: defaults::sample_variation(),
            sample_pack: defaults::sample_pack(),
            melody_profile: defaults::melody_profile(),
            glide_probability: defaults::glide_probability(),
            darkness: defaults::darkness(),
            distortion_drive: defaults::distortion_drive(),
            vocal_pitch_down: defaults::vocal_pitch_down(),
        }
    }
}

impl Dna {
    /// Parse a DNA document. Malformed JSON surfaces as [`ArenaError::Json`];
    /// a well-formed document with missing or mistyped fields as
    /// [`ArenaError::InvalidDna`].
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(classify_error)
    }

    /// Convert an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(classify_error)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Flat key → value view, used for per-field diffs.
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

fn classify_error(e: serde_json::Error) -> ArenaError {
    match e.classify() {
        serde_json::error::Category::Data => ArenaError::InvalidDna(e.to_string()),
        _ => ArenaError::Json(e),
    }
}
