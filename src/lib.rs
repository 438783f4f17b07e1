pub mod agent;
pub mod battle;
pub mod config;
pub mod dna;
pub mod dsp;
pub mod error;
pub mod events;
pub mod evolution;
pub mod generator;
pub mod library;
pub mod mix;
pub mod profile;
pub mod stems;

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

pub use crate::agent::{Agent, AgentStats};
pub use crate::battle::{Battle, BattleEntry, BattleResults};
pub use crate::config::GeneratorConfig;
pub use crate::dna::{Dna, EffectType, VocalChopStyle};
pub use crate::error::{ArenaError, BattleError, Result};
pub use crate::events::{EventLog, TrackEvent};
pub use crate::evolution::{EvolutionReport, evolve_after_battle, mutate_dna};
pub use crate::generator::{RenderRequest, TrackGenerator};
pub use crate::library::{MemoryLibrary, PackLibrary, SampleCategory, SampleLibrary};

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Agents after a round, plus what changed for each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRound {
    pub agents: Vec<Agent>,
    pub reports: Vec<EvolutionReport>,
}

/// Mutate a DNA document with a seeded random source.
pub fn mutate_dna_json_seeded(dna_json: &str, magnitude: f64, seed: u64) -> Result<String> {
    let dna = Dna::from_json(dna_json)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    mutate_dna(&dna, magnitude, &mut rng).to_json()
}

/// Run one evolution round with a seeded random source.
pub fn evolve_round(mut agents: Vec<Agent>, results: &BattleResults, seed: u64) -> EvolutionRound {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let reports = evolve_after_battle(&mut agents, results, &mut rng);
    EvolutionRound { agents, reports }
}

/// Render a DNA document without any sample library: only the 808 and
/// other synthesized layers sound.
pub fn render_dna_standalone(dna_json: &str, duration: f64, seed: u64) -> Result<Vec<f64>> {
    let dna = Dna::from_json(dna_json)?;
    let generator = TrackGenerator::new(Arc::new(MemoryLibrary::new()));
    Ok(generator.render_track(&dna, duration, Some(seed)))
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the phonkarena-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: mutate a DNA JSON document, returning the new DNA as JSON.
#[wasm_bindgen]
pub fn mutate_dna_json(dna_json: &str, magnitude: f64, seed: u64) -> Result<String, JsValue> {
    mutate_dna_json_seeded(dna_json, magnitude, seed).map_err(js_error)
}

/// WASM-exposed: evolve an agent array against a `{agent_id: likes}` object.
/// Returns `{ agents, reports }`.
#[wasm_bindgen]
pub fn evolve_round_json(agents: JsValue, results: JsValue, seed: u64) -> Result<JsValue, JsValue> {
    let agents: Vec<Agent> = serde_wasm_bindgen::from_value(agents).map_err(js_error)?;
    let results: BattleResults = serde_wasm_bindgen::from_value(results).map_err(js_error)?;
    let round = evolve_round(agents, &results, seed);
    serde_wasm_bindgen::to_value(&round).map_err(js_error)
}

/// WASM-exposed: render a DNA JSON document to a WAV byte array.
#[wasm_bindgen]
pub fn render_dna_wav(dna_json: &str, duration: f64, seed: u64) -> Result<Vec<u8>, JsValue> {
    let samples = render_dna_standalone(dna_json, duration, seed).map_err(js_error)?;
    dsp::renderer::render_wav(&samples).map_err(js_error)
}

/// WASM-exposed: render a DNA JSON document to mono f32 samples.
/// Returns the raw audio buffer for AudioWorklet playback.
#[wasm_bindgen]
pub fn render_dna_samples(dna_json: &str, duration: f64, seed: u64) -> Result<Vec<f32>, JsValue> {
    let samples = render_dna_standalone(dna_json, duration, seed).map_err(js_error)?;
    Ok(samples.iter().map(|&s| s as f32).collect())
}
