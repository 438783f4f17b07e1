//! Stem generators — the five instrument layers of a loop.
//!
//! Every stem renders into its own silent buffer of the full render length
//! at the effective tempo, using a random source of its own. Stems never
//! see each other; the mix stage combines them.

pub mod bass;
pub mod cowbell;
pub mod drums;
pub mod melody;
pub mod vocals;

use std::sync::Arc;

use rand::RngCore;

use crate::dna::Dna;
use crate::dsp::SAMPLE_RATE_F64;
use crate::events::TrackEvent;
use crate::library::{SampleCategory, SampleLibrary};
use crate::profile::StyleProfile;

/// Slowest and fastest groove the stems are rendered at.
pub const GROOVE_TEMPO_MIN: i32 = 88;
pub const GROOVE_TEMPO_MAX: i32 = 94;

/// DNA tempos at or above this are treated as double-time and scaled down.
const HALF_TIME_THRESHOLD: i32 = 120;
const HALF_TIME_FACTOR: f64 = 0.64;

/// Map the DNA tempo onto the slowed groove range.
pub fn effective_tempo(dna_tempo: i32) -> i32 {
    let tempo = if dna_tempo >= HALF_TIME_THRESHOLD {
        (dna_tempo as f64 * HALF_TIME_FACTOR).round() as i32
    } else {
        dna_tempo
    };
    tempo.clamp(GROOVE_TEMPO_MIN, GROOVE_TEMPO_MAX)
}

/// Whole samples covered by `beats` at `tempo` BPM (truncating).
pub fn beats_to_samples(beats: f64, tempo: i32) -> usize {
    let seconds_per_beat = 60.0 / tempo.max(1) as f64;
    (beats * seconds_per_beat * SAMPLE_RATE_F64).max(0.0) as usize
}

/// Rhythmic subdivisions in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub beat: usize,
    pub sixteenth: usize,
    pub thirty_second: usize,
    pub bar: usize,
}

impl Grid {
    pub fn new(tempo: i32) -> Self {
        let beat = beats_to_samples(1.0, tempo);
        let sixteenth = (beat / 4).max(1);
        Grid {
            beat,
            sixteenth,
            thirty_second: (sixteenth / 2).max(1),
            bar: beat * 4,
        }
    }
}

/// Everything a stem needs to know about the render it belongs to.
pub struct StemContext<'a> {
    pub dna: &'a Dna,
    pub profile: &'static StyleProfile,
    pub library: &'a dyn SampleLibrary,
    /// Effective tempo in BPM.
    pub tempo: i32,
    pub num_samples: usize,
    pub grid: Grid,
}

impl<'a> StemContext<'a> {
    pub fn new(
        dna: &'a Dna,
        profile: &'static StyleProfile,
        library: &'a dyn SampleLibrary,
        num_samples: usize,
    ) -> Self {
        let tempo = effective_tempo(dna.tempo);
        StemContext {
            dna,
            profile,
            library,
            tempo,
            num_samples,
            grid: Grid::new(tempo),
        }
    }

    /// An all-zero buffer of the render length.
    pub fn silence(&self) -> Vec<f64> {
        vec![0.0; self.num_samples]
    }

    /// Pick and load one sample from the DNA's pack selection.
    pub fn sample(
        &self,
        category: SampleCategory,
        keyword: Option<&str>,
        rng: &mut dyn RngCore,
    ) -> Option<Arc<[f64]>> {
        self.library.pick_loaded(
            category,
            self.dna.sample_variation,
            keyword,
            &self.dna.sample_pack,
            rng,
        )
    }
}

/// Event at a sample position.
pub(crate) fn event_at(position: usize, instrument: &str, velocity: f64) -> TrackEvent {
    TrackEvent::new(position as f64 / SAMPLE_RATE_F64, instrument, velocity)
}
