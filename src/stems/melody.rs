//! Melody — sparse pitched one-shots on the profile's accent beats.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use super::{StemContext, beats_to_samples, event_at};
use crate::dsp::dynamics::limit;
use crate::dsp::filter::{highpass, lowpass};
use crate::dsp::mixer::overlay;
use crate::dsp::sampler::{pitch_shift, semitone_ratio};
use crate::events::{EventRecorder, round_to};
use crate::library::SampleCategory;

/// Below this complexity the melody stem stays silent.
pub const MIN_COMPLEXITY: f64 = 0.18;
/// Variation above this picks a random melody sample per note.
const VARIATION_RANDOM_THRESHOLD: f64 = 0.3;

/// Chance that an accent beat gets a note.
pub fn play_probability(melody_complexity: f64) -> f64 {
    (0.18 + melody_complexity * 0.62).clamp(0.18, 0.86)
}

pub fn render<R: Rng>(ctx: &StemContext, rng: &mut R, events: &mut EventRecorder) -> Vec<f64> {
    let mut track = ctx.silence();
    let dna = ctx.dna;
    if dna.melody_complexity < MIN_COMPLEXITY {
        return track;
    }
    let samples = ctx.library.list(SampleCategory::Melody, &dna.sample_pack);
    if samples.is_empty() {
        return track;
    }

    let profile = ctx.profile;
    let Ok(degree_chooser) = WeightedIndex::new(profile.degree_weights()) else {
        return track;
    };
    let n = ctx.num_samples;
    let bar = ctx.grid.bar.max(1);
    let play_prob = play_probability(dna.melody_complexity);

    let mut bar_start = 0;
    while bar_start < n {
        for &beat in profile.melody_steps_beats {
            let pos = bar_start + beats_to_samples(beat, ctx.tempo);
            if pos >= n {
                continue;
            }
            if rng.r#gen::<f64>() > play_prob {
                continue;
            }
            let sample_ref = if dna.sample_variation > VARIATION_RANDOM_THRESHOLD {
                samples.choose(rng).unwrap_or(&samples[0])
            } else {
                &samples[0]
            };
            let interval = profile.intervals[degree_chooser.sample(rng)];
            let transpose = profile.melody_transpose.choose(rng).copied().unwrap_or(0);
            let vel = rng.gen_range(0.42..0.72);

            let Some(source) = ctx.library.load(sample_ref) else {
                continue;
            };
            let note = pitch_shift(&source, interval + transpose);
            let note = highpass(&note, 140.0);
            let note = lowpass(&note, 7000.0);
            overlay(&mut track, &note, pos, vel * 0.34);

            let target_hz = profile.root_hz * semitone_ratio(interval);
            events.record(
                event_at(pos, "melody", vel)
                    .with_note(round_to(target_hz, 2))
                    .with_extra("profile", dna.melody_profile.as_str()),
            );
        }
        bar_start += bar;
    }

    limit(&track, 0.97)
}
