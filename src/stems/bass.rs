//! Bass — long-sustain 808 line around the profile's tonal center.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use super::{StemContext, event_at};
use crate::dsp::SAMPLE_RATE_F64;
use crate::dsp::dynamics::limit;
use crate::dsp::filter::{highpass, lowpass};
use crate::dsp::mixer::overlay;
use crate::dsp::oscillator::Note808;
use crate::events::{EventRecorder, round_to};
use crate::library::SampleCategory;

/// Weight of staying on the root when the line moves.
const ROOT_WEIGHT: f64 = 3.2;

/// Probability of leaving the current note at a bar line.
pub fn move_probability(profile_move: f64, bass_intensity: f64) -> f64 {
    (profile_move + (1.0 - bass_intensity) * 0.08).clamp(0.08, 0.48)
}

/// One frequency per bar plus a trailing target for the last glide.
fn bar_notes<R: Rng>(ctx: &StemContext, total_bars: usize, rng: &mut R) -> Vec<f64> {
    let root = ctx.profile.root_hz;
    let mut candidates = vec![root];
    candidates.extend(ctx.profile.scale_frequencies());
    let weights: Vec<f64> = std::iter::once(ROOT_WEIGHT)
        .chain(std::iter::repeat(1.0).take(candidates.len() - 1))
        .collect();
    let chooser = WeightedIndex::new(&weights).ok();
    let move_prob = move_probability(ctx.profile.bass_move_prob, ctx.dna.bass_intensity);

    let mut notes = Vec::with_capacity(total_bars + 1);
    notes.push(root);
    for _ in 0..total_bars {
        let previous = notes[notes.len() - 1];
        let next = if rng.r#gen::<f64>() < 1.0 - move_prob {
            previous
        } else {
            chooser
                .as_ref()
                .map_or(root, |c| candidates[c.sample(rng)])
        };
        notes.push(next);
    }
    notes
}

pub fn render<R: Rng>(ctx: &StemContext, rng: &mut R, events: &mut EventRecorder) -> Vec<f64> {
    let mut track = ctx.silence();
    let n = ctx.num_samples;
    let grid = ctx.grid;
    let dna = ctx.dna;
    if n == 0 || grid.bar == 0 {
        return track;
    }

    let total_bars = n.div_ceil(grid.bar).max(1);
    let notes = bar_notes(ctx, total_bars, rng);
    let attack = ctx.sample(SampleCategory::Bass, None, rng);

    let glide_prob = dna.glide_probability.clamp(0.1, 0.6);
    let note_samples = grid.bar + (grid.beat as f64 * 0.8) as usize;
    let gain = 0.2 + dna.bass_intensity * 0.22;

    for bar in 0..total_bars {
        let pos = bar * grid.bar;
        if pos >= n {
            break;
        }
        let freq = notes[bar];
        let next_freq = notes.get(bar + 1).copied().unwrap_or(freq);
        let glide = rng.r#gen::<f64>() < glide_prob;
        let glide_ms = rng.gen_range(80.0..140.0);

        let note = Note808 {
            distortion: 0.16 + dna.distortion_drive * 0.3,
            release: 0.28 + dna.bass_intensity * 0.35,
            glide_to: glide.then_some(next_freq),
            glide_ms,
            ..Note808::new(freq, note_samples as f64 / SAMPLE_RATE_F64)
        }
        .render();

        overlay(&mut track, &note, pos, gain);
        if let Some(attack) = &attack {
            overlay(&mut track, attack, pos, 0.02 + dna.bass_intensity * 0.035);
        }

        let mut event = event_at(pos, "808", gain)
            .with_note(round_to(freq, 2))
            .with_duration(note.len() as f64 / SAMPLE_RATE_F64)
            .with_extra("glide", glide);
        event = if glide {
            event
                .with_extra("glide_to", round_to(next_freq, 2))
                .with_extra("glide_ms", round_to(glide_ms, 1))
        } else {
            event
                .with_extra("glide_to", serde_json::Value::Null)
                .with_extra("glide_ms", serde_json::Value::Null)
        };
        events.record(event.with_extra("profile", dna.melody_profile.as_str()));
    }

    // Keep the low end tight
    let track = highpass(&track, 24.0);
    let track = lowpass(&track, 210.0);
    limit(&track, 0.98)
}
