//! Vocal chops — short pitched-down slices on a 1/8 or 1/16 grid.

use rand::Rng;
use rand::seq::{SliceRandom, index};

use super::{StemContext, event_at};
use crate::dsp::dynamics::{limit, soft_clip};
use crate::dsp::envelope::fade;
use crate::dsp::filter::{highpass, lowpass};
use crate::dsp::mixer::overlay;
use crate::dsp::reverb::reverb;
use crate::dsp::sampler::pitch_shift;
use crate::dsp::{SAMPLE_RATE_F64, ms_to_samples};
use crate::events::EventRecorder;
use crate::library::SampleCategory;

/// Chop pitch never leaves this range, whatever the DNA asks for.
pub const PITCH_RANGE: (i32, i32) = (-6, -3);
const PITCH_JITTER: [i32; 4] = [-1, 0, 0, 1];
const ROOM_CHANCE: f64 = 0.22;

/// Chance of leaving a whole bar without chops.
pub fn bar_skip_probability(vocal_mul: f64) -> f64 {
    (0.25 / vocal_mul.max(0.65)).clamp(0.1, 0.45)
}

/// Upper bound on chops per bar.
pub fn max_chops(melody_complexity: f64) -> usize {
    1 + (melody_complexity.clamp(0.0, 1.0) * 2.2).round() as usize
}

/// Transposition for one chop.
pub fn chop_semitones(pitch_down: i32, jitter: i32) -> i32 {
    pitch_down
        .saturating_add(jitter)
        .clamp(PITCH_RANGE.0, PITCH_RANGE.1)
}

pub fn render<R: Rng>(ctx: &StemContext, rng: &mut R, events: &mut EventRecorder) -> Vec<f64> {
    let mut track = ctx.silence();
    let n = ctx.num_samples;
    let grid = ctx.grid;
    let dna = ctx.dna;
    let vocal_mul = ctx.profile.vocal_mul;

    let styled = ctx.sample(SampleCategory::Vocals, Some(dna.vocal_chop_style.as_str()), rng);
    let Some(vocal) = styled.or_else(|| ctx.sample(SampleCategory::Vocals, None, rng)) else {
        return track;
    };

    let eighth = grid.sixteenth * 2;
    let min_len = ms_to_samples(90.0);
    let max_len = ms_to_samples(220.0);
    let skip_prob = bar_skip_probability(vocal_mul);
    let chops_cap = max_chops(dna.melody_complexity);

    let mut bar_start = 0;
    while bar_start < n {
        if rng.r#gen::<f64>() < skip_prob {
            bar_start += grid.bar.max(1);
            continue;
        }

        let step = if rng.r#gen::<f64>() < 0.55 { grid.sixteenth } else { eighth };
        let steps = (grid.bar / step).max(1);
        let num_chops = rng.gen_range(1..=chops_cap);
        let mut chosen = index::sample(rng, steps, num_chops.min(steps)).into_vec();
        chosen.sort_unstable();

        for s in chosen {
            let pos = bar_start + s * step;
            if pos >= n {
                continue;
            }
            let chop_len = rng.gen_range(min_len..=max_len);
            let slice = if vocal.len() <= chop_len + 8 {
                &vocal[..]
            } else {
                let start = rng.gen_range(0..vocal.len() - chop_len);
                &vocal[start..start + chop_len]
            };

            let jitter = PITCH_JITTER.choose(rng).copied().unwrap_or(0);
            let semitones = chop_semitones(dna.vocal_pitch_down, jitter);
            let chop = pitch_shift(slice, semitones);
            let chop = fade(&chop, 3.0, 20.0);
            let chop = highpass(&chop, 170.0);
            let mut chop = lowpass(&chop, 5200.0);

            // Mostly dry, occasionally a short room
            if rng.r#gen::<f64>() < ROOM_CHANCE {
                chop = reverb(&chop, 0.2, 32.0);
            }

            let vel = rng.gen_range(0.45..0.78);
            overlay(&mut track, &chop, pos, vel * 0.36 * vocal_mul);
            events.record(
                event_at(pos, "vocal_chop", vel)
                    .with_note(format!("pitch_{semitones}"))
                    .with_duration(chop.len() as f64 / SAMPLE_RATE_F64),
            );
        }

        bar_start += grid.bar.max(1);
    }

    let track = soft_clip(&track, 0.08 + dna.distortion_drive * 0.22);
    limit(&track, 0.97)
}
