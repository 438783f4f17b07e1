//! Cowbell — sparse 1/16 hits scaled by the profile's cowbell multiplier.

use rand::Rng;

use super::{StemContext, event_at};
use crate::dsp::filter::highpass;
use crate::dsp::mixer::overlay;
use crate::events::EventRecorder;
use crate::library::SampleCategory;

pub fn render<R: Rng>(ctx: &StemContext, rng: &mut R, events: &mut EventRecorder) -> Vec<f64> {
    let mut track = ctx.silence();
    let Some(cowbell) = ctx.sample(SampleCategory::Cowbell, None, rng) else {
        return track;
    };

    let hit_prob = ctx.dna.cowbell_frequency * 0.22 * ctx.profile.cowbell_mul;
    let step = ctx.grid.sixteenth;
    for pos in (0..ctx.num_samples).step_by(step) {
        if rng.r#gen::<f64>() < hit_prob {
            let vel = rng.gen_range(0.35..0.7);
            overlay(&mut track, &cowbell, pos, vel * 0.35);
            events.record(event_at(pos, "cowbell", vel).with_note("F5"));
        }
    }

    highpass(&track, 600.0)
}
