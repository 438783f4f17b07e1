//! Drums — half-time groove: heavy kick, snare on beat 3, 1/16 hats.

use rand::Rng;

use super::{StemContext, event_at};
use crate::dsp::dynamics::{limit, soft_clip};
use crate::dsp::mixer::overlay;
use crate::events::EventRecorder;
use crate::library::SampleCategory;

const HAT_STEPS: usize = 16;
/// Steps (0-based) where an open hat may ring out.
const OPEN_HAT_STEPS: [usize; 2] = [7, 15];

pub fn render<R: Rng>(ctx: &StemContext, rng: &mut R, events: &mut EventRecorder) -> Vec<f64> {
    let mut track = ctx.silence();
    let n = ctx.num_samples;
    let grid = ctx.grid;
    let dna = ctx.dna;

    let kick = ctx.sample(SampleCategory::Drums, Some("kick"), rng);
    let snare = ctx.sample(SampleCategory::Drums, Some("snare"), rng);
    let hat_closed = ctx.sample(SampleCategory::Drums, Some("hihat_closed"), rng);
    let hat_open = ctx.sample(SampleCategory::Drums, Some("hihat_open"), rng);

    let hat_play_prob = (dna.hi_hat_density * 0.85 + 0.12).clamp(0.45, 0.98);

    let mut bar_start = 0;
    while bar_start < n {
        if let Some(kick) = &kick {
            let mut positions = vec![bar_start];
            if rng.gen_bool(0.45) {
                positions.push(bar_start + grid.beat + grid.sixteenth * 2);
            }
            if rng.gen_bool(0.32) {
                positions.push(bar_start + grid.beat * 2 - grid.sixteenth);
            }
            if rng.gen_bool(0.28) {
                positions.push(bar_start + grid.beat * 3 + grid.sixteenth);
            }
            for pos in positions.into_iter().filter(|&p| p < n) {
                let vel = rng.gen_range(0.72..0.96);
                overlay(&mut track, kick, pos, vel);
                events.record(event_at(pos, "kick", vel).with_note("C1"));
            }
        }

        if let Some(snare) = &snare {
            let snare_pos = bar_start + grid.beat * 2;
            if snare_pos < n {
                let vel = rng.gen_range(0.82..0.98);
                overlay(&mut track, snare, snare_pos, vel);
                events.record(event_at(snare_pos, "snare", vel).with_note("D2"));
            }
            if rng.gen_bool(0.35) {
                let ghost_pos = if rng.gen_bool(0.5) {
                    snare_pos.checked_sub(grid.sixteenth)
                } else {
                    Some(snare_pos + grid.sixteenth)
                };
                if let Some(ghost_pos) = ghost_pos.filter(|&p| p < n) {
                    let vel = rng.gen_range(0.35..0.52);
                    overlay(&mut track, snare, ghost_pos, vel);
                    events.record(event_at(ghost_pos, "snare_ghost", vel).with_note("D2"));
                }
            }
        }

        if let Some(hat) = &hat_closed {
            for step in 0..HAT_STEPS {
                let hat_pos = bar_start + step * grid.sixteenth;
                if hat_pos >= n {
                    break;
                }
                if rng.r#gen::<f64>() > hat_play_prob {
                    continue;
                }
                let vel = rng.gen_range(0.55..0.85);
                overlay(&mut track, hat, hat_pos, vel * 0.33);
                events.record(event_at(hat_pos, "hihat_closed", vel).with_note("F#2"));

                if rng.gen_bool(0.12) {
                    let double_pos = hat_pos + grid.thirty_second;
                    if double_pos < n {
                        let double_vel = vel * rng.gen_range(0.65..0.82);
                        overlay(&mut track, hat, double_pos, double_vel * 0.33);
                        events.record(
                            event_at(double_pos, "hihat_double", double_vel).with_note("F#2"),
                        );
                    }
                }

                if let Some(open) = &hat_open {
                    if OPEN_HAT_STEPS.contains(&step) && rng.gen_bool(0.24) {
                        let open_vel = rng.gen_range(0.58..0.8);
                        overlay(&mut track, open, hat_pos, open_vel * 0.24);
                        events.record(event_at(hat_pos, "hihat_open", open_vel).with_note("A#2"));
                    }
                }
            }
        }

        bar_start += grid.bar.max(1);
    }

    // Drum bus saturation + clipper
    let track = soft_clip(&track, 0.12 + dna.distortion_drive * 0.4);
    limit(&track, 0.96)
}
